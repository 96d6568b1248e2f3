use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    prelude::{Backend, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};

use super::{Component, ComponentRender};

/// Single line text input, positions are counted in chars
pub struct InputBox {
    text: String,
    /// Position of cursor in the editor area, in chars
    cursor_position: usize,
    /// Maximum number of chars accepted
    max_len: Option<usize>,
}

impl InputBox {
    pub fn limited_to(self, max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..self
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reset(&mut self) {
        self.cursor_position = 0;
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    fn move_cursor_right(&mut self) {
        self.cursor_position = self.cursor_position.saturating_add(1).min(self.char_count());
    }

    fn enter_char(&mut self, new_char: char) {
        if self
            .max_len
            .map(|max_len| self.char_count() >= max_len)
            .unwrap_or(false)
        {
            return;
        }

        let byte_index = self
            .text
            .char_indices()
            .nth(self.cursor_position)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len());
        self.text.insert(byte_index, new_char);

        self.move_cursor_right();
    }

    fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }

        // rebuild from chars, String::remove works on byte offsets
        let current_index = self.cursor_position;
        let before = self.text.chars().take(current_index - 1);
        let after = self.text.chars().skip(current_index);

        self.text = before.chain(after).collect();
        self.move_cursor_left();
    }
}

impl Component for InputBox {
    fn new(_state: &State, _action_tx: UnboundedSender<Action>) -> Self {
        Self {
            text: String::new(),
            cursor_position: 0,
            max_len: None,
        }
    }

    fn move_with_state(self, _state: &State) -> Self
    where
        Self: Sized,
    {
        Self { ..self }
    }

    fn name(&self) -> &str {
        "Input Box"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char(to_insert) => self.enter_char(to_insert),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.char_count(),
            _ => {}
        }
    }
}

pub struct RenderProps {
    pub title: String,
    pub area: Rect,
    pub border_color: Color,
    pub show_cursor: bool,
}

impl ComponentRender<RenderProps> for InputBox {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let title = match self.max_len {
            Some(max_len) => format!("{} ({}/{})", props.title, self.char_count(), max_len),
            None => props.title,
        };

        let input = Paragraph::new(self.text.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .fg(props.border_color)
                    .title(title),
            );
        frame.render_widget(input, props.area);

        if props.show_cursor {
            // one cell in from the border, on the text line
            frame.set_cursor(
                props.area.x + self.cursor_position as u16 + 1,
                props.area.y + 1,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;

    fn input_box() -> InputBox {
        let (action_tx, _action_rx) = mpsc::unbounded_channel();

        InputBox::new(&State::default(), action_tx)
    }

    fn type_keys(input: &mut InputBox, codes: &[KeyCode]) {
        for code in codes {
            input.handle_key_event(KeyEvent::new(*code, KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_edits_multibyte_text_by_char() {
        let mut input = input_box();

        type_keys(
            &mut input,
            &[
                KeyCode::Char('c'),
                KeyCode::Char('ö'),
                KeyCode::Char('l'),
                KeyCode::Left,
                KeyCode::Backspace,
                KeyCode::Char('a'),
            ],
        );

        assert_eq!(input.text(), "cal");
    }

    #[test]
    fn test_stops_at_max_len() {
        let mut input = input_box().limited_to(3);

        type_keys(
            &mut input,
            &[
                KeyCode::Char('a'),
                KeyCode::Char('b'),
                KeyCode::Char('c'),
                KeyCode::Char('d'),
            ],
        );

        assert_eq!(input.text(), "abc");
    }
}
