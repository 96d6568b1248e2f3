use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, Route, State};

use super::centered_rect;
use crate::ui_management::components::{
    input_box::{self, InputBox},
    Component, ComponentRender,
};

struct Props {
    /// Why the last join attempt failed
    join_error: Option<String>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            join_error: state.join_error.clone(),
        }
    }
}

/// JoinPage asks for the code of an existing room
pub struct JoinPage {
    pub action_tx: UnboundedSender<Action>,
    props: Props,
    code_input: InputBox,
}

impl Component for JoinPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        JoinPage {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            code_input: InputBox::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        JoinPage {
            props: Props::from(state),
            code_input: self.code_input.move_with_state(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Join Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Enter => {
                let _ = self.action_tx.send(Action::JoinRoom {
                    code: String::from(self.code_input.text()),
                });
            }
            KeyCode::Esc => {
                self.code_input.reset();
                let _ = self.action_tx.send(Action::Navigate { route: Route::Home });
            }
            _ => self.code_input.handle_key_event(key),
        }
    }
}

impl ComponentRender<Rect> for JoinPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let [container_code_input, container_error, container_help_text] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(centered_rect(area, 5))
        else {
            panic!("The join layout should have 3 chunks")
        };

        let has_error = self.props.join_error.is_some();
        self.code_input.render(
            frame,
            input_box::RenderProps {
                title: String::from("Room Code"),
                area: container_code_input,
                border_color: if has_error { Color::Red } else { Color::Yellow },
                show_cursor: true,
            },
        );

        if let Some(join_error) = self.props.join_error.as_ref() {
            let error = Paragraph::new(join_error.as_str().red());
            frame.render_widget(error, container_error);
        }

        let help_text = Paragraph::new(Line::from(vec![
            "Press ".into(),
            "<Enter>".bold(),
            " to join, ".into(),
            "<Esc>".bold(),
            " to go back.".into(),
        ]));
        frame.render_widget(help_text, container_help_text);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;

    fn press(page: &mut JoinPage, code: KeyCode) {
        page.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_enter_joins_with_typed_code() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut page = JoinPage::new(&State::default(), action_tx);

        for c in "ABCDEF".chars() {
            press(&mut page, KeyCode::Char(c));
        }
        press(&mut page, KeyCode::Enter);

        match action_rx.try_recv() {
            Ok(Action::JoinRoom { code }) => assert_eq!(code, "ABCDEF"),
            other => panic!("expected a join, got {other:?}"),
        }
    }

    #[test]
    fn test_escape_clears_input_and_goes_home() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut page = JoinPage::new(&State::default(), action_tx);

        press(&mut page, KeyCode::Char('Z'));
        press(&mut page, KeyCode::Esc);

        assert!(page.code_input.is_empty());
        assert!(matches!(
            action_rx.try_recv(),
            Ok(Action::Navigate { route: Route::Home })
        ));
    }
}
