use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, Route, State};

use super::centered_rect;
use crate::ui_management::components::{Component, ComponentRender};

/// HomePage is the entry menu shown while the session is not in a room
pub struct HomePage {
    pub action_tx: UnboundedSender<Action>,
}

impl HomePage {
    fn navigate(&self, route: Route) {
        let _ = self.action_tx.send(Action::Navigate { route });
    }
}

impl Component for HomePage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        HomePage { action_tx }.move_with_state(state)
    }

    fn move_with_state(self, _state: &State) -> Self
    where
        Self: Sized,
    {
        HomePage { ..self }
    }

    fn name(&self) -> &str {
        "Home Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('j') => self.navigate(Route::Join),
            KeyCode::Char('c') => self.navigate(Route::Create),
            KeyCode::Char('i') => self.navigate(Route::Info),
            KeyCode::Char('q') => {
                let _ = self.action_tx.send(Action::Exit);
            }
            _ => {}
        }
    }
}

fn menu_entry<'a>(key: &'a str, label: &'a str) -> Line<'a> {
    Line::from(vec![Span::from(format!("({key}) ")).bold(), label.into()])
}

impl ComponentRender<Rect> for HomePage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let menu = Paragraph::new(Text::from(vec![
            Line::from("House Party".bold().fg(Color::Yellow)),
            Line::from(""),
            menu_entry("j", "Join a Room"),
            menu_entry("i", "Info"),
            menu_entry("c", "Create a Room"),
            menu_entry("q", "Quit"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

        frame.render_widget(menu, centered_rect(area, 8));
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn test_menu_keys_navigate() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut page = HomePage::new(&State::default(), action_tx);

        page.handle_key_event(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        page.handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        page.handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));

        assert!(matches!(
            action_rx.try_recv(),
            Ok(Action::Navigate { route: Route::Join })
        ));
        assert!(matches!(action_rx.try_recv(), Ok(Action::Exit)));
        assert!(action_rx.try_recv().is_err());
    }
}
