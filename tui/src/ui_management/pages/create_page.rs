use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, Route, State};

use super::centered_rect;
use crate::ui_management::components::{
    room_settings_form::{self, RoomSettingsForm},
    usage::{usage_to_text, HasUsageInfo, UsageInfoLine},
    Component, ComponentRender,
};

/// CreatePage lets the user pick the settings of a new room
pub struct CreatePage {
    pub action_tx: UnboundedSender<Action>,
    settings_form: RoomSettingsForm,
}

impl Component for CreatePage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        CreatePage {
            action_tx: action_tx.clone(),
            settings_form: RoomSettingsForm::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        CreatePage {
            settings_form: self.settings_form.move_with_state(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Create Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Enter => {
                let _ = self.action_tx.send(Action::CreateRoom {
                    votes_to_skip: self.settings_form.votes_to_skip(),
                    guest_can_pause: self.settings_form.guest_can_pause(),
                });
            }
            KeyCode::Esc => {
                let _ = self.action_tx.send(Action::Navigate { route: Route::Home });
            }
            _ => self.settings_form.handle_key_event(key),
        }
    }
}

impl ComponentRender<Rect> for CreatePage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let [container_form, container_usage] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Length(5)].as_ref())
            .split(centered_rect(area, 12))
        else {
            panic!("The create layout should have 2 chunks")
        };

        self.settings_form.render(
            frame,
            room_settings_form::RenderProps {
                title: "Create A Room",
                area: container_form,
                border_color: Color::Yellow,
            },
        );

        let mut usage = self.settings_form.usage_info();
        usage
            .lines
            .push(UsageInfoLine::new(&["Enter"], "to create the room"));
        usage
            .lines
            .push(UsageInfoLine::new(&["Esc"], "to go back"));
        let usage = Paragraph::new(usage_to_text(usage))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP).title("Usage"));
        frame.render_widget(usage, container_usage);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn test_enter_creates_with_form_values() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut page = CreatePage::new(&State::default(), action_tx);

        page.handle_key_event(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        page.handle_key_event(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        page.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        match action_rx.try_recv() {
            Ok(Action::CreateRoom {
                votes_to_skip,
                guest_can_pause,
            }) => {
                assert_eq!(votes_to_skip, 3);
                assert!(!guest_can_pause);
            }
            other => panic!("expected a create, got {other:?}"),
        }
    }
}
