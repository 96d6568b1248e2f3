use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, RoomState, State};

use super::{
    usage::{HasUsageInfo, UsageInfo, UsageInfoLine},
    Component, ComponentRender,
};

/// Votes to skip and guest control of a room, shared by room creation and the host settings
pub struct RoomSettingsForm {
    votes_to_skip: u32,
    guest_can_pause: bool,
}

impl RoomSettingsForm {
    pub fn votes_to_skip(&self) -> u32 {
        self.votes_to_skip
    }

    pub fn guest_can_pause(&self) -> bool {
        self.guest_can_pause
    }

    /// Loads the current settings of a room into the form
    pub fn load(&mut self, room: &RoomState) {
        self.votes_to_skip = room.votes_to_skip;
        self.guest_can_pause = room.guest_can_pause;
    }
}

impl Component for RoomSettingsForm {
    fn new(_state: &State, _action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        let defaults = RoomState::default();

        RoomSettingsForm {
            votes_to_skip: defaults.votes_to_skip,
            guest_can_pause: defaults.guest_can_pause,
        }
    }

    fn move_with_state(self, _state: &State) -> Self
    where
        Self: Sized,
    {
        Self { ..self }
    }

    fn name(&self) -> &str {
        "Room Settings"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('+') => {
                self.votes_to_skip = self.votes_to_skip.saturating_add(1)
            }
            // the form never goes below one vote
            KeyCode::Down | KeyCode::Char('-') => {
                self.votes_to_skip = self.votes_to_skip.saturating_sub(1).max(1)
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                self.guest_can_pause = !self.guest_can_pause
            }
            _ => {}
        }
    }
}

pub struct RenderProps {
    pub title: &'static str,
    pub area: Rect,
    pub border_color: Color,
}

fn choice<'a>(label: &'a str, selected: bool) -> Span<'a> {
    if selected {
        Span::from(format!("[{label}]")).bold().fg(Color::Yellow)
    } else {
        Span::from(format!(" {label} "))
    }
}

impl ComponentRender<RenderProps> for RoomSettingsForm {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let text = Text::from(vec![
            Line::from("Guest Control of Playback State"),
            Line::from(vec![
                choice("Play/Pause", self.guest_can_pause),
                " ".into(),
                choice("No Control", !self.guest_can_pause),
            ]),
            Line::from(""),
            Line::from("Votes Required To Skip Song"),
            Line::from(vec![
                "< ".into(),
                Span::from(self.votes_to_skip.to_string()).bold(),
                " >".into(),
            ]),
        ]);

        let form = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .fg(props.border_color)
                .title(props.title),
        );
        frame.render_widget(form, props.area);
    }
}

impl HasUsageInfo for RoomSettingsForm {
    fn usage_info(&self) -> UsageInfo {
        UsageInfo {
            description: None,
            lines: vec![
                UsageInfoLine::new(&["↑", "↓"], "to change the votes to skip"),
                UsageInfoLine::new(&["←", "→"], "to toggle guest control"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;

    fn press(form: &mut RoomSettingsForm, code: KeyCode) {
        form.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_votes_never_drop_below_one() {
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let mut form = RoomSettingsForm::new(&State::default(), action_tx);

        for _ in 0..5 {
            press(&mut form, KeyCode::Down);
        }
        assert_eq!(form.votes_to_skip(), 1);

        press(&mut form, KeyCode::Up);
        press(&mut form, KeyCode::Right);
        assert_eq!(form.votes_to_skip(), 2);
        assert!(!form.guest_can_pause());
    }
}
