use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, Route, State};

use super::centered_rect;
use crate::ui_management::components::{Component, ComponentRender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoTopic {
    Joining,
    Creating,
}

/// InfoPage explains joining and creating rooms, one topic at a time
pub struct InfoPage {
    pub action_tx: UnboundedSender<Action>,
    topic: InfoTopic,
}

impl Component for InfoPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        InfoPage {
            action_tx,
            topic: InfoTopic::Joining,
        }
        .move_with_state(state)
    }

    fn move_with_state(self, _state: &State) -> Self
    where
        Self: Sized,
    {
        InfoPage { ..self }
    }

    fn name(&self) -> &str {
        "Info Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::Right => {
                self.topic = match self.topic {
                    InfoTopic::Joining => InfoTopic::Creating,
                    InfoTopic::Creating => InfoTopic::Joining,
                }
            }
            KeyCode::Esc | KeyCode::Char('b') => {
                self.topic = InfoTopic::Joining;
                let _ = self.action_tx.send(Action::Navigate { route: Route::Home });
            }
            _ => {}
        }
    }
}

fn topic_text(topic: InfoTopic) -> Vec<Line<'static>> {
    match topic {
        InfoTopic::Joining => vec![
            Line::from(vec![
                "Joining a Room: ".bold(),
                "enter a room code to join an existing session.".into(),
            ]),
            Line::from("Enjoy synchronized music playback and vote to skip songs."),
            Line::from(""),
            Line::from("Don't have a room code? Ask the host to share one with you!".dark_gray()),
        ],
        InfoTopic::Creating => vec![
            Line::from(vec![
                "Creating a Room: ".bold(),
                "as the host you start a session and control the playback settings.".into(),
            ]),
            Line::from("Decide how many votes skip a song and whether guests can pause music."),
            Line::from(""),
            Line::from("Share the room code with friends to let them join!".dark_gray()),
        ],
    }
}

impl ComponentRender<Rect> for InfoPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let mut lines = topic_text(self.topic);
        lines.push(Line::from(""));
        lines.push(Line::from(match self.topic {
            InfoTopic::Joining => "(→) next",
            InfoTopic::Creating => "(←) previous",
        }));
        lines.push(Line::from("(Esc) back"));

        let info = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("What is House Party?"),
            );
        frame.render_widget(info, centered_rect(area, 10));
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn test_arrows_flip_between_topics() {
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let mut page = InfoPage::new(&State::default(), action_tx);

        page.handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(page.topic, InfoTopic::Creating);

        page.handle_key_event(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(page.topic, InfoTopic::Joining);
    }
}
