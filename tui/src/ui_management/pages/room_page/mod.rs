use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, RoomState, State};

use self::{chat_box::ChatBox, music_player::MusicPlayer};
use crate::ui_management::components::{
    room_settings_form::{self, RoomSettingsForm},
    usage::{usage_to_text, HasUsageInfo, UsageInfo, UsageInfoLine},
    Component, ComponentRender,
};

mod chat_box;
mod music_player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Chat,
    Settings,
}

struct Props {
    room: RoomState,
    /// Authorization url waiting to be opened by the host
    auth_redirect: Option<String>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            room: state.room.clone(),
            auth_redirect: state.auth_redirect.clone(),
        }
    }
}

/// RoomPage is the room itself: the player, the chat and the host settings
pub struct RoomPage {
    pub action_tx: UnboundedSender<Action>,
    props: Props,
    /// Section handling the keys, `None` while the page itself does
    active_section: Option<Section>,
    music_player: MusicPlayer,
    chat_box: ChatBox,
    settings_form: RoomSettingsForm,
}

impl RoomPage {
    fn send(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }

    fn calculate_border_color(&self, section: Section) -> Color {
        match self.active_section {
            Some(active_section) if active_section == section => Color::Yellow,
            _ => Color::Reset,
        }
    }

    fn handle_idle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('p') => self.send(Action::TogglePlayPause),
            KeyCode::Char('n') => self.send(Action::SkipSong),
            KeyCode::Char('l') => self.send(Action::LeaveRoom),
            KeyCode::Char('e') => self.active_section = Some(Section::Chat),
            KeyCode::Char('s') if self.props.room.is_host => {
                self.settings_form.load(&self.props.room);
                self.active_section = Some(Section::Settings);
            }
            KeyCode::Char('a') => self.send(Action::DismissAuthRedirect),
            KeyCode::Char('q') => self.send(Action::Exit),
            _ => {}
        }
    }
}

impl Component for RoomPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        RoomPage {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            active_section: None,
            music_player: MusicPlayer {
                playback: state.playback.clone(),
            },
            chat_box: ChatBox::new(state, action_tx.clone()),
            settings_form: RoomSettingsForm::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        // a guest has no settings to edit
        let active_section = match self.active_section {
            Some(Section::Settings) if !state.room.is_host => None,
            active_section => active_section,
        };

        RoomPage {
            props: Props::from(state),
            active_section,
            music_player: MusicPlayer {
                playback: state.playback.clone(),
            },
            chat_box: self.chat_box.move_with_state(state),
            settings_form: self.settings_form.move_with_state(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Room Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (self.active_section, key.code) {
            (None, _) => self.handle_idle_key_event(key),
            (Some(_), KeyCode::Esc) => self.active_section = None,
            (Some(Section::Settings), KeyCode::Enter) => {
                self.send(Action::UpdateRoom {
                    votes_to_skip: self.settings_form.votes_to_skip(),
                    guest_can_pause: self.settings_form.guest_can_pause(),
                });
                self.active_section = None;
            }
            (Some(Section::Settings), _) => self.settings_form.handle_key_event(key),
            (Some(Section::Chat), _) => self.chat_box.handle_key_event(key),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

impl ComponentRender<Rect> for RoomPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let [left, right] = *Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
            .split(area)
        else {
            panic!("The room layout should have 2 chunks")
        };

        let auth_height = if self.props.auth_redirect.is_some() { 4 } else { 0 };
        let [container_room_info, container_player, container_auth, container_usage] =
            *Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(6),
                        Constraint::Length(7),
                        Constraint::Length(auth_height),
                        Constraint::Min(1),
                    ]
                    .as_ref(),
                )
                .split(left)
        else {
            panic!("The left layout should have 4 chunks")
        };

        let room = &self.props.room;
        let room_info = Paragraph::new(Text::from(vec![
            Line::from(vec![
                "Code: ".into(),
                Span::from(room.room_code.clone().unwrap_or_default()).bold(),
            ]),
            Line::from(format!("Votes to skip: {}", room.votes_to_skip)),
            Line::from(format!("Guest can pause: {}", yes_no(room.guest_can_pause))),
            Line::from(format!("Host: {}", yes_no(room.is_host))),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Room"));
        frame.render_widget(room_info, container_room_info);

        self.music_player.render(
            frame,
            music_player::RenderProps {
                area: container_player,
                border_color: Color::Reset,
            },
        );

        if let Some(url) = self.props.auth_redirect.as_ref() {
            let auth = Paragraph::new(url.as_str().underlined())
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .fg(Color::Magenta)
                        .title("Open to authorize Spotify"),
                );
            frame.render_widget(auth, container_auth);
        }

        let usage = Paragraph::new(usage_to_text(self.usage_info()))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Usage"));
        frame.render_widget(usage, container_usage);

        match self.active_section {
            Some(Section::Settings) => self.settings_form.render(
                frame,
                room_settings_form::RenderProps {
                    title: "Update Room",
                    area: right,
                    border_color: self.calculate_border_color(Section::Settings),
                },
            ),
            _ => self.chat_box.render(
                frame,
                chat_box::RenderProps {
                    area: right,
                    border_color: self.calculate_border_color(Section::Chat),
                    show_cursor: self.active_section == Some(Section::Chat),
                },
            ),
        }
    }
}

impl HasUsageInfo for RoomPage {
    fn usage_info(&self) -> UsageInfo {
        match self.active_section {
            Some(Section::Chat) => self.chat_box.usage_info(),
            Some(Section::Settings) => {
                let mut usage = self.settings_form.usage_info();
                usage.lines.push(UsageInfoLine::new(&["Enter"], "to save"));
                usage.lines.push(UsageInfoLine::new(&["Esc"], "to cancel"));

                usage
            }
            None => {
                let mut lines = vec![
                    UsageInfoLine::new(&["p"], "to play or pause"),
                    UsageInfoLine::new(&["n"], "to vote to skip"),
                    UsageInfoLine::new(&["e"], "to chat"),
                ];
                if self.props.room.is_host {
                    lines.push(UsageInfoLine::new(&["s"], "to change the settings"));
                }
                if self.props.auth_redirect.is_some() {
                    lines.push(UsageInfoLine::new(&["a"], "to dismiss the authorization link"));
                }
                lines.push(UsageInfoLine::new(&["l"], "to leave the room"));
                lines.push(UsageInfoLine::new(&["q"], "to exit"));

                UsageInfo {
                    description: None,
                    lines,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;

    fn room_state(is_host: bool) -> State {
        let mut state = State::default();
        state.enter_room(RoomState {
            room_code: Some(String::from("ABCDEF")),
            votes_to_skip: 4,
            guest_can_pause: false,
            is_host,
        });

        state
    }

    fn press(page: &mut RoomPage, code: KeyCode) {
        page.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn drain(action_rx: &mut UnboundedReceiver<Action>) -> Vec<Action> {
        std::iter::from_fn(|| action_rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_host_saves_settings_starting_from_room_values() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut page = RoomPage::new(&room_state(true), action_tx);

        press(&mut page, KeyCode::Char('s'));
        press(&mut page, KeyCode::Down);
        press(&mut page, KeyCode::Enter);

        let actions = drain(&mut action_rx);
        assert!(matches!(
            actions.as_slice(),
            [Action::UpdateRoom {
                votes_to_skip: 3,
                guest_can_pause: false
            }]
        ));
        assert_eq!(page.active_section, None);
    }

    #[test]
    fn test_guest_cannot_open_settings() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut page = RoomPage::new(&room_state(false), action_tx);

        press(&mut page, KeyCode::Char('s'));
        press(&mut page, KeyCode::Char('p'));

        assert_eq!(page.active_section, None);
        assert!(matches!(
            drain(&mut action_rx).as_slice(),
            [Action::TogglePlayPause]
        ));
    }

    #[test]
    fn test_chat_keys_do_not_trigger_room_actions() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut page = RoomPage::new(&room_state(false), action_tx);

        press(&mut page, KeyCode::Char('e'));
        press(&mut page, KeyCode::Char('l'));
        press(&mut page, KeyCode::Esc);
        press(&mut page, KeyCode::Char('l'));

        assert!(matches!(
            drain(&mut action_rx).as_slice(),
            [Action::LeaveRoom]
        ));
    }
}
