use chrono::{DateTime, Local};
use comms::chat::ChatMessage;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State, MAX_CHAT_MESSAGE_LEN};

use crate::ui_management::components::{
    input_box::{self, InputBox},
    usage::{HasUsageInfo, UsageInfo, UsageInfoLine},
    Component, ComponentRender,
};

const MAX_USERNAME_LEN: usize = 32;

struct Props {
    username: Option<String>,
    chat_log: Vec<ChatMessage>,
    chat_messages_sent: usize,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            username: state.username.clone(),
            chat_log: state.chat_log.asc_iter().cloned().collect(),
            chat_messages_sent: state.chat_messages_sent,
        }
    }
}

/// ChatBox shows the chat log of the room and takes a username, then messages
pub struct ChatBox {
    action_tx: UnboundedSender<Action>,
    props: Props,
    username_input: InputBox,
    message_input: InputBox,
    /// Last message handed to the store, cleared from the input once it is confirmed
    submitted_message: Option<String>,
}

impl ChatBox {
    fn submit(&mut self) {
        let action = match self.props.username {
            None => Action::SetUsername {
                username: String::from(self.username_input.text()),
            },
            Some(_) => {
                let message = String::from(self.message_input.text());
                self.submitted_message = Some(message.clone());

                Action::SendChatMessage { message }
            }
        };

        let _ = self.action_tx.send(action);
    }
}

impl Component for ChatBox {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        ChatBox {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            username_input: InputBox::new(state, action_tx.clone()).limited_to(MAX_USERNAME_LEN),
            message_input: InputBox::new(state, action_tx).limited_to(MAX_CHAT_MESSAGE_LEN),
            submitted_message: None,
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        let mut message_input = self.message_input.move_with_state(state);
        let mut submitted_message = self.submitted_message;

        // a message went through since the last snapshot, keep whatever was typed after it
        if state.chat_messages_sent != self.props.chat_messages_sent {
            if submitted_message.as_deref() == Some(message_input.text()) {
                message_input.reset();
            }
            submitted_message = None;
        }

        ChatBox {
            props: Props::from(state),
            username_input: self.username_input.move_with_state(state),
            message_input,
            submitted_message,
            ..self
        }
    }

    fn name(&self) -> &str {
        "Chat"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.code, self.props.username.is_some()) {
            (KeyCode::Enter, _) => self.submit(),
            (_, false) => self.username_input.handle_key_event(key),
            (_, true) => self.message_input.handle_key_event(key),
        }
    }
}

pub struct RenderProps {
    pub area: Rect,
    pub border_color: Color,
    pub show_cursor: bool,
}

fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(time) => time.with_timezone(&Local).format("%H:%M:%S").to_string(),
        Err(_) => String::from(timestamp),
    }
}

fn calculate_list_offset(height: u16, items_len: usize) -> usize {
    // go back by (container height - 2 for borders) to get the offset
    items_len.saturating_sub((height as usize).saturating_sub(2))
}

impl ComponentRender<RenderProps> for ChatBox {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let [container_messages, container_input] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
            .split(props.area)
        else {
            panic!("The chat layout should have 2 chunks")
        };

        let offset = calculate_list_offset(container_messages.height, self.props.chat_log.len());
        let messages: Vec<ListItem> = self
            .props
            .chat_log
            .iter()
            .skip(offset)
            .map(|message| {
                ListItem::new(Line::from(vec![
                    Span::from(format!("{} ", format_timestamp(&message.timestamp))).dark_gray(),
                    Span::from(format!("@{}: ", message.user)).bold(),
                    Span::raw(message.message.as_str()),
                ]))
            })
            .collect();

        let messages = List::new(messages).block(
            Block::default()
                .borders(Borders::ALL)
                .fg(props.border_color)
                .title("Chat Room"),
        );
        frame.render_widget(messages, container_messages);

        let (input, title) = match self.props.username.as_ref() {
            None => (&self.username_input, String::from("Enter your username")),
            Some(username) => (&self.message_input, format!("Message as @{username}")),
        };
        input.render(
            frame,
            input_box::RenderProps {
                title,
                area: container_input,
                border_color: props.border_color,
                show_cursor: props.show_cursor,
            },
        );
    }
}

impl HasUsageInfo for ChatBox {
    fn usage_info(&self) -> UsageInfo {
        let submit = if self.props.username.is_some() {
            "to send the message"
        } else {
            "to set your username"
        };

        UsageInfo {
            description: Some(String::from("Type your message")),
            lines: vec![
                UsageInfoLine::new(&["Esc"], "to cancel"),
                UsageInfoLine::new(&["Enter"], submit),
            ],
        }
    }
}
