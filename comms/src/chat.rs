use serde::{Deserialize, Serialize};

/// A single line of the room chat, as returned by `GET /api/chat/:code/receive/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name chosen by the sender
    pub user: String,
    pub message: String,
    /// ISO-8601 timestamp assigned by the backend
    pub timestamp: String,
}

/// Body of `POST /api/chat/:code/send/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendChatRequest {
    pub room_code: String,
    pub user: String,
    pub message: String,
}
