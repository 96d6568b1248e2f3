/// Chat payloads exchanged with `/api/chat/`
pub mod chat;
/// Classification of failed backend calls
pub mod error;
/// Room lifecycle payloads exchanged with `/api/`
pub mod room;
/// Playback and authorization payloads exchanged with `/spotify/`
pub mod spotify;
/// Implementation of the backend calls over HTTP.
/// Requires the 'client' feature which brings in reqwest alongside with other dependencies
pub mod transport;

pub use error::ApiError;
