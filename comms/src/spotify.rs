use serde::{Deserialize, Serialize};

/// Reply of `GET /spotify/current-song` when a track is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub image_url: String,
    pub is_playing: bool,
    /// Playback position in milliseconds
    #[serde(rename = "time")]
    pub position_ms: u64,
    /// Track length in milliseconds
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(default)]
    pub votes: u32,
    #[serde(default)]
    pub votes_required: u32,
}

/// Successful reply of `POST /spotify/skip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipResponse {
    pub message: String,
}

/// Reply of `GET /spotify/is-authenticated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub status: bool,
}

/// Reply of `GET /spotify/get-auth-url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUrl {
    pub url: String,
}
