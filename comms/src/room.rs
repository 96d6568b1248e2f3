use serde::{Deserialize, Serialize};

/// Body of `POST /api/create-room`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// Guest votes required to skip the current song
    pub votes_to_skip: u32,
    /// Whether guests may play and pause the music
    pub guest_can_pause: bool,
}

/// Reply of `POST /api/create-room`, the backend sends more fields than we read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub code: String,
}

/// Body of `PATCH /api/update-room`, only the host of the room may send it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRoomRequest {
    pub votes_to_skip: u32,
    pub guest_can_pause: bool,
    /// The room being updated
    pub code: String,
}

/// Body of `POST /api/join-room`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub code: String,
}

/// Reply of `POST /api/join-room`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    pub code: String,
    pub votes_to_skip: u32,
    pub guest_can_pause: bool,
}

/// Reply of `GET /api/get-room?code=`.
///
/// `is_host` is computed by the backend from the session cookie of the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetails {
    pub votes_to_skip: u32,
    pub guest_can_pause: bool,
    pub is_host: bool,
    #[serde(default)]
    pub spotify_authenticated: bool,
}

/// Reply of `GET /api/user-in-room`. Every field is absent when the session is not in a room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInRoom {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub votes_to_skip: Option<u32>,
    #[serde(default)]
    pub guest_can_pause: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_response_ignores_extra_fields() {
        let response: CreateRoomResponse = serde_json::from_str(
            r#"{"id":3,"code":"QWERTY","host":"abc","guest_can_pause":true,"votes_to_skip":2,"created_at":"2024-10-01T10:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(response.code, "QWERTY");
    }

    #[test]
    fn test_room_details_defaults_spotify_authenticated() {
        let details: RoomDetails =
            serde_json::from_str(r#"{"votes_to_skip":3,"guest_can_pause":false,"is_host":true}"#)
                .unwrap();

        assert_eq!(
            details,
            RoomDetails {
                votes_to_skip: 3,
                guest_can_pause: false,
                is_host: true,
                spotify_authenticated: false,
            }
        );
    }

    #[test]
    fn test_user_in_room_without_room() {
        let user: UserInRoom = serde_json::from_str("{}").unwrap();

        assert_eq!(user, UserInRoom::default());
    }

    #[test]
    fn test_update_room_request_field_names() {
        let request = UpdateRoomRequest {
            votes_to_skip: 4,
            guest_can_pause: true,
            code: "ABCD".into(),
        };

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"votes_to_skip":4,"guest_can_pause":true,"code":"ABCD"}"#
        );
    }
}
