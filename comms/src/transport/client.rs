use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{
    chat::{ChatMessage, SendChatRequest},
    error::ApiError,
    room::{
        CreateRoomRequest, CreateRoomResponse, JoinRoomRequest, JoinRoomResponse, RoomDetails,
        UpdateRoomRequest, UserInRoom,
    },
    spotify::{AuthStatus, AuthUrl, CurrentSong, SkipResponse},
};

/// The set of backend calls a room session is built from.
///
/// Every method maps to exactly one HTTP request. Responses are classified into [ApiError]
/// but never retried, retry policy belongs to the caller.
#[async_trait]
pub trait RoomApi: Send + Sync {
    async fn create_room(&self, request: &CreateRoomRequest)
        -> Result<CreateRoomResponse, ApiError>;

    async fn update_room(&self, request: &UpdateRoomRequest) -> Result<(), ApiError>;

    async fn join_room(&self, request: &JoinRoomRequest) -> Result<JoinRoomResponse, ApiError>;

    async fn get_room(&self, code: &str) -> Result<RoomDetails, ApiError>;

    async fn leave_room(&self) -> Result<(), ApiError>;

    async fn user_in_room(&self) -> Result<UserInRoom, ApiError>;

    async fn receive_chat(&self, code: &str) -> Result<Vec<ChatMessage>, ApiError>;

    async fn send_chat(&self, request: &SendChatRequest) -> Result<(), ApiError>;

    /// `Ok(None)` when the backend answers 204, there is no active track.
    async fn current_song(&self) -> Result<Option<CurrentSong>, ApiError>;

    async fn play(&self) -> Result<(), ApiError>;

    async fn pause(&self) -> Result<(), ApiError>;

    async fn skip(&self) -> Result<SkipResponse, ApiError>;

    async fn is_authenticated(&self) -> Result<bool, ApiError>;

    async fn auth_url(&self) -> Result<String, ApiError>;
}

/// [RoomApi] over HTTP with a cookie jar, so the backend session survives between calls
#[derive(Debug, Clone)]
pub struct HttpRoomApi {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpRoomApi {
    /// Creates a client for the backend reachable at `base_url`, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ApiError::Transport(format!("invalid base url {base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!("{base_url} can not be a base url")));
        }
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the path of the base url, each one percent-encoded.
    /// An empty last segment gives the url a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("{} can not be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;

        debug!("{} {}", method, url.path());

        Ok(self.http.request(method, url))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthenticated),
            _ => Err(rejection(response).await),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.send(request).await?.json::<T>().await?)
    }
}

// Pulls a readable message out of an error body such as `{"error": "..."}`
async fn rejection(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| {
            ["error", "message"].iter().find_map(|key| {
                body.get(*key)
                    .and_then(|value| value.as_str())
                    .map(String::from)
            })
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl RoomApi for HttpRoomApi {
    async fn create_room(
        &self,
        request: &CreateRoomRequest,
    ) -> Result<CreateRoomResponse, ApiError> {
        self.send_json(self.request(Method::POST, &["api", "create-room"])?.json(request))
            .await
    }

    async fn update_room(&self, request: &UpdateRoomRequest) -> Result<(), ApiError> {
        self.send(self.request(Method::PATCH, &["api", "update-room"])?.json(request))
            .await?;

        Ok(())
    }

    async fn join_room(&self, request: &JoinRoomRequest) -> Result<JoinRoomResponse, ApiError> {
        self.send_json(self.request(Method::POST, &["api", "join-room"])?.json(request))
            .await
    }

    async fn get_room(&self, code: &str) -> Result<RoomDetails, ApiError> {
        self.send_json(
            self.request(Method::GET, &["api", "get-room"])?
                .query(&[("code", code)]),
        )
        .await
    }

    async fn leave_room(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, &["api", "leave-room"])?)
            .await?;

        Ok(())
    }

    async fn user_in_room(&self) -> Result<UserInRoom, ApiError> {
        self.send_json(self.request(Method::GET, &["api", "user-in-room"])?)
            .await
    }

    async fn receive_chat(&self, code: &str) -> Result<Vec<ChatMessage>, ApiError> {
        self.send_json(self.request(Method::GET, &["api", "chat", code, "receive", ""])?)
            .await
    }

    async fn send_chat(&self, request: &SendChatRequest) -> Result<(), ApiError> {
        let segments = ["api", "chat", request.room_code.as_str(), "send", ""];
        self.send(self.request(Method::POST, &segments)?.json(request))
            .await?;

        Ok(())
    }

    async fn current_song(&self) -> Result<Option<CurrentSong>, ApiError> {
        let response = self
            .send(self.request(Method::GET, &["spotify", "current-song"])?)
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        Ok(Some(response.json::<CurrentSong>().await?))
    }

    async fn play(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::PUT, &["spotify", "play"])?)
            .await?;

        Ok(())
    }

    async fn pause(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::PUT, &["spotify", "pause"])?)
            .await?;

        Ok(())
    }

    async fn skip(&self) -> Result<SkipResponse, ApiError> {
        self.send_json(self.request(Method::POST, &["spotify", "skip"])?)
            .await
    }

    async fn is_authenticated(&self) -> Result<bool, ApiError> {
        let status: AuthStatus = self
            .send_json(self.request(Method::GET, &["spotify", "is-authenticated"])?)
            .await?;

        Ok(status.status)
    }

    async fn auth_url(&self) -> Result<String, ApiError> {
        let auth_url: AuthUrl = self
            .send_json(self.request(Method::GET, &["spotify", "get-auth-url"])?)
            .await?;

        Ok(auth_url.url)
    }
}
