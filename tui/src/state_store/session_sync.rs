use std::{future::Future, sync::Arc};

use comms::{
    chat::{ChatMessage, SendChatRequest},
    room::{
        CreateRoomRequest, CreateRoomResponse, JoinRoomRequest, JoinRoomResponse, RoomDetails,
        UpdateRoomRequest, UserInRoom,
    },
    spotify::{CurrentSong, SkipResponse},
    transport::client::RoomApi,
    ApiError,
};
use log::{debug, info, warn};
use tokio::task::JoinSet;

use super::{
    action::Action,
    error::SyncError,
    polling::{PollIntervals, PollTick, RoomPollers},
    state::{Notice, PlaybackState, RoomState, Route, State, Ticket, WriteStamp},
};

/// Longest chat message accepted, in chars
pub const MAX_CHAT_MESSAGE_LEN: usize = 200;

/// Result of a spawned backend call, applied back onto the state by the store loop.
///
/// Room scoped results carry the epoch of the session that issued them.
#[derive(Debug)]
pub enum Completion {
    Resumed(Result<UserInRoom, ApiError>),
    Joined(Result<JoinRoomResponse, ApiError>),
    Created {
        request: CreateRoomRequest,
        result: Result<CreateRoomResponse, ApiError>,
    },
    Left(Result<(), ApiError>),
    RoomDetails {
        epoch: u64,
        result: Result<RoomDetails, ApiError>,
    },
    RoomUpdated {
        epoch: u64,
        result: Result<(), ApiError>,
    },
    Playback {
        epoch: u64,
        ticket: Ticket,
        result: Result<Option<CurrentSong>, ApiError>,
    },
    PlayPause {
        epoch: u64,
        stamp: WriteStamp,
        target: bool,
        result: Result<(), ApiError>,
    },
    Skipped {
        epoch: u64,
        result: Result<SkipResponse, ApiError>,
    },
    ChatLog {
        epoch: u64,
        result: Result<Vec<ChatMessage>, ApiError>,
    },
    ChatSent {
        epoch: u64,
        result: Result<(), ApiError>,
    },
    AuthStatus {
        epoch: u64,
        result: Result<bool, ApiError>,
    },
    AuthUrl {
        epoch: u64,
        result: Result<String, ApiError>,
    },
}

/// The room the user is looking at, alive for as long as the Room page is shown
pub struct RoomSession {
    epoch: u64,
    code: String,
    /// Whether the host's Spotify authorization has been checked in this session
    auth_checked: bool,
    pub pollers: RoomPollers,
}

/// RoomSessionSync keeps [State] eventually consistent with the backend.
///
/// Every backend call is spawned onto `tasks`, the owner of the sync drives both `tasks` and
/// the pollers of the current session and feeds the results back through
/// [RoomSessionSync::handle_completion] and [RoomSessionSync::handle_tick].
pub struct RoomSessionSync {
    api: Arc<dyn RoomApi>,
    intervals: PollIntervals,
    state: State,
    /// Incremented for every new session, results from older sessions are dropped
    epoch: u64,
    pub session: Option<RoomSession>,
    pub tasks: JoinSet<Completion>,
}

impl RoomSessionSync {
    pub fn new(api: Arc<dyn RoomApi>, intervals: PollIntervals) -> Self {
        RoomSessionSync {
            api,
            intervals,
            state: State::default(),
            epoch: 0,
            session: None,
            tasks: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Processes an action coming from the UI. [Action::Exit] is handled by the owner.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Navigate { route } => self.state.navigate(route),
            Action::JoinRoom { code } => self.join_room(&code),
            Action::CreateRoom {
                votes_to_skip,
                guest_can_pause,
            } => self.create_room(votes_to_skip, guest_can_pause),
            Action::UpdateRoom {
                votes_to_skip,
                guest_can_pause,
            } => self.update_room(votes_to_skip, guest_can_pause),
            Action::LeaveRoom => self.leave_room(),
            Action::TogglePlayPause => match self.state.playback.as_ref().map(|p| !p.is_playing) {
                Some(target) => self.toggle_play_pause(target),
                None => debug!("nothing to play or pause, no active track"),
            },
            Action::SkipSong => self.skip_song(),
            Action::SetUsername { username } => self.set_username(&username),
            Action::SendChatMessage { message } => self.send_chat_message(&message),
            Action::DismissNotice => self.state.dismiss_notice(),
            Action::DismissAuthRedirect => self.state.dismiss_auth_redirect(),
            Action::Exit => (),
        }

        self.sync_session();
    }

    pub fn handle_tick(&mut self, tick: PollTick) {
        match tick {
            PollTick::Playback => self.poll_playback(),
            PollTick::Room => {
                self.refresh_room_details();
                self.poll_chat();
            }
        }
    }

    /// Asks the backend whether this browser session already belongs to a room
    pub fn resume_session(&mut self) {
        let api = self.api.clone();

        self.spawn(async move { Completion::Resumed(api.user_in_room().await) });
    }

    pub fn join_room(&mut self, code: &str) {
        let code = code.trim().to_string();
        if code.is_empty() {
            self.state.join_error = Some(String::from("Please enter a room code."));
            return;
        }

        info!("joining room {code}");
        let api = self.api.clone();

        self.spawn(async move {
            Completion::Joined(api.join_room(&JoinRoomRequest { code }).await)
        });
    }

    pub fn create_room(&mut self, votes_to_skip: u32, guest_can_pause: bool) {
        if let Err(err) = validate_votes_to_skip(votes_to_skip) {
            self.report(err);
            return;
        }

        info!("creating room, votes to skip: {votes_to_skip}, guest can pause: {guest_can_pause}");
        let api = self.api.clone();
        let request = CreateRoomRequest {
            votes_to_skip,
            guest_can_pause,
        };

        self.spawn(async move {
            let result = api.create_room(&request).await;

            Completion::Created { request, result }
        });
    }

    pub fn update_room(&mut self, votes_to_skip: u32, guest_can_pause: bool) {
        if let Err(err) = validate_votes_to_skip(votes_to_skip) {
            self.report(err);
            return;
        }

        let Some((epoch, code)) = self.current_room() else {
            return;
        };

        info!("updating room {code}");
        let api = self.api.clone();
        let request = UpdateRoomRequest {
            votes_to_skip,
            guest_can_pause,
            code,
        };

        self.spawn(async move {
            Completion::RoomUpdated {
                epoch,
                result: api.update_room(&request).await,
            }
        });
    }

    pub fn refresh_room_details(&mut self) {
        let Some((epoch, code)) = self.current_room() else {
            return;
        };
        let api = self.api.clone();

        self.spawn(async move {
            Completion::RoomDetails {
                epoch,
                result: api.get_room(&code).await,
            }
        });
    }

    pub fn poll_playback(&mut self) {
        let Some((epoch, _)) = self.current_room() else {
            return;
        };
        let ticket = self.state.issue_ticket();
        let api = self.api.clone();

        self.spawn(async move {
            Completion::Playback {
                epoch,
                ticket,
                result: api.current_song().await,
            }
        });
    }

    pub fn poll_chat(&mut self) {
        let Some((epoch, code)) = self.current_room() else {
            return;
        };
        let api = self.api.clone();

        self.spawn(async move {
            Completion::ChatLog {
                epoch,
                result: api.receive_chat(&code).await,
            }
        });
    }

    /// Shows `target` right away and rolls back if the backend refuses it
    pub fn toggle_play_pause(&mut self, target: bool) {
        let Some((epoch, _)) = self.current_room() else {
            return;
        };
        let stamp = self.state.apply_optimistic_playing(target);
        let api = self.api.clone();

        self.spawn(async move {
            let result = if target {
                api.play().await
            } else {
                api.pause().await
            };

            Completion::PlayPause {
                epoch,
                stamp,
                target,
                result,
            }
        });
    }

    /// Votes to skip, the track info only changes with the next poll
    pub fn skip_song(&mut self) {
        let Some((epoch, _)) = self.current_room() else {
            return;
        };
        let api = self.api.clone();

        self.spawn(async move {
            Completion::Skipped {
                epoch,
                result: api.skip().await,
            }
        });
    }

    /// Leaving is best effort, the room is forgotten whatever the backend answers
    pub fn leave_room(&mut self) {
        info!("leaving room {:?}", self.state.room.room_code);
        let api = self.api.clone();

        self.spawn(async move { Completion::Left(api.leave_room().await) });

        self.state.clear_room();
        self.sync_session();
    }

    pub fn set_username(&mut self, username: &str) {
        let username = username.trim();
        if username.is_empty() {
            self.report(SyncError::Validation("Please provide a valid name.".into()));
            return;
        }

        self.state.username = Some(username.to_string());
    }

    pub fn send_chat_message(&mut self, message: &str) {
        let Some(user) = self.state.username.clone() else {
            self.report(SyncError::Validation(
                "Please enter your username before sending a message.".into(),
            ));
            return;
        };

        if message.trim().is_empty() {
            self.report(SyncError::Validation("Message can not be empty.".into()));
            return;
        }

        if message.chars().count() > MAX_CHAT_MESSAGE_LEN {
            self.report(SyncError::Validation(format!(
                "Messages are limited to {MAX_CHAT_MESSAGE_LEN} characters."
            )));
            return;
        }

        let Some((epoch, room_code)) = self.current_room() else {
            return;
        };
        let api = self.api.clone();
        let request = SendChatRequest {
            room_code,
            user,
            message: message.to_string(),
        };

        self.spawn(async move {
            Completion::ChatSent {
                epoch,
                result: api.send_chat(&request).await,
            }
        });
    }

    /// Applies the result of a backend call onto the state
    pub fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Resumed(result) => self.on_resumed(result),
            Completion::Joined(result) => self.on_joined(result),
            Completion::Created { request, result } => self.on_created(request, result),
            Completion::Left(result) => match result {
                Ok(()) => info!("left the room"),
                Err(err) => warn!("leave request failed, room was cleared anyway: {err}"),
            },
            Completion::RoomDetails { epoch, result } if self.is_current(epoch) => {
                self.on_room_details(result)
            }
            Completion::RoomUpdated { epoch, result } if self.is_current(epoch) => match result {
                Ok(()) => {
                    self.state
                        .show_notice(Notice::success("Room updated successfully!"));
                    self.refresh_room_details();
                }
                Err(err) => {
                    warn!("could not update the room: {err}");
                    self.state.show_notice(Notice::error("Error updating room..."));
                }
            },
            Completion::Playback {
                epoch,
                ticket,
                result,
            } if self.is_current(epoch) => self.on_playback(ticket, result),
            Completion::PlayPause {
                epoch,
                stamp,
                target,
                result,
            } if self.is_current(epoch) => {
                if let Err(err) = result {
                    if !self.state.rollback_playing(stamp, target) {
                        debug!("playback changed since the optimistic write, skipping rollback");
                    }

                    let verb = if target { "play" } else { "pause" };
                    self.report(SyncError::Transient(format!(
                        "Could not {verb} the song: {}",
                        err.user_message()
                    )));
                }
            }
            Completion::Skipped { epoch, result } if self.is_current(epoch) => match result {
                Ok(skipped) => self.state.show_notice(Notice::success(skipped.message)),
                Err(err) => self.report(err.into()),
            },
            Completion::ChatLog { epoch, result } if self.is_current(epoch) => match result {
                Ok(messages) => self.state.replace_chat_log(messages),
                Err(err) => warn!("chat poll failed: {err}"),
            },
            Completion::ChatSent { epoch, result } if self.is_current(epoch) => match result {
                Ok(()) => {
                    self.state.mark_chat_message_sent();
                    self.poll_chat();
                }
                Err(err) => {
                    warn!("could not send chat message: {err}");
                    self.state.show_notice(Notice::error("Error sending message"));
                }
            },
            Completion::AuthStatus { epoch, result } if self.is_current(epoch) => match result {
                Ok(true) => debug!("spotify is authenticated"),
                Ok(false) => self.request_auth_redirect(),
                Err(err) => warn!("could not check spotify authentication: {err}"),
            },
            Completion::AuthUrl { epoch, result } if self.is_current(epoch) => match result {
                Ok(url) => {
                    info!("spotify authorization required, redirecting to {url}");
                    self.state.redirect_to_auth(url);
                }
                Err(err) => self.report(SyncError::Transient(format!(
                    "Could not reach Spotify authorization: {}",
                    err.user_message()
                ))),
            },
            late => debug!("dropping result of a torn down room session: {late:?}"),
        }

        self.sync_session();
    }

    fn on_resumed(&mut self, result: Result<UserInRoom, ApiError>) {
        match result {
            Ok(UserInRoom {
                code: Some(code),
                votes_to_skip,
                guest_can_pause,
            }) if self.state.route == Route::Home && self.state.room.room_code.is_none() => {
                info!("session already belongs to room {code}, redirecting");
                let defaults = RoomState::default();

                self.state.enter_room(RoomState {
                    room_code: Some(code),
                    votes_to_skip: votes_to_skip.unwrap_or(defaults.votes_to_skip),
                    guest_can_pause: guest_can_pause.unwrap_or(defaults.guest_can_pause),
                    is_host: false,
                });
            }
            Ok(_) => debug!("no room to resume"),
            Err(err) => warn!("could not check for an existing room: {err}"),
        }
    }

    fn on_joined(&mut self, result: Result<JoinRoomResponse, ApiError>) {
        match result {
            Ok(joined) => {
                info!("joined room {}", joined.code);

                self.state.enter_room(RoomState {
                    room_code: Some(joined.code),
                    votes_to_skip: joined.votes_to_skip,
                    guest_can_pause: joined.guest_can_pause,
                    is_host: false,
                });
            }
            Err(err) => {
                warn!("could not join room: {err}");

                if self.state.route == Route::Join {
                    self.state.join_error = Some(if err.is_response() {
                        SyncError::NotFound.to_string()
                    } else {
                        String::from("An error occurred while joining the room.")
                    });
                }
            }
        }
    }

    fn on_created(
        &mut self,
        request: CreateRoomRequest,
        result: Result<CreateRoomResponse, ApiError>,
    ) {
        match result {
            Ok(created) => {
                info!("created room {}", created.code);

                self.state.enter_room(RoomState {
                    room_code: Some(created.code),
                    votes_to_skip: request.votes_to_skip,
                    guest_can_pause: request.guest_can_pause,
                    is_host: true,
                });
            }
            Err(err) => self.report(SyncError::Transient(format!(
                "Could not create the room: {}",
                err.user_message()
            ))),
        }
    }

    fn on_room_details(&mut self, result: Result<RoomDetails, ApiError>) {
        match result {
            Ok(details) => {
                self.state.update_room_details(
                    details.votes_to_skip,
                    details.guest_can_pause,
                    details.is_host,
                );

                let needs_auth_check = details.is_host && !details.spotify_authenticated;
                if let Some(session) = self.session.as_mut().filter(|s| !s.auth_checked) {
                    session.auth_checked = true;

                    if needs_auth_check {
                        self.check_spotify_authentication();
                    }
                }
            }
            // the room is gone, it is left locally without posting `leave-room`
            Err(err) if err.is_response() => {
                info!(
                    "room {:?} is no longer available ({err}), leaving",
                    self.state.room.room_code
                );
                self.state.clear_room();
                self.state
                    .show_notice(Notice::error("The room is no longer available."));
            }
            Err(err) => warn!("room details poll failed: {err}"),
        }
    }

    fn on_playback(&mut self, ticket: Ticket, result: Result<Option<CurrentSong>, ApiError>) {
        match result {
            Ok(song) => {
                if !self
                    .state
                    .apply_polled_playback(ticket, song.map(PlaybackState::from))
                {
                    debug!("discarding stale playback snapshot");
                }
            }
            Err(ApiError::Unauthenticated) => self.request_auth_redirect(),
            Err(err) => warn!("playback poll failed: {err}"),
        }
    }

    fn check_spotify_authentication(&mut self) {
        let Some((epoch, _)) = self.current_room() else {
            return;
        };
        let api = self.api.clone();

        self.spawn(async move {
            Completion::AuthStatus {
                epoch,
                result: api.is_authenticated().await,
            }
        });
    }

    // one call, one redirect once the url arrives
    fn request_auth_redirect(&mut self) {
        let Some((epoch, _)) = self.current_room() else {
            return;
        };
        let api = self.api.clone();

        self.spawn(async move {
            Completion::AuthUrl {
                epoch,
                result: api.auth_url().await,
            }
        });
    }

    /// Starts or stops the room session so that it exists exactly while the Room page is shown
    fn sync_session(&mut self) {
        let code = match &self.state.route {
            Route::Room { code } => Some(code),
            _ => None,
        };

        match (code, self.session.as_ref()) {
            (Some(code), Some(session)) if session.code == *code => (),
            (Some(code), _) => {
                self.epoch += 1;
                debug!("starting room session {} for room {code}", self.epoch);

                self.session = Some(RoomSession {
                    epoch: self.epoch,
                    code: code.clone(),
                    auth_checked: false,
                    pollers: RoomPollers::start(self.intervals),
                });
            }
            (None, Some(session)) => {
                debug!("stopping room session {}", session.epoch);
                self.session = None;
            }
            (None, None) => (),
        }
    }

    fn current_room(&self) -> Option<(u64, String)> {
        self.session
            .as_ref()
            .map(|session| (session.epoch, session.code.clone()))
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.session
            .as_ref()
            .map(|session| session.epoch == epoch)
            .unwrap_or(false)
    }

    fn report(&mut self, err: SyncError) {
        match &err {
            SyncError::Validation(_) => debug!("rejected input: {err}"),
            _ => warn!("{err}"),
        }

        self.state.show_notice(Notice::error(err.to_string()));
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.tasks.spawn(task);
    }
}

fn validate_votes_to_skip(votes_to_skip: u32) -> Result<(), SyncError> {
    if votes_to_skip < 1 {
        return Err(SyncError::Validation(
            "At least one vote must be required to skip a song.".into(),
        ));
    }

    Ok(())
}
