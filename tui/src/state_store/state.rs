use circular_queue::CircularQueue;
use comms::{chat::ChatMessage, spotify::CurrentSong};

const MAX_CHAT_MESSAGES_TO_STORE: usize = 100;

const DEFAULT_VOTES_TO_SKIP: u32 = 2;

/// Page the user is looking at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Join,
    Create,
    Info,
    Room { code: String },
}

/// RoomState is the local belief about the room the session belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    /// Code of the room, `None` when the session is not in a room
    pub room_code: Option<String>,
    /// Guest votes required to skip the current song
    pub votes_to_skip: u32,
    /// Whether guests may play and pause the music
    pub guest_can_pause: bool,
    /// Whether this session created the room
    pub is_host: bool,
}

impl Default for RoomState {
    fn default() -> Self {
        RoomState {
            room_code: None,
            votes_to_skip: DEFAULT_VOTES_TO_SKIP,
            guest_can_pause: true,
            is_host: false,
        }
    }
}

/// PlaybackState is the last known state of the track playing in the room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    /// Skip votes cast for the current track
    pub votes: u32,
    pub votes_required: u32,
}

impl PlaybackState {
    /// Progress through the track in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }

        (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }
}

impl From<CurrentSong> for PlaybackState {
    fn from(song: CurrentSong) -> Self {
        PlaybackState {
            title: song.title,
            artist: song.artist,
            image_url: song.image_url,
            is_playing: song.is_playing,
            position_ms: song.position_ms,
            duration_ms: song.duration_ms,
            votes: song.votes,
            votes_required: song.votes_required,
        }
    }
}

/// Ticket stamped on every playback poll when it is issued.
///
/// A poll answer older than one already applied describes an older server state and is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Position of an applied playback write in application order.
///
/// An optimistic write may only be rolled back while it is still the last applied write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStamp(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message for the user, replaced by the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// State holds the state of the application
#[derive(Debug, Clone)]
pub struct State {
    /// Currently displayed page
    pub route: Route,
    pub room: RoomState,
    /// `None` until a poll reports an active track
    pub playback: Option<PlaybackState>,
    /// Newest chat messages of the room, oldest first when iterated with `asc_iter`
    pub chat_log: CircularQueue<ChatMessage>,
    /// Name used when sending chat messages
    pub username: Option<String>,
    /// Inline error of the join form
    pub join_error: Option<String>,
    pub notice: Option<Notice>,
    /// Authorization url the user has to open, set by a redirect trigger
    pub auth_redirect: Option<String>,
    /// Number of redirect triggers since start-up
    pub auth_redirects: usize,
    /// Number of sent chat messages, lets the input box know when to clear
    pub chat_messages_sent: usize,
    issued_ticket: Ticket,
    polled_ticket: Ticket,
    last_write: WriteStamp,
}

impl Default for State {
    fn default() -> Self {
        State {
            route: Route::Home,
            room: RoomState::default(),
            playback: None,
            chat_log: CircularQueue::with_capacity(MAX_CHAT_MESSAGES_TO_STORE),
            username: None,
            join_error: None,
            notice: None,
            auth_redirect: None,
            auth_redirects: 0,
            chat_messages_sent: 0,
            issued_ticket: Ticket::default(),
            polled_ticket: Ticket::default(),
            last_write: WriteStamp::default(),
        }
    }
}

impl State {
    /// Moves to the given page. Home redirects into the room while the session is in one.
    pub fn navigate(&mut self, route: Route) {
        self.route = match (route, self.room.room_code.as_ref()) {
            (Route::Home, Some(code)) => Route::Room { code: code.clone() },
            (route, _) => route,
        };

        if self.route != Route::Join {
            self.join_error = None;
        }
    }

    /// Populates the room and moves into it
    pub fn enter_room(&mut self, room: RoomState) {
        let code = room.room_code.clone();
        self.room = room;
        self.join_error = None;

        if let Some(code) = code {
            self.route = Route::Room { code };
        }
    }

    /// Forgets the room and everything observed inside it, then moves home
    pub fn clear_room(&mut self) {
        self.room = RoomState::default();
        self.playback = None;
        self.chat_log.clear();
        self.route = Route::Home;
    }

    /// Applies settings reported by the backend, the code is not part of the report
    pub fn update_room_details(&mut self, votes_to_skip: u32, guest_can_pause: bool, is_host: bool) {
        self.room.votes_to_skip = votes_to_skip;
        self.room.guest_can_pause = guest_can_pause;
        self.room.is_host = is_host;
    }

    /// Replaces the chat log wholesale, the last fetch wins
    pub fn replace_chat_log(&mut self, messages: Vec<ChatMessage>) {
        self.chat_log.clear();

        for message in messages {
            self.chat_log.push(message);
        }
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Presents the authorization url to the user, one call is one redirect trigger
    pub fn redirect_to_auth(&mut self, url: String) {
        self.auth_redirect = Some(url);
        self.auth_redirects += 1;
    }

    pub fn dismiss_auth_redirect(&mut self) {
        self.auth_redirect = None;
    }

    /// Hands out the next poll ticket, to be called when the poll is issued
    pub fn issue_ticket(&mut self) -> Ticket {
        self.issued_ticket = Ticket(self.issued_ticket.0 + 1);

        self.issued_ticket
    }

    fn stamp_write(&mut self) -> WriteStamp {
        self.last_write = WriteStamp(self.last_write.0 + 1);

        self.last_write
    }

    /// Applies a polled playback snapshot. `None` means no active track and leaves everything untouched.
    ///
    /// Polls are ordered among themselves by issuance, against optimistic writes by arrival:
    /// a snapshot arriving after an optimistic write replaces it and blocks its rollback.
    /// Returns false when a newer poll has already been applied.
    pub fn apply_polled_playback(&mut self, ticket: Ticket, playback: Option<PlaybackState>) -> bool {
        let Some(playback) = playback else {
            return true;
        };

        if ticket <= self.polled_ticket {
            return false;
        }

        self.polled_ticket = ticket;
        self.stamp_write();
        self.playback = Some(playback);

        true
    }

    /// Sets `is_playing` before the backend confirms it
    pub fn apply_optimistic_playing(&mut self, is_playing: bool) -> WriteStamp {
        if let Some(playback) = self.playback.as_mut() {
            playback.is_playing = is_playing;
        }

        self.stamp_write()
    }

    /// Undoes the optimistic write `stamp`, unless any write has landed since.
    pub fn rollback_playing(&mut self, stamp: WriteStamp, attempted: bool) -> bool {
        if self.last_write != stamp {
            return false;
        }

        if let Some(playback) = self.playback.as_mut() {
            playback.is_playing = !attempted;
        }

        true
    }

    pub fn mark_chat_message_sent(&mut self) {
        self.chat_messages_sent += 1;
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn playback(is_playing: bool) -> PlaybackState {
        PlaybackState {
            title: "Song".into(),
            artist: "Band".into(),
            image_url: String::new(),
            is_playing,
            position_ms: 1_000,
            duration_ms: 200_000,
            votes: 0,
            votes_required: 2,
        }
    }

    fn message(user: &str, text: &str) -> ChatMessage {
        ChatMessage {
            user: user.into(),
            message: text.into(),
            timestamp: "2024-10-01T10:00:00Z".into(),
        }
    }

    #[test]
    fn test_home_redirects_into_room() {
        let mut state = State::default();
        state.enter_room(RoomState {
            room_code: Some("ABCD".into()),
            ..RoomState::default()
        });

        state.navigate(Route::Home);

        assert_eq!(state.route, Route::Room { code: "ABCD".into() });
    }

    #[test]
    fn test_home_without_room_stays_home() {
        let mut state = State::default();
        state.navigate(Route::Join);
        state.join_error = Some("Room not found.".into());

        state.navigate(Route::Home);

        assert_eq!(state.route, Route::Home);
        assert_eq!(state.join_error, None);
    }

    #[test]
    fn test_clear_room_forgets_everything_in_it() {
        let mut state = State::default();
        state.enter_room(RoomState {
            room_code: Some("ABCD".into()),
            votes_to_skip: 5,
            guest_can_pause: false,
            is_host: true,
        });
        state.playback = Some(playback(true));
        state.replace_chat_log(vec![message("ana", "hi")]);

        state.clear_room();

        assert_eq!(state.room, RoomState::default());
        assert_eq!(state.playback, None);
        assert!(state.chat_log.is_empty());
        assert_eq!(state.route, Route::Home);
    }

    #[test]
    fn test_chat_log_is_replaced_and_bounded() {
        let mut state = State::default();
        state.replace_chat_log(vec![message("ana", "old")]);

        let messages = (0..150)
            .map(|idx| message("bo", &format!("msg-{idx}")))
            .collect();
        state.replace_chat_log(messages);

        let stored: Vec<&str> = state
            .chat_log
            .asc_iter()
            .map(|message| message.message.as_str())
            .collect();
        assert_eq!(stored.len(), MAX_CHAT_MESSAGES_TO_STORE);
        assert_eq!(stored.first(), Some(&"msg-50"));
        assert_eq!(stored.last(), Some(&"msg-149"));
    }

    #[test]
    fn test_no_track_poll_leaves_playback_untouched() {
        let mut state = State::default();
        let ticket = state.issue_ticket();
        state.apply_polled_playback(ticket, Some(playback(true)));
        let before = state.clone();

        let later = state.issue_ticket();
        assert!(state.apply_polled_playback(later, None));

        assert_eq!(state.playback, before.playback);
        assert_eq!(state.polled_ticket, before.polled_ticket);
        assert_eq!(state.last_write, before.last_write);
    }

    #[test]
    fn test_stale_poll_is_discarded() {
        let mut state = State::default();
        let stale = state.issue_ticket();
        let fresh = state.issue_ticket();

        assert!(state.apply_polled_playback(fresh, Some(playback(true))));
        assert!(!state.apply_polled_playback(stale, Some(playback(false))));

        assert_eq!(state.playback.map(|p| p.is_playing), Some(true));
    }

    #[test]
    fn test_poll_arriving_after_optimistic_write_replaces_it() {
        let mut state = State::default();
        let first = state.issue_ticket();
        state.apply_polled_playback(first, Some(playback(false)));

        let in_flight = state.issue_ticket();
        state.apply_optimistic_playing(true);

        assert!(state.apply_polled_playback(in_flight, Some(playback(false))));
        assert_eq!(state.playback.map(|p| p.is_playing), Some(false));
    }

    #[test]
    fn test_poll_issued_before_write_but_arriving_after_blocks_rollback() {
        let mut state = State::default();
        let first = state.issue_ticket();
        state.apply_polled_playback(first, Some(playback(false)));

        let in_flight = state.issue_ticket();
        let optimistic = state.apply_optimistic_playing(true);
        assert!(state.apply_polled_playback(in_flight, Some(playback(true))));
        assert!(!state.rollback_playing(optimistic, true));

        assert_eq!(state.playback.map(|p| p.is_playing), Some(true));
    }

    #[test]
    fn test_rollback_reverts_optimistic_write() {
        let mut state = State::default();
        let first = state.issue_ticket();
        state.apply_polled_playback(first, Some(playback(false)));

        let ticket = state.apply_optimistic_playing(true);
        assert!(state.rollback_playing(ticket, true));

        assert_eq!(state.playback.map(|p| p.is_playing), Some(false));
    }

    #[test]
    fn test_poll_between_optimistic_write_and_rollback_wins() {
        let mut state = State::default();
        let first = state.issue_ticket();
        state.apply_polled_playback(first, Some(playback(false)));

        let optimistic = state.apply_optimistic_playing(true);
        let poll = state.issue_ticket();
        assert!(state.apply_polled_playback(poll, Some(playback(true))));
        assert!(!state.rollback_playing(optimistic, true));

        assert_eq!(state.playback.map(|p| p.is_playing), Some(true));
    }

    #[test]
    fn test_newer_optimistic_write_blocks_older_rollback() {
        let mut state = State::default();
        let first = state.issue_ticket();
        state.apply_polled_playback(first, Some(playback(false)));

        let play = state.apply_optimistic_playing(true);
        let pause = state.apply_optimistic_playing(false);
        assert!(!state.rollback_playing(play, true));
        assert_eq!(state.playback.as_ref().map(|p| p.is_playing), Some(false));

        assert!(state.rollback_playing(pause, false));
        assert_eq!(state.playback.map(|p| p.is_playing), Some(true));
    }

    /// A write that was started and may later complete
    enum Pending {
        Poll { ticket: Ticket, is_playing: bool },
        Toggle {
            stamp: WriteStamp,
            target: bool,
            fails: bool,
            writes_before: usize,
        },
    }

    #[test]
    fn test_random_interleavings_end_on_last_arrived_write() {
        let mut rng = rand::thread_rng();

        for _ in 0..500 {
            let mut state = State::default();
            let ticket = state.issue_ticket();
            state.apply_polled_playback(ticket, Some(playback(false)));

            let mut pending: Vec<Pending> = Vec::new();
            let mut last_applied: Option<bool> = Some(false);
            let mut newest_polled = ticket;
            // writes applied so far, in arrival order
            let mut writes = 0usize;

            for _ in 0..20 {
                let start_new = pending.is_empty() || rng.gen_bool(0.5);

                if start_new {
                    if rng.gen_bool(0.5) {
                        pending.push(Pending::Poll {
                            ticket: state.issue_ticket(),
                            is_playing: rng.gen(),
                        });
                    } else {
                        let target = rng.gen();
                        let stamp = state.apply_optimistic_playing(target);
                        writes += 1;
                        last_applied = Some(target);
                        pending.push(Pending::Toggle {
                            stamp,
                            target,
                            fails: rng.gen(),
                            writes_before: writes,
                        });
                    }
                } else {
                    // complete some in-flight request, in any order
                    let idx = rng.gen_range(0..pending.len());

                    match pending.swap_remove(idx) {
                        Pending::Poll { ticket, is_playing } => {
                            let applied =
                                state.apply_polled_playback(ticket, Some(playback(is_playing)));
                            assert_eq!(applied, ticket > newest_polled);

                            if applied {
                                newest_polled = ticket;
                                writes += 1;
                                last_applied = Some(is_playing);
                            }
                        }
                        Pending::Toggle {
                            stamp,
                            target,
                            fails,
                            writes_before,
                        } => {
                            if fails {
                                let rolled_back = state.rollback_playing(stamp, target);
                                // only while nothing landed after the optimistic write
                                assert_eq!(rolled_back, writes == writes_before);

                                if rolled_back {
                                    last_applied = Some(!target);
                                }
                            }
                        }
                    }
                }

                assert_eq!(state.playback.as_ref().map(|p| p.is_playing), last_applied);
            }
        }
    }
}
