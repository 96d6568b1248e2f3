pub mod action;
mod error;
mod polling;
mod session_sync;
mod state;
#[allow(clippy::module_inception)]
mod state_store;

pub use self::{
    error::SyncError,
    polling::PollIntervals,
    session_sync::{RoomSessionSync, MAX_CHAT_MESSAGE_LEN},
    state::{Notice, NoticeKind, PlaybackState, RoomState, Route, State},
    state_store::StateStore,
};
