use super::Route;

#[derive(Debug, Clone)]
pub enum Action {
    Navigate { route: Route },
    JoinRoom { code: String },
    CreateRoom { votes_to_skip: u32, guest_can_pause: bool },
    UpdateRoom { votes_to_skip: u32, guest_can_pause: bool },
    LeaveRoom,
    TogglePlayPause,
    SkipSong,
    SetUsername { username: String },
    SendChatMessage { message: String },
    DismissNotice,
    DismissAuthRedirect,
    Exit,
}
