use std::io::{self, Stdout};

use anyhow::Context;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use log::{debug, error, warn};
use ratatui::prelude::*;
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver},
};
use tokio_stream::StreamExt;

use crate::{
    state_store::{action::Action, Route, State},
    termination::Interrupted,
    ui_management::components::{Component, ComponentRender},
};

use super::pages::AppRouter;

const APP_TITLE: &str = "House Party";

pub struct UiManager {
    action_tx: mpsc::UnboundedSender<Action>,
}

impl UiManager {
    pub fn new() -> (Self, UnboundedReceiver<Action>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        (Self { action_tx }, action_rx)
    }

    /// Redraws after every key press and every state snapshot, until interrupted.
    ///
    /// The store sends a snapshot at least once per playback poll, which keeps the progress gauge moving.
    pub async fn main_loop(
        self,
        mut state_rx: UnboundedReceiver<State>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let state = state_rx
            .recv()
            .await
            .context("the state store exited before sending the first state")?;
        let mut app_router = AppRouter::new(&state, self.action_tx.clone());
        let mut title = window_title(&state);

        let mut screen = Screen::enter()?;
        screen.set_title(&title)?;
        let mut crossterm_events = EventStream::new();

        loop {
            screen.draw(&app_router)?;

            tokio::select! {
                maybe_event = crossterm_events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => app_router.handle_key_event(key),
                    Some(Ok(Event::Resize(width, height))) => debug!("terminal resized to {width}x{height}"),
                    Some(Ok(_)) => (),
                    Some(Err(err)) => warn!("could not read terminal event: {err}"),
                    None => return Ok(Interrupted::UserInt),
                },
                // a closed channel disables this branch, the store closes it right after broadcasting the interrupt
                Some(state) = state_rx.recv() => {
                    let next_title = window_title(&state);
                    if next_title != title {
                        screen.set_title(&next_title)?;
                        title = next_title;
                    }

                    app_router = app_router.move_with_state(&state);
                },
                Ok(interrupted) = interrupt_rx.recv() => return Ok(interrupted),
            }
        }
    }
}

/// Names the room on screen and flags a pending Spotify authorization
fn window_title(state: &State) -> String {
    let mut title = match &state.route {
        Route::Room { code } => format!("{APP_TITLE}: {code}"),
        _ => String::from(APP_TITLE),
    };

    if state.auth_redirect.is_some() {
        title.push_str(" (authorize Spotify)");
    }

    title
}

/// The alternate screen in raw mode, handed back to the shell when dropped
struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Screen {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
        })
    }

    fn draw(&mut self, app_router: &AppRouter) -> anyhow::Result<()> {
        self.terminal
            .draw(|frame| app_router.render(frame, ()))
            .context("could not render to the terminal")?;

        Ok(())
    }

    fn set_title(&mut self, title: &str) -> anyhow::Result<()> {
        execute!(self.terminal.backend_mut(), SetTitle(title))?;

        Ok(())
    }

    fn leave(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;

        Ok(self.terminal.show_cursor()?)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        match self.leave() {
            Ok(()) => debug!("terminal restored"),
            Err(err) => error!("could not restore the terminal: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::state_store::RoomState;

    use super::*;

    #[test]
    fn test_title_follows_room_and_pending_authorization() {
        let mut state = State::default();
        assert_eq!(window_title(&state), "House Party");

        state.enter_room(RoomState {
            room_code: Some(String::from("QWERTY")),
            ..RoomState::default()
        });
        assert_eq!(window_title(&state), "House Party: QWERTY");

        state.redirect_to_auth(String::from("https://accounts.spotify.com/authorize"));
        assert_eq!(
            window_title(&state),
            "House Party: QWERTY (authorize Spotify)"
        );

        state.clear_room();
        state.dismiss_auth_redirect();
        assert_eq!(window_title(&state), "House Party");
    }
}
