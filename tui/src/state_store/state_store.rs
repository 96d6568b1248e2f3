use std::sync::Arc;

use comms::transport::client::RoomApi;
use log::{error, info};
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};

use crate::termination::{Interrupted, Terminator};

use super::{
    action::Action,
    polling::{next_poll, PollIntervals},
    session_sync::RoomSessionSync,
    State,
};

pub struct StateStore {
    state_tx: UnboundedSender<State>,
}

impl StateStore {
    pub fn new() -> (Self, UnboundedReceiver<State>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<State>();

        (StateStore { state_tx }, state_rx)
    }
}

impl StateStore {
    pub async fn main_loop(
        self,
        mut terminator: Terminator,
        api: Arc<dyn RoomApi>,
        intervals: PollIntervals,
        mut action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut sync = RoomSessionSync::new(api, intervals);

        // the initial state once
        self.state_tx.send(sync.state().clone())?;

        // the backend may remember a room from an earlier run
        sync.resume_session();

        let result = loop {
            tokio::select! {
                // Handle the actions coming from the UI
                Some(action) = action_rx.recv() => match action {
                    Action::Exit => {
                        let _ = terminator.terminate(Interrupted::UserInt);

                        break Interrupted::UserInt;
                    },
                    action => sync.handle_action(action),
                },
                // Apply the results of finished backend calls
                Some(joined) = sync.tasks.join_next() => match joined {
                    Ok(completion) => sync.handle_completion(completion),
                    Err(err) => error!("backend task did not finish: {err}"),
                },
                // Poll the room while it is on screen
                tick = next_poll(sync.session.as_mut().map(|session| &mut session.pollers)) => {
                    sync.handle_tick(tick);
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }

            self.state_tx.send(sync.state().clone())?;
        };

        info!("state store stopped: {result:?}");

        Ok(result)
    }
}
