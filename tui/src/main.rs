use std::sync::Arc;

use anyhow::Context;
use comms::transport::client::HttpRoomApi;
use log::info;
use state_store::StateStore;
use termination::{create_termination, Interrupted};
use ui_management::UiManager;

mod config;
mod logging;
mod state_store;
mod termination;
mod ui_management;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::load()?;
    logging::init_logger(&config.log_file, config.log_level)?;
    config.report();

    info!("starting house party against {}", config.api_url);

    let api = HttpRoomApi::new(&config.api_url).context("could not create the backend client")?;

    let (terminator, mut interrupt_rx) = create_termination();
    let (state_store, state_rx) = StateStore::new();
    let (ui_manager, action_rx) = UiManager::new();

    tokio::try_join!(
        state_store.main_loop(
            terminator,
            Arc::new(api),
            config.intervals,
            action_rx,
            interrupt_rx.resubscribe()
        ),
        ui_manager.main_loop(state_rx, interrupt_rx.resubscribe()),
    )?;

    if let Ok(reason) = interrupt_rx.recv().await {
        match reason {
            Interrupted::UserInt => info!("exited per user request"),
            Interrupted::OsSigInt => info!("exited because of an os sig int"),
        }
    } else {
        info!("exited because of an unexpected error");
    }

    Ok(())
}
