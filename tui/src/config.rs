use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use log::{info, LevelFilter};

use crate::state_store::PollIntervals;

/// Settings read from the environment, a `.env` file in the working directory is honored
#[derive(Debug, Clone)]
pub struct Config {
    /// Base url of the room backend
    pub api_url: String,
    pub intervals: PollIntervals,
    /// Where log lines go, the terminal belongs to the UI
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    dotenv_loaded: bool,
    /// Keys that were not set, with the default used instead
    defaulted: Vec<(&'static str, &'static str)>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // a missing .env file is fine, everything has a default
        let dotenv_loaded = dotenv::dotenv().is_ok();
        let mut defaulted = Vec::new();

        let api_url = try_load(&mut defaulted, "HOUSE_PARTY_API_URL", "http://localhost:8000")?;
        let playback_ms: u64 = try_load(&mut defaulted, "HOUSE_PARTY_PLAYBACK_POLL_MS", "1000")?;
        let room_ms: u64 = try_load(&mut defaulted, "HOUSE_PARTY_ROOM_POLL_MS", "2000")?;
        let log_file = try_load(&mut defaulted, "HOUSE_PARTY_LOG_FILE", "house-party.log")?;
        let log_level = try_load(&mut defaulted, "HOUSE_PARTY_LOG_LEVEL", "info")?;

        if playback_ms == 0 || room_ms == 0 {
            anyhow::bail!("poll intervals must be greater than zero");
        }

        Ok(Self {
            api_url,
            intervals: PollIntervals {
                playback: Duration::from_millis(playback_ms),
                room: Duration::from_millis(room_ms),
            },
            log_file,
            log_level,
            dotenv_loaded,
            defaulted,
        })
    }

    /// Logs where the settings came from, to be called once the logger is installed
    pub fn report(&self) {
        if self.dotenv_loaded {
            info!("loaded settings from .env");
        }

        for (key, default) in &self.defaulted {
            info!("{key} not set, using default: {default}");
        }
    }
}

fn try_load<T: FromStr>(
    defaulted: &mut Vec<(&'static str, &'static str)>,
    key: &'static str,
    default: &'static str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        defaulted.push((key, default));
        default.to_string()
    });

    raw.parse::<T>()
        .map_err(|err| anyhow::anyhow!("{err}"))
        .with_context(|| format!("invalid {key} value: {raw}"))
}
