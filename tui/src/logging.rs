use std::{fmt::Display, path::Path};

use anyhow::Context;
use log::{Level, LevelFilter};

/// External crates only need to log warnings and errors
const ALLOWED_EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];

/// Installs the global logger, writing to `path` since the terminal belongs to the UI
pub fn init_logger(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let file = fern::log_file(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let target = Target::from_str(record.target());
            let now = chrono::Local::now();

            out.finish(format_args!(
                "{:<5} {} {:^6} {}",
                record.level(),
                now.format("%H:%M:%S"),
                target,
                message
            ))
        })
        .filter(move |meta| {
            let target = Target::from_str(meta.target());

            if target.is_local() {
                meta.level() <= level
            } else {
                ALLOWED_EXTERNAL_LEVELS.contains(&meta.level())
            }
        })
        .chain(file)
        .apply()
        .context("a logger is already installed")
}

#[derive(Debug, PartialEq, Eq)]
enum Target {
    External(String),
    App,
    Comms,
}

impl Target {
    fn from_str(str: &str) -> Self {
        let module = str.split("::").next().unwrap_or_default();

        match module {
            "house_party" => Self::App,
            "comms" => Self::Comms,
            other => Target::External(other.to_string()),
        }
    }

    fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Target::External(x) => x.as_str(),
            Target::App => "APP",
            Target::Comms => "COMMS",
        };

        // pad through the formatter so the alignment flags of the caller apply
        f.pad(result)
    }
}
