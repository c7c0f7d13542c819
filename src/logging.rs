use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "todotab.log";

/// Routes tracing output to `<data_dir>/todotab.log`; the terminal belongs to the UI.
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(data_dir: &Path, level: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .try_init()
        .map_err(|e| anyhow!("could not install logger: {e}"))?;
    Ok(path)
}
