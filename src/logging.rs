use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use env_logger::Target;

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizr")
        .join("quizr.log")
}

/// Route `log` records to a file; stdout belongs to the terminal UI.
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init(default_level: &str) -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.parse_filters(default_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(path)
}
