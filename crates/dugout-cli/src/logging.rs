//! Log sink construction.
//!
//! The dispatcher built here is installed only for the duration of a run via
//! [`tracing::dispatcher::with_default`].

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use dugout_core::config::LoggingConfig;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Console subscriber, teed into `logging.file` when one is configured.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn dispatch(config: &LoggingConfig) -> Result<Dispatch, CliError> {
    let level = config.level()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let dispatch = match &config.file {
        Some(path) => {
            let file = open_log_file(path)?;
            Dispatch::new(
                builder
                    .with_ansi(false)
                    .with_writer(std::io::stdout.and(Arc::new(file)))
                    .finish(),
            )
        }
        None => Dispatch::new(builder.finish()),
    };
    Ok(dispatch)
}

fn open_log_file(path: &Path) -> Result<File, CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
