//! Logging setup for coopguard using tracing.
//!
//! The server and the client commands log through the same subscriber
//! shape but with different verbosity, console layout, and log file.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Who is logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogProfile {
    /// The long-running exchange server
    Server,
    /// One-shot and interactive client commands
    Client,
}

impl LogProfile {
    /// Filter used when `RUST_LOG` is unset or unusable.
    pub fn default_filter(self) -> &'static str {
        match self {
            Self::Server => "info,coopguard=debug",
            Self::Client => "warn",
        }
    }

    /// Prefix of the daily log file.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Server => "coopguard-server.log",
            Self::Client => "coopguard-client.log",
        }
    }
}

/// Keeps the file writer alive; drop it only at exit.
pub struct LogHandle {
    _guard: WorkerGuard,
    pub dir: PathBuf,
}

/// Install the global subscriber for `profile`.
pub fn init(profile: LogProfile) -> Result<LogHandle> {
    let log_dir = get_log_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, profile.file_name());
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let directives = filter_directives(profile, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    // Client output shares the terminal with verdicts; keep it short.
    let console_layer = match profile {
        LogProfile::Server => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogProfile::Client => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    tracing::debug!("Logging {:?} to {}", profile, log_dir.display());

    Ok(LogHandle {
        _guard: guard,
        dir: log_dir,
    })
}

/// `RUST_LOG` wins when it is set to something non-blank.
fn filter_directives(profile: LogProfile, env: Option<String>) -> String {
    env.filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| profile.default_filter().to_string())
}

fn get_log_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "coopguard", "coopguard")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;

    Ok(dirs.data_dir().join("logs"))
}
