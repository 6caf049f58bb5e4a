//! Log setup: stderr plus a per-session file.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform cache directory for logs, `/tmp/pokerogue-agent/logs` as fallback.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "pokerogue-agent")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/pokerogue-agent"))
        .join("logs")
}

/// Session name from the config, or a timestamp.
pub fn session_name(session_id: Option<&str>) -> String {
    match session_id {
        Some(id) => id.to_string(),
        None => {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            format!("session_{secs}")
        }
    }
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole session or buffered file output is lost.
pub fn setup_logging(log_dir: &Path, session: &str) -> Result<WorkerGuard> {
    let session_log_dir = log_dir.join(session);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "agent.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!(session, "logging initialized");
    tracing::info!("log file: {}/agent.log", session_log_dir.display());

    Ok(guard)
}
