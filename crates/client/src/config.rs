//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;

/// Settings for one agent session.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Directory holding `config.toml`, `items.ron` and `buttons.ron`.
    pub data_dir: Option<PathBuf>,
    /// Recorded scene frames (one JSON object per line) to play against.
    pub replay_file: Option<PathBuf>,
    /// Written with every key event the agent sends.
    pub key_log_file: Option<PathBuf>,
    pub species_embeddings: Option<PathBuf>,
    pub move_embeddings: Option<PathBuf>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    /// Overrides the resolver seed from `config.toml`.
    pub seed: Option<u64>,
    /// Battle steps to play before exiting.
    pub steps: usize,
}

impl ClientConfig {
    pub const DEFAULT_STEPS: usize = 100;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AGENT_DATA_DIR` - Content directory (default: embedded tables)
    /// - `AGENT_REPLAY_FILE` - Scene frames to replay (required)
    /// - `AGENT_KEY_LOG` - File receiving sent key events (default: none)
    /// - `AGENT_SPECIES_EMBEDDINGS` / `AGENT_MOVE_EMBEDDINGS` - JSON tables (default: zeros)
    /// - `AGENT_SESSION_ID` - Log session name (default: timestamp)
    /// - `AGENT_LOG_DIR` - Log root (default: platform cache dir)
    /// - `AGENT_SEED` - Seed for policies and random actions
    /// - `AGENT_STEPS` - Battle steps to play (default: 100)
    pub fn from_env() -> Self {
        Self {
            data_dir: read_path("AGENT_DATA_DIR"),
            replay_file: read_path("AGENT_REPLAY_FILE"),
            key_log_file: read_path("AGENT_KEY_LOG"),
            species_embeddings: read_path("AGENT_SPECIES_EMBEDDINGS"),
            move_embeddings: read_path("AGENT_MOVE_EMBEDDINGS"),
            session_id: env::var("AGENT_SESSION_ID").ok(),
            log_dir: read_path("AGENT_LOG_DIR"),
            seed: read_env::<u64>("AGENT_SEED"),
            steps: read_env::<usize>("AGENT_STEPS").unwrap_or(Self::DEFAULT_STEPS),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}
