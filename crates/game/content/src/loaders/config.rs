//! Agent tunables loader.

use std::path::Path;

use game_core::AgentConfig;

use crate::loaders::{LoadResult, read_file};

const EMBEDDED: &str = include_str!("../../data/config.toml");

/// Loader for resolver, input and reward tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<AgentConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn embedded() -> LoadResult<AgentConfig> {
        Self::parse(EMBEDDED)
    }

    pub fn parse(content: &str) -> LoadResult<AgentConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}
