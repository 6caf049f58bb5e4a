//! Move data loader.

use std::path::Path;

use game_core::MoveTable;

use crate::loaders::{LoadResult, read_file};

const EMBEDDED: &str = include_str!("../../data/moves.ron");

/// Loader for the move id → battle data table from RON files.
pub struct MoveTableLoader;

impl MoveTableLoader {
    pub fn load(path: &Path) -> LoadResult<MoveTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn embedded() -> LoadResult<MoveTable> {
        Self::parse(EMBEDDED)
    }

    pub fn parse(content: &str) -> LoadResult<MoveTable> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse move table RON: {}", e))
    }
}
