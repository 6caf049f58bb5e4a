//! Content loaders for reading configuration tables from files.
//!
//! Each loader parses one file format into game-core types and also exposes
//! the embedded default compiled from the crate's `data/` directory.

pub mod buttons;
pub mod config;
pub mod factory;
pub mod items;
pub mod moves;

pub use buttons::ButtonComboLoader;
pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use items::ItemWeightLoader;
pub use moves::MoveTableLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
