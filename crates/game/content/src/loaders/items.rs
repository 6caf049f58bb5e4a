//! Shop item weight loader.

use std::path::Path;

use game_core::ItemWeights;

use crate::loaders::{LoadResult, read_file};

const EMBEDDED: &str = include_str!("../../data/items.ron");

/// Loader for the shop item weight table from RON files.
pub struct ItemWeightLoader;

impl ItemWeightLoader {
    /// Load item weights from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemWeights> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// The table shipped with the crate.
    pub fn embedded() -> LoadResult<ItemWeights> {
        Self::parse(EMBEDDED)
    }

    pub fn parse(content: &str) -> LoadResult<ItemWeights> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item weights RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use game_core::ItemWeight;

    use super::*;

    #[test]
    fn embedded_table_loads() {
        let weights = ItemWeightLoader::embedded().expect("embedded item weights");

        assert!(weights.len() >= 30);
        assert_eq!(weights.lookup("GOLDEN_POKEBALL"), ItemWeight::Known(6));
        assert_eq!(weights.lookup("EXP_SHARE"), ItemWeight::Known(5));
        assert_eq!(weights.lookup("GREAT_BALL"), ItemWeight::Ball(5));
        assert_eq!(weights.lookup("SOMETHING_NEW"), ItemWeight::Unknown);
    }

    #[test]
    fn partial_table_keeps_ball_defaults() {
        let weights = ItemWeightLoader::parse(r#"(weights: { "LEFTOVERS": 3 })"#).unwrap();
        assert_eq!(weights.lookup("LEFTOVERS"), ItemWeight::Known(3));
        assert_eq!(weights.lookup("POKEBALL"), ItemWeight::Ball(5));
    }
}
