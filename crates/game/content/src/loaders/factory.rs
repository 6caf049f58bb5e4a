//! Content factory for loading every table from a data directory.

use std::path::{Path, PathBuf};

use game_core::{AgentConfig, ButtonCombos, ItemWeights, MoveTable};

use crate::loaders::{ButtonComboLoader, ConfigLoader, ItemWeightLoader, LoadResult, MoveTableLoader};

/// All static tables the agent needs.
#[derive(Clone, Debug)]
pub struct Content {
    pub items: ItemWeights,
    pub buttons: ButtonCombos,
    pub moves: MoveTable,
    pub config: AgentConfig,
}

impl Content {
    /// Tables compiled into the crate.
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self {
            items: ItemWeightLoader::embedded()?,
            buttons: ButtonComboLoader::embedded()?,
            moves: MoveTableLoader::embedded()?,
            config: ConfigLoader::embedded()?,
        })
    }
}

/// Content factory that loads tables from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── buttons.ron
/// └── moves.ron
/// ```
///
/// Files missing from the directory fall back to the embedded defaults.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load agent tunables from `config.toml`.
    pub fn load_config(&self) -> LoadResult<AgentConfig> {
        self.load_or_embedded("config.toml", ConfigLoader::load, ConfigLoader::embedded)
    }

    /// Load shop weights from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemWeights> {
        self.load_or_embedded("items.ron", ItemWeightLoader::load, ItemWeightLoader::embedded)
    }

    /// Load button macros from `buttons.ron`.
    pub fn load_buttons(&self) -> LoadResult<ButtonCombos> {
        self.load_or_embedded(
            "buttons.ron",
            ButtonComboLoader::load,
            ButtonComboLoader::embedded,
        )
    }

    /// Load move battle data from `moves.ron`.
    pub fn load_moves(&self) -> LoadResult<MoveTable> {
        self.load_or_embedded("moves.ron", MoveTableLoader::load, MoveTableLoader::embedded)
    }

    pub fn load_all(&self) -> LoadResult<Content> {
        Ok(Content {
            items: self.load_items()?,
            buttons: self.load_buttons()?,
            moves: self.load_moves()?,
            config: self.load_config()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn load_or_embedded<T>(
        &self,
        file: &str,
        load: fn(&Path) -> LoadResult<T>,
        embedded: fn() -> LoadResult<T>,
    ) -> LoadResult<T> {
        let path = self.data_dir.join(file);
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading content override");
            load(&path)
        } else {
            tracing::debug!(file, "no override, using embedded content");
            embedded()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn empty_directory_uses_embedded_tables() {
        let dir = tempfile::tempdir().unwrap();
        let content = ContentFactory::new(dir.path()).load_all().unwrap();

        assert_eq!(content.buttons, ButtonCombos::default());
        assert_eq!(content.config, AgentConfig::default());
        assert!(!content.items.is_empty());
        assert!(content.moves.get(33).is_some());
    }

    #[test]
    fn directory_files_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("items.ron"),
            r#"(ball_marker: "ORB", ball_weight: 2, weights: { "LEFTOVERS": 9 })"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("config.toml"), "[resolver]\nstuck_abort_at = 8\n").unwrap();

        let factory = ContentFactory::new(dir.path());
        let items = factory.load_items().unwrap();
        let config = factory.load_config().unwrap();

        assert_eq!(items.lookup("LEFTOVERS").value(), 9);
        assert_eq!(items.lookup("MASTER_ORB").value(), 2);
        assert_eq!(items.lookup("MASTER_BALL").value(), 0);
        assert_eq!(config.resolver.stuck_abort_at, 8);
    }

    #[test]
    fn malformed_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("buttons.ron"), "(not valid").unwrap();

        assert!(ContentFactory::new(dir.path()).load_buttons().is_err());
    }
}
