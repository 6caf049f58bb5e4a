//! Button combination loader.
//!
//! Combos are written as button names so a typo surfaces as an unknown
//! button error naming the offending entry, rather than a generic parse error.

use std::path::Path;

use anyhow::Context;
use game_core::{Button, ButtonCombos};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

const EMBEDDED: &str = include_str!("../../data/buttons.ron");

/// On-disk shape of `buttons.ron`.
#[derive(Debug, Clone, Deserialize)]
struct ComboTable {
    ongoing_save: Vec<String>,
    first_save: Vec<String>,
    decline: Vec<String>,
    skip_shop: Vec<String>,
    open_fight: Vec<String>,
    select_move: Vec<Vec<String>>,
    select_target: Vec<Vec<String>>,
}

/// Loader for named button combinations from RON files.
pub struct ButtonComboLoader;

impl ButtonComboLoader {
    pub const MOVE_SLOTS: usize = 4;
    pub const TARGETS: usize = 2;

    /// Load button combos from a RON file.
    pub fn load(path: &Path) -> LoadResult<ButtonCombos> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// The combos shipped with the crate.
    pub fn embedded() -> LoadResult<ButtonCombos> {
        Self::parse(EMBEDDED)
    }

    pub fn parse(content: &str) -> LoadResult<ButtonCombos> {
        let table: ComboTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse button combos RON: {}", e))?;

        if table.select_move.len() != Self::MOVE_SLOTS {
            anyhow::bail!(
                "select_move needs {} entries, found {}",
                Self::MOVE_SLOTS,
                table.select_move.len()
            );
        }
        if table.select_target.len() != Self::TARGETS {
            anyhow::bail!(
                "select_target needs {} entries, found {}",
                Self::TARGETS,
                table.select_target.len()
            );
        }

        Ok(ButtonCombos {
            ongoing_save: parse_combo("ongoing_save", &table.ongoing_save)?,
            first_save: parse_combo("first_save", &table.first_save)?,
            decline: parse_combo("decline", &table.decline)?,
            skip_shop: parse_combo("skip_shop", &table.skip_shop)?,
            open_fight: parse_combo("open_fight", &table.open_fight)?,
            select_move: table
                .select_move
                .iter()
                .map(|combo| parse_combo("select_move", combo))
                .collect::<LoadResult<_>>()?,
            select_target: table
                .select_target
                .iter()
                .map(|combo| parse_combo("select_target", combo))
                .collect::<LoadResult<_>>()?,
        })
    }
}

fn parse_combo(name: &str, names: &[String]) -> LoadResult<Vec<Button>> {
    names
        .iter()
        .map(|n| Button::parse(n).with_context(|| format!("in combo `{}`", name)))
        .collect()
}
