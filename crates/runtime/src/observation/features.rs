//! Fixed-length feature vector handed to the learner.
//!
//! Layout (zero padded when a slot is empty):
//!
//! | slots        | per slot                                                     |
//! |--------------|--------------------------------------------------------------|
//! | 2 enemies    | species embedding (8), hp ratio                              |
//! | 2 players    | species embedding (8), hp ratio, stat shares (6), 4 moves × move embedding (4), visible |
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::scene::{RawPokemon, RawScene};

pub const SPECIES_DIM: usize = 8;
pub const MOVE_DIM: usize = 4;
pub const STAT_COUNT: usize = 6;
pub const MOVE_SLOTS: usize = 4;
pub const SLOTS_PER_SIDE: usize = 2;

pub const ENEMY_SLOT_LEN: usize = SPECIES_DIM + 1;
pub const PLAYER_SLOT_LEN: usize = SPECIES_DIM + 1 + STAT_COUNT + MOVE_SLOTS * MOVE_DIM + 1;
pub const FEATURE_LEN: usize = SLOTS_PER_SIDE * (ENEMY_SLOT_LEN + PLAYER_SLOT_LEN);

/// Lookup of pretrained embeddings. Unknown keys encode as zeros.
pub trait Embeddings: Send + Sync {
    fn species(&self, dex_nr: u32, form_index: u32) -> Option<[f32; SPECIES_DIM]>;
    fn move_embedding(&self, move_id: u32) -> Option<[f32; MOVE_DIM]>;
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("embedding table is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("embedding `{key}` has {found} values, expected {expected}")]
    Dimension {
        key: String,
        expected: usize,
        found: usize,
    },
}

/// In-memory embedding tables.
///
/// Species are keyed `"{dex_nr}-{form_index}"`, moves by their numeric id.
#[derive(Clone, Debug, Default)]
pub struct EmbeddingTables {
    species: HashMap<String, [f32; SPECIES_DIM]>,
    moves: HashMap<u32, [f32; MOVE_DIM]>,
}

impl EmbeddingTables {
    pub fn from_json(species: &str, moves: &str) -> Result<Self, EmbeddingError> {
        let species_raw: HashMap<String, Vec<f32>> = serde_json::from_str(species)?;
        let moves_raw: HashMap<u32, Vec<f32>> = serde_json::from_str(moves)?;

        let species = species_raw
            .into_iter()
            .map(|(key, values)| {
                let embedding = fixed::<SPECIES_DIM>(&key, values)?;
                Ok((key, embedding))
            })
            .collect::<Result<_, EmbeddingError>>()?;
        let moves = moves_raw
            .into_iter()
            .map(|(id, values)| Ok((id, fixed::<MOVE_DIM>(&id.to_string(), values)?)))
            .collect::<Result<_, EmbeddingError>>()?;

        Ok(Self { species, moves })
    }

    pub fn from_files(species: &Path, moves: &Path) -> Result<Self, EmbeddingError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| EmbeddingError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        Self::from_json(&read(species)?, &read(moves)?)
    }

    pub fn species_len(&self) -> usize {
        self.species.len()
    }

    pub fn moves_len(&self) -> usize {
        self.moves.len()
    }
}

impl Embeddings for EmbeddingTables {
    fn species(&self, dex_nr: u32, form_index: u32) -> Option<[f32; SPECIES_DIM]> {
        self.species.get(&format!("{dex_nr}-{form_index}")).copied()
    }

    fn move_embedding(&self, move_id: u32) -> Option<[f32; MOVE_DIM]> {
        self.moves.get(&move_id).copied()
    }
}

fn fixed<const N: usize>(key: &str, values: Vec<f32>) -> Result<[f32; N], EmbeddingError> {
    let found = values.len();
    values.try_into().map_err(|_| EmbeddingError::Dimension {
        key: key.to_string(),
        expected: N,
        found,
    })
}

/// Encodes a scene into a vector of exactly [`FEATURE_LEN`] values.
pub fn encode_features(raw: &RawScene, embeddings: &dyn Embeddings) -> Vec<f32> {
    let mut out = Vec::with_capacity(FEATURE_LEN);

    for slot in 0..SLOTS_PER_SIDE {
        match raw.enemies().get(slot) {
            Some(enemy) => {
                push_species(&mut out, enemy, embeddings);
                out.push(enemy.hp_ratio().clamp(0.0, 1.0));
            }
            None => pad(&mut out, ENEMY_SLOT_LEN),
        }
    }

    for slot in 0..SLOTS_PER_SIDE {
        match raw.players().get(slot) {
            Some(player) => encode_player(&mut out, player, embeddings),
            None => pad(&mut out, PLAYER_SLOT_LEN),
        }
    }

    debug_assert_eq!(out.len(), FEATURE_LEN);
    out
}

fn encode_player(out: &mut Vec<f32>, player: &RawPokemon, embeddings: &dyn Embeddings) {
    push_species(out, player, embeddings);
    out.push(player.hp_ratio().clamp(0.0, 1.0));

    let stats = player.stats.as_deref().unwrap_or_default();
    let total: f32 = stats.iter().take(STAT_COUNT).sum::<f32>().max(1.0);
    for i in 0..STAT_COUNT {
        out.push(stats.get(i).map_or(0.0, |s| s / total));
    }

    let mut moves = player.move_ids();
    for _ in 0..MOVE_SLOTS {
        let embedding = moves
            .next()
            .and_then(|id| embeddings.move_embedding(id))
            .unwrap_or_default();
        out.extend_from_slice(&embedding);
    }

    out.push(if player.visible { 1.0 } else { 0.0 });
}

fn push_species(out: &mut Vec<f32>, pokemon: &RawPokemon, embeddings: &dyn Embeddings) {
    let embedding = pokemon
        .dex_nr
        .and_then(|dex| embeddings.species(dex, pokemon.form_index))
        .unwrap_or_default();
    out.extend_from_slice(&embedding);
}

fn pad(out: &mut Vec<f32>, len: usize) {
    out.resize(out.len() + len, 0.0);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tables() -> EmbeddingTables {
        EmbeddingTables::from_json(
            r#"{"25-0": [1, 1, 1, 1, 1, 1, 1, 1]}"#,
            r#"{"84": [0.5, 0.5, 0.5, 0.5]}"#,
        )
        .unwrap()
    }

    #[test]
    fn layout_constants_add_up() {
        assert_eq!(ENEMY_SLOT_LEN, 9);
        assert_eq!(PLAYER_SLOT_LEN, 32);
        assert_eq!(FEATURE_LEN, 82);
    }

    #[test]
    fn encodes_known_embeddings_in_place() {
        let raw = RawScene::from_value(json!({
            "phase": {"phaseName": "CommandPhase"},
            "enemy": [{"id": 1, "dex_nr": 25, "formIndex": 0, "hp": 5, "stats": [10, 0, 0, 0, 0, 0]}],
            "player": [{"id": 2, "dex_nr": 999, "hp": 10, "stats": [10, 10, 0, 0, 0, 0],
                        "moveset": [{"id": 84}, {"id": 1}], "visible": true}]
        }))
        .unwrap();

        let features = encode_features(&raw, &tables());
        assert_eq!(features.len(), FEATURE_LEN);

        assert_eq!(&features[..SPECIES_DIM], &[1.0; SPECIES_DIM]);
        assert_eq!(features[SPECIES_DIM], 0.5);
        // Second enemy slot is empty.
        assert!(features[ENEMY_SLOT_LEN..2 * ENEMY_SLOT_LEN].iter().all(|v| *v == 0.0));

        let player = &features[2 * ENEMY_SLOT_LEN..2 * ENEMY_SLOT_LEN + PLAYER_SLOT_LEN];
        // Unknown species encodes as zeros.
        assert!(player[..SPECIES_DIM].iter().all(|v| *v == 0.0));
        assert_eq!(player[SPECIES_DIM], 1.0);
        assert_eq!(player[SPECIES_DIM + 1], 0.5);
        assert_eq!(player[SPECIES_DIM + 2], 0.5);
        let moves_at = SPECIES_DIM + 1 + STAT_COUNT;
        assert_eq!(&player[moves_at..moves_at + MOVE_DIM], &[0.5; MOVE_DIM]);
        assert_eq!(player[PLAYER_SLOT_LEN - 1], 1.0);
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let err = EmbeddingTables::from_json(r#"{"1-0": [1, 2]}"#, "{}").unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::Dimension {
                expected: SPECIES_DIM,
                found: 2,
                ..
            }
        ));
    }
}
