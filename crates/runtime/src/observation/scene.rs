//! Raw scene payload and its normalization into a [`PhaseSnapshot`].
//!
//! The in-page hook serializes the game scene as JSON. Field presence varies
//! with the phase (there is no battle on the title screen), so container
//! fields are optional, but anything that is present must be well formed.
//! Every mismatch becomes a [`SceneError`]; nothing is silently guessed.
use game_core::{
    CombatantHp, CombatantId, FORGET_NONE, HpRatios, LearnMoveContext, LearnerProfile, MoveTable,
    MovesetEvaluation, Phase, PhaseSnapshot, ShopItem,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::features::{Embeddings, encode_features};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene hook returned no data")]
    Empty,

    #[error("scene payload is malformed")]
    Malformed(#[source] serde_json::Error),

    #[error("{side}[{index}] is missing `{field}`")]
    MissingField {
        side: Side,
        index: usize,
        field: &'static str,
    },

    #[error("{side}[{index}] has an unusable id `{value}`")]
    InvalidId {
        side: Side,
        index: usize,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Enemy,
    Player,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::Enemy => "enemy",
            Side::Player => "player",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawScene {
    pub phase: RawPhase,
    #[serde(rename = "metaData", default)]
    pub meta: Option<RawMeta>,
    #[serde(rename = "shopItems", default)]
    pub shop_items: Option<Vec<RawShopItem>>,
    #[serde(default)]
    pub enemy: Option<Vec<RawPokemon>>,
    #[serde(default)]
    pub player: Option<Vec<RawPokemon>>,
    /// Move offered during the learn-move phase.
    #[serde(rename = "learnMove", default)]
    pub learn_move: Option<RawMove>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhase {
    #[serde(rename = "phaseName")]
    pub phase_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMeta {
    #[serde(rename = "waveIndex", default)]
    pub wave_index: u32,
    #[serde(rename = "isDoubleFight", default)]
    pub is_double_fight: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawShopItem {
    pub id: String,
    #[serde(default)]
    pub tier: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPokemon {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub dex_nr: Option<u32>,
    #[serde(rename = "formIndex", default)]
    pub form_index: u32,
    #[serde(default)]
    pub hp: Option<f32>,
    #[serde(default)]
    pub stats: Option<Vec<f32>>,
    #[serde(default)]
    pub moveset: Option<Vec<Option<RawMove>>>,
    #[serde(default)]
    pub visible: bool,
    /// Damage types, e.g. `["fire", "flying"]`.
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMove {
    #[serde(default)]
    pub id: Option<u32>,
}

impl RawPokemon {
    /// Move ids of the known moves, skipping empty slots.
    pub fn move_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.moveset
            .iter()
            .flatten()
            .filter_map(|m| m.as_ref().and_then(|m| m.id))
    }

    pub(crate) fn max_hp(&self) -> f32 {
        self.stats
            .as_ref()
            .and_then(|s| s.first().copied())
            .unwrap_or(0.0)
            .max(1.0)
    }

    pub(crate) fn hp_ratio(&self) -> f32 {
        self.hp.unwrap_or(0.0) / self.max_hp()
    }

    fn learner_profile(&self) -> Option<LearnerProfile> {
        let stats = self.stats.as_deref()?;
        Some(LearnerProfile {
            attack: *stats.get(STAT_ATTACK)?,
            special_attack: *stats.get(STAT_SPECIAL_ATTACK)?,
            types: self.types.clone(),
        })
    }
}

// Stat order of the hook: hp, atk, def, spatk, spdef, spd.
const STAT_ATTACK: usize = 1;
const STAT_SPECIAL_ATTACK: usize = 3;

impl RawScene {
    pub fn from_value(value: Value) -> Result<Self, SceneError> {
        if value.is_null() {
            return Err(SceneError::Empty);
        }
        serde_json::from_value(value).map_err(SceneError::Malformed)
    }

    pub fn enemies(&self) -> &[RawPokemon] {
        self.enemy.as_deref().unwrap_or_default()
    }

    pub fn players(&self) -> &[RawPokemon] {
        self.player.as_deref().unwrap_or_default()
    }
}

/// Validates a raw scene and builds the snapshot the resolver consumes.
///
/// `moves` supplies the data for scored move forgetting; a learn-move context
/// only carries an evaluation when the lead knows four moves and every one of
/// them, plus the offered move, is in the table.
pub fn normalize(
    raw: &RawScene,
    embeddings: &dyn Embeddings,
    moves: &MoveTable,
) -> Result<PhaseSnapshot, SceneError> {
    let hp_ratios = HpRatios {
        enemies: hp_entries(Side::Enemy, raw.enemies())?,
        players: hp_entries(Side::Player, raw.players())?,
    };

    let shop_items = raw
        .shop_items
        .iter()
        .flatten()
        .map(|item| ShopItem {
            id: item.id.clone(),
            tier: item.tier.as_ref().map(value_label),
        })
        .collect();

    let learn_move_context = if Phase::from_name(&raw.phase.phase_name) == Phase::LearnMove {
        // The hook does not say which member is learning; the lead is the
        // usual learner.
        raw.players().first().zip(hp_ratios.players.first()).map(|(lead, hp)| {
            let mut context = LearnMoveContext::new(hp.id.clone(), lead.move_ids().count());
            context.species = lead.dex_nr;
            context.evaluation = moveset_evaluation(lead, raw.learn_move.as_ref(), moves);
            context
        })
    } else {
        None
    };

    let (stage, is_double_fight) = raw
        .meta
        .as_ref()
        .map(|m| (m.wave_index, m.is_double_fight))
        .unwrap_or_default();

    Ok(PhaseSnapshot {
        phase_name: raw.phase.phase_name.clone(),
        stage,
        is_double_fight,
        hp_ratios,
        shop_items,
        learn_move_context,
        feature_vector: encode_features(raw, embeddings),
    })
}

fn moveset_evaluation(
    lead: &RawPokemon,
    offered: Option<&RawMove>,
    moves: &MoveTable,
) -> Option<MovesetEvaluation> {
    let candidate = moves.get(offered?.id?)?.clone();
    let current = lead
        .move_ids()
        .map(|id| moves.get(id).cloned())
        .collect::<Option<Vec<_>>>()?;
    if current.len() != FORGET_NONE {
        return None;
    }

    Some(MovesetEvaluation {
        learner: lead.learner_profile()?,
        current,
        candidate,
    })
}

fn hp_entries(side: Side, pokemon: &[RawPokemon]) -> Result<Vec<CombatantHp>, SceneError> {
    pokemon
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let id = match &p.id {
                Some(value) => combatant_id(side, index, value)?,
                None => {
                    return Err(SceneError::MissingField {
                        side,
                        index,
                        field: "id",
                    });
                }
            };
            if p.hp.is_none() {
                return Err(SceneError::MissingField {
                    side,
                    index,
                    field: "hp",
                });
            }
            if p.stats.as_ref().is_none_or(|s| s.is_empty()) {
                return Err(SceneError::MissingField {
                    side,
                    index,
                    field: "stats",
                });
            }
            Ok(CombatantHp::new(id, p.hp_ratio()))
        })
        .collect()
}

fn combatant_id(side: Side, index: usize, value: &Value) -> Result<CombatantId, SceneError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(CombatantId::new(s.clone())),
        Value::Number(n) => Ok(CombatantId::new(n.to_string())),
        other => Err(SceneError::InvalidId {
            side,
            index,
            value: other.to_string(),
        }),
    }
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
