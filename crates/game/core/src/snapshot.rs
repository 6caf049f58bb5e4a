//! Immutable observation of the game at one point in time.
//!
//! A [`PhaseSnapshot`] is produced by an observation port after every input.
//! It carries the phase name plus the small amount of metadata the resolver
//! needs (hp ratios, shop items, learn-move context) and the flat feature
//! vector handed to the learning policy.
use std::fmt;

use crate::phase::Phase;
use crate::policy::MovesetEvaluation;

/// Stable identifier of a combatant across snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub String);

impl CombatantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hit-point ratio of a single combatant, always within `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantHp {
    pub id: CombatantId,
    ratio: f32,
}

impl CombatantHp {
    /// Creates an entry, clamping the ratio into `[0, 1]` (NaN becomes 0).
    pub fn new(id: CombatantId, ratio: f32) -> Self {
        let ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };
        Self { id, ratio }
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn is_fainted(&self) -> bool {
        self.ratio <= 0.0
    }
}

/// Hp ratios for both sides, in party order.
///
/// Player entries cover the whole party, not only the active members, so
/// switch selection can see the reserves.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HpRatios {
    pub enemies: Vec<CombatantHp>,
    pub players: Vec<CombatantHp>,
}

impl HpRatios {
    pub fn enemy(&self, id: &CombatantId) -> Option<f32> {
        Self::find(&self.enemies, id)
    }

    pub fn player(&self, id: &CombatantId) -> Option<f32> {
        Self::find(&self.players, id)
    }

    fn find(entries: &[CombatantHp], id: &CombatantId) -> Option<f32> {
        entries.iter().find(|e| &e.id == id).map(CombatantHp::ratio)
    }
}

/// A single offer in the modifier shop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShopItem {
    pub id: String,
    pub tier: Option<String>,
}

impl ShopItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tier: None,
        }
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }
}

/// Present only while a party member is learning a move.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnMoveContext {
    pub member: CombatantId,
    pub species: Option<u32>,
    /// Number of moves the member currently knows.
    pub known_moves: usize,
    /// Move data for scored forgetting, when the observer could supply it.
    pub evaluation: Option<MovesetEvaluation>,
}

impl LearnMoveContext {
    pub fn new(member: CombatantId, known_moves: usize) -> Self {
        Self {
            member,
            species: None,
            known_moves,
            evaluation: None,
        }
    }
}

/// One observation of the game.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseSnapshot {
    pub phase_name: String,
    pub stage: u32,
    pub is_double_fight: bool,
    pub hp_ratios: HpRatios,
    pub shop_items: Vec<ShopItem>,
    pub learn_move_context: Option<LearnMoveContext>,
    pub feature_vector: Vec<f32>,
}

impl PhaseSnapshot {
    pub fn new(phase_name: impl Into<String>) -> Self {
        Self {
            phase_name: phase_name.into(),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_name(&self.phase_name)
    }

    pub fn same_phase(&self, other: &PhaseSnapshot) -> bool {
        self.phase_name == other.phase_name
    }

    pub fn with_stage(mut self, stage: u32) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_double_fight(mut self, is_double_fight: bool) -> Self {
        self.is_double_fight = is_double_fight;
        self
    }

    pub fn with_enemy(mut self, id: impl Into<String>, ratio: f32) -> Self {
        self.hp_ratios
            .enemies
            .push(CombatantHp::new(CombatantId::new(id), ratio));
        self
    }

    pub fn with_player(mut self, id: impl Into<String>, ratio: f32) -> Self {
        self.hp_ratios
            .players
            .push(CombatantHp::new(CombatantId::new(id), ratio));
        self
    }

    pub fn with_shop_items(mut self, items: Vec<ShopItem>) -> Self {
        self.shop_items = items;
        self
    }

    pub fn with_learn_move(mut self, context: LearnMoveContext) -> Self {
        self.learn_move_context = Some(context);
        self
    }

    pub fn with_features(mut self, features: Vec<f32>) -> Self {
        self.feature_vector = features;
        self
    }
}
