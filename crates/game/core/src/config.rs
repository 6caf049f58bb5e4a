//! Static configuration injected into the resolver and policies.
//!
//! Every table here is immutable once built; loaders in `game-content`
//! produce them from data files and the runtime only ever reads them.
use std::collections::HashMap;
use std::time::Duration;

use crate::button::Button;
use crate::policy::{MoveForgetStrategy, MoveProfile};
use crate::reward::RewardWeights;

/// Outcome of looking up a shop item in [`ItemWeights`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemWeight {
    /// Explicit table entry.
    Known(u32),
    /// Not in the table but carries the ball marker.
    Ball(u32),
    /// Not recognized; weight 0 and worth curating.
    Unknown,
}

impl ItemWeight {
    pub const fn value(self) -> u32 {
        match self {
            ItemWeight::Known(w) | ItemWeight::Ball(w) => w,
            ItemWeight::Unknown => 0,
        }
    }
}

/// Identifier → weight table for the modifier shop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ItemWeights {
    pub weights: HashMap<String, u32>,
    /// Substring marking ball-type items.
    pub ball_marker: String,
    /// Weight given to unlisted items containing the ball marker.
    pub ball_weight: u32,
}

impl ItemWeights {
    pub const DEFAULT_BALL_MARKER: &'static str = "BALL";
    pub const DEFAULT_BALL_WEIGHT: u32 = 5;

    pub fn new(weights: HashMap<String, u32>) -> Self {
        Self {
            weights,
            ball_marker: Self::DEFAULT_BALL_MARKER.to_owned(),
            ball_weight: Self::DEFAULT_BALL_WEIGHT,
        }
    }

    pub fn with_weight(mut self, id: impl Into<String>, weight: u32) -> Self {
        self.weights.insert(id.into(), weight);
        self
    }

    pub fn lookup(&self, id: &str) -> ItemWeight {
        if let Some(&weight) = self.weights.get(id) {
            ItemWeight::Known(weight)
        } else if !self.ball_marker.is_empty() && id.contains(&self.ball_marker) {
            ItemWeight::Ball(self.ball_weight)
        } else {
            ItemWeight::Unknown
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for ItemWeights {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

/// Move id → battle data, used to score candidate movesets.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MoveTable {
    pub moves: HashMap<u32, MoveProfile>,
}

impl MoveTable {
    pub fn with_move(mut self, id: u32, profile: MoveProfile) -> Self {
        self.moves.insert(id, profile);
        self
    }

    pub fn get(&self, id: u32) -> Option<&MoveProfile> {
        self.moves.get(&id)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Named button macros.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ButtonCombos {
    /// Title screen: resume the existing save into a new run.
    pub ongoing_save: Vec<Button>,
    /// Title screen: start a fresh endless run on an empty save slot.
    pub first_save: Vec<Button>,
    /// Answer "no" to a yes/no prompt.
    pub decline: Vec<Button>,
    /// Leave the modifier shop without taking anything.
    pub skip_shop: Vec<Button>,
    /// Open the fight menu from the command menu.
    pub open_fight: Vec<Button>,
    /// Cursor moves selecting move slot 0..4.
    pub select_move: Vec<Vec<Button>>,
    /// Cursor moves selecting enemy target 0..2.
    pub select_target: Vec<Vec<Button>>,
}

impl ButtonCombos {
    pub fn title(&self, ongoing_save: bool) -> &[Button] {
        if ongoing_save {
            &self.ongoing_save
        } else {
            &self.first_save
        }
    }

    pub fn move_slot(&self, slot: usize) -> Option<&[Button]> {
        self.select_move.get(slot).map(Vec::as_slice)
    }

    pub fn target(&self, target: usize) -> Option<&[Button]> {
        self.select_target.get(target).map(Vec::as_slice)
    }
}

impl Default for ButtonCombos {
    fn default() -> Self {
        use Button::*;
        Self {
            ongoing_save: vec![Enter, Enter],
            first_save: vec![
                Space, Down, Down, Down, Space, Left, Space, Space, Space, Space, Space, Space,
                Enter, Space, Up, Space,
            ],
            decline: vec![Down, Space],
            skip_shop: vec![Down, Space],
            open_fight: vec![Left, Up, Space],
            select_move: vec![
                vec![Left, Up, Space],
                vec![Right, Up, Space],
                vec![Left, Down, Space],
                vec![Right, Down, Space],
            ],
            select_target: vec![vec![Left, Space], vec![Right, Space]],
        }
    }
}

/// Tunables of the phase resolver.
///
/// All repeat thresholds are counted in consecutive snapshots with an
/// unchanged phase name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResolverSettings {
    /// Generic phases repeating at least this often back off instead of pressing.
    pub stuck_backoff_from: u32,
    /// Generic phases repeating at least this often abort the chain.
    pub stuck_abort_at: u32,
    /// Shop repeats beyond this wait for the operator.
    pub shop_retry_limit: u32,
    /// Upper bound on handled phases per resolution.
    pub max_iterations: u32,
    /// Optional wall-clock bound per resolution.
    pub deadline_ms: Option<u64>,
    pub backoff_delay_ms: u64,
    /// Pause after observing an unchanged phase.
    pub same_phase_delay_ms: u64,
    /// Confirm presses before the forget-move list appears.
    pub learn_move_prompt_presses: u32,
    /// Resume the existing save on the title screen instead of a fresh slot.
    pub ongoing_save: bool,
    pub forget_strategy: MoveForgetStrategy,
    /// Seed for the random policies; entropy when absent.
    pub seed: Option<u64>,
    /// Party members on the field (double battles use two).
    pub active_slots: usize,
    /// Party index used when no reserve is alive.
    pub backup_slot: usize,
    /// Hold duration passed to every button press.
    pub hold_ms: u64,
}

impl ResolverSettings {
    pub const DEFAULT_STUCK_BACKOFF_FROM: u32 = 2;
    pub const DEFAULT_STUCK_ABORT_AT: u32 = 5;
    pub const DEFAULT_SHOP_RETRY_LIMIT: u32 = 10;
    pub const DEFAULT_MAX_ITERATIONS: u32 = 256;

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn backoff_delay(&self) -> Duration {
        Duration::from_millis(self.backoff_delay_ms)
    }

    pub fn same_phase_delay(&self) -> Duration {
        Duration::from_millis(self.same_phase_delay_ms)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    /// Settings with every delay zeroed, for scripted sessions and tests.
    pub fn instant() -> Self {
        Self {
            backoff_delay_ms: 0,
            same_phase_delay_ms: 0,
            hold_ms: 0,
            ..Self::default()
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            stuck_backoff_from: Self::DEFAULT_STUCK_BACKOFF_FROM,
            stuck_abort_at: Self::DEFAULT_STUCK_ABORT_AT,
            shop_retry_limit: Self::DEFAULT_SHOP_RETRY_LIMIT,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            deadline_ms: None,
            backoff_delay_ms: 1_000,
            same_phase_delay_ms: 500,
            learn_move_prompt_presses: 4,
            ongoing_save: true,
            forget_strategy: MoveForgetStrategy::UniformRandom,
            seed: None,
            active_slots: 2,
            backup_slot: 1,
            hold_ms: 80,
        }
    }
}

/// Key event timing for input ports that inject raw key events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct InputTiming {
    /// Delay after key-up before the next input.
    pub settle_ms: u64,
}

impl InputTiming {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for InputTiming {
    fn default() -> Self {
        Self { settle_ms: 100 }
    }
}

/// Top-level tunables file (`config.toml`).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AgentConfig {
    pub resolver: ResolverSettings,
    pub input: InputTiming,
    pub reward: RewardWeights,
}
