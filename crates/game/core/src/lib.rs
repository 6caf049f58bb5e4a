//! Pure phase-resolution domain shared by the runtime and offline tools.
//!
//! `game-core` defines what the agent sees (the [`PhaseSnapshot`] captured by an
//! observation port), what it can press ([`Button`]), and the small decision
//! policies that pick shop items, switch targets and moves to forget. Nothing
//! in here performs I/O; the runtime crate drives these types against a live
//! game session.
pub mod button;
pub mod config;
pub mod phase;
pub mod policy;
pub mod reward;
pub mod snapshot;

pub use button::{Button, ButtonError};
pub use config::{
    AgentConfig, ButtonCombos, InputTiming, ItemWeight, ItemWeights, MoveTable, ResolverSettings,
};
pub use phase::Phase;
pub use policy::{
    FORGET_NONE, ItemChoice, LearnerProfile, MoveCategory, MoveForgetStrategy, MoveProfile,
    MovesetEvaluation, MovesetScoring, best_forget_slot, forget_slot, moveset_value, select_item,
    select_switch_target,
};
pub use reward::{RewardBreakdown, RewardWeights};
pub use snapshot::{CombatantHp, CombatantId, HpRatios, LearnMoveContext, PhaseSnapshot, ShopItem};
