//! Decision policies for the phases the resolver must answer itself.
//!
//! Each policy is a small pure function over a snapshot slice and static
//! configuration:
//!
//! - [`select_item`]: deterministic argmax over the shop's item weights
//! - [`select_switch_target`]: hp-weighted random choice among alive reserves
//! - [`forget_slot`]: which known move to drop when learning a fifth one
//!
//! Random policies take the RNG as a parameter so callers control seeding.
mod item;
mod moves;
mod switch;

pub use item::{ItemChoice, select_item};
pub use moves::{
    FORGET_NONE, LearnerProfile, MoveCategory, MoveForgetStrategy, MoveProfile,
    MovesetEvaluation, MovesetScoring, best_forget_slot, forget_slot, moveset_value,
};
pub use switch::select_switch_target;
