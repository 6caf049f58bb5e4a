//! Data-driven configuration tables and loaders.
//!
//! This crate houses the static tables the resolver and policies consume:
//! - Shop item weights (data-driven via RON)
//! - Named button combinations (data-driven via RON)
//! - Move battle data for moveset scoring (data-driven via RON)
//! - Resolver, input and reward tunables (data-driven via TOML)
//!
//! Every table has an embedded default compiled from `data/`; a
//! [`ContentFactory`] pointed at a directory overrides whichever files exist
//! there. Content is injected into the runtime at construction time and never
//! mutated afterwards.

pub mod loaders;

pub use loaders::{
    ButtonComboLoader, ConfigLoader, Content, ContentFactory, ItemWeightLoader, LoadResult,
    MoveTableLoader,
};
