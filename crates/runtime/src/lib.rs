//! Async runtime that plays the game through two ports.
//!
//! The game runs out of process. This crate drives it through an
//! [`InputPort`] (button presses) and an [`ObservationPort`] (validated
//! [`PhaseSnapshot`](game_core::PhaseSnapshot)s), and resolves the long
//! stretches of phases that need no learned decision.
//!
//! Modules are organized by responsibility:
//! - [`api`] holds the port traits and error types
//! - [`resolver`] hosts the phase state machine and its builder
//! - [`env`] wraps the resolver behind a step/reset interface for training
//! - [`observation`] turns raw scene JSON into snapshots and feature vectors
//! - [`input`] maps buttons onto raw key events
//! - [`control`] and [`metrics`] carry operator signals and counters
pub mod api;
pub mod control;
pub mod env;
pub mod input;
pub mod metrics;
pub mod observation;
pub mod resolver;

pub use api::{InputPort, ObservationPort, Result, RuntimeError};
pub use control::{CancelToken, OperatorGate};
pub use env::{ACTION_SPACE, BattleAction, BattleEnv, StepInfo, StepResult};
pub use input::{KeyEventInput, KeySink};
pub use metrics::{MetricsSnapshot, ResolverMetrics};
pub use observation::{
    EmbeddingError, EmbeddingTables, Embeddings, FEATURE_LEN, RawScene, SceneError,
    SceneObservationPort, SceneSource,
};
pub use resolver::{
    PhaseResolver, PhaseResolverBuilder, ResolutionOutcome, ResolutionResult, ResolutionState,
    StepOutcome,
};
