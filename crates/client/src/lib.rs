//! Command-line agent that plays recorded sessions through the runtime.
//!
//! The binary wires the pieces together:
//!
//! ```text
//! ReplaySource ─→ SceneObservationPort ─┐
//!                                       ├─→ PhaseResolver ─→ BattleEnv ─→ session::run
//! KeyLog ───────→ KeyEventInput ────────┘
//! ```
//!
//! Configuration comes from the environment (see [`ClientConfig::from_env`]);
//! static tables come from [`game_content`].
pub mod config;
pub mod logging;
pub mod replay;
pub mod session;

pub use config::ClientConfig;
pub use replay::{KeyLog, ReplaySource};
pub use session::{SessionSummary, random_action};
