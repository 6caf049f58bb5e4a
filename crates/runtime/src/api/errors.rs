//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the two ports and from scene normalization so the
//! resolver and environment adapter can classify them consistently.
use thiserror::Error;

use game_core::ButtonError;

use crate::observation::SceneError;
use crate::resolver::ResolutionOutcome;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The game hook returned something that is not a valid scene.
    #[error("observation unavailable")]
    ObservationUnavailable(#[source] SceneError),

    /// The game process or hook could not be reached at all.
    #[error("observation source unreachable: {0}")]
    SourceUnreachable(String),

    #[error(transparent)]
    UnknownButton(#[from] ButtonError),

    #[error("input injection failed: {0}")]
    InputFailed(String),

    #[error("{port} port not set")]
    PortNotSet { port: &'static str },

    #[error("battle action {action:?} has no button mapping")]
    InvalidAction { action: [usize; 4] },

    #[error("reset did not reach a battle command (ended with {outcome:?})")]
    ResetFailed { outcome: ResolutionOutcome },
}

impl RuntimeError {
    /// True for failures the resolver treats as "return last known state".
    pub fn is_observation_failure(&self) -> bool {
        matches!(
            self,
            RuntimeError::ObservationUnavailable(_) | RuntimeError::SourceUnreachable(_)
        )
    }
}

impl From<SceneError> for RuntimeError {
    fn from(err: SceneError) -> Self {
        RuntimeError::ObservationUnavailable(err)
    }
}
