use game_core::PhaseSnapshot;
use tokio::time::Instant;

/// Bookkeeping for one `resolve` call. Created fresh per call, dropped on
/// return.
#[derive(Clone, Debug, Default)]
pub struct ResolutionState {
    /// Consecutive observations with an unchanged phase name.
    pub repeat_count: u32,
    /// Set once the title screen was reached. Never cleared.
    pub terminated: bool,
    /// Snapshot captured when the run ended, kept for reward computation.
    pub last_decision_snapshot: Option<PhaseSnapshot>,
    /// Handler invocations so far.
    pub iterations: u32,
    /// Buttons pressed so far.
    pub presses: u32,
    /// Wall-clock bound for the whole call.
    pub deadline: Option<Instant>,
}

impl ResolutionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Option<Instant>) -> Self {
        Self {
            deadline,
            ..Self::default()
        }
    }

    /// Updates the repeat counter from the phase just handled and the one
    /// observed afterwards. Returns `true` on a transition.
    pub fn record_observation(&mut self, handled: &PhaseSnapshot, observed: &PhaseSnapshot) -> bool {
        if handled.same_phase(observed) {
            self.repeat_count += 1;
            false
        } else {
            self.repeat_count = 0;
            true
        }
    }

    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub(crate) fn mark_terminated(&mut self, snapshot: &PhaseSnapshot) {
        self.terminated = true;
        self.last_decision_snapshot = Some(snapshot.clone());
    }
}

/// Why a `resolve` call returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The battle command phase was reached; the caller picks the next action.
    CommandPhase,
    /// The title screen was reached; the run is over.
    Terminated,
    /// The same phase repeated past the abort threshold.
    Stuck { phase: String, repeats: u32 },
    /// An observation or input call failed; the last known state is returned.
    ObservationFailed,
    Cancelled,
    DeadlineExceeded,
    /// `max_iterations` handler invocations without reaching an exit phase.
    IterationLimit,
}

impl ResolutionOutcome {
    /// True when control came back without reaching an exit phase.
    pub fn is_abort(&self) -> bool {
        !matches!(self, ResolutionOutcome::CommandPhase | ResolutionOutcome::Terminated)
    }
}

/// What `resolve` hands back to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionResult {
    /// True iff the chain observed the title screen.
    pub terminated: bool,
    /// Snapshot the caller should score and act on: the title-phase capture
    /// when terminated, the last observation otherwise.
    pub final_snapshot: PhaseSnapshot,
    /// Most recent observation, regardless of termination.
    pub last_observed: PhaseSnapshot,
    pub outcome: ResolutionOutcome,
    pub iterations: u32,
    pub presses: u32,
}

impl ResolutionResult {
    pub(crate) fn new(state: ResolutionState, last_observed: PhaseSnapshot, outcome: ResolutionOutcome) -> Self {
        let final_snapshot = match (state.terminated, state.last_decision_snapshot) {
            (true, Some(snapshot)) => snapshot,
            _ => last_observed.clone(),
        };
        Self {
            terminated: state.terminated,
            final_snapshot,
            last_observed,
            outcome,
            iterations: state.iterations,
            presses: state.presses,
        }
    }

    pub fn final_vector(&self) -> &[f32] {
        &self.final_snapshot.feature_vector
    }

    /// True when the caller owns the next battle command.
    pub fn is_decision_point(&self) -> bool {
        self.outcome == ResolutionOutcome::CommandPhase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_count_tracks_phase_name_only() {
        let mut state = ResolutionState::new();
        let a = PhaseSnapshot::new("MessagePhase").with_stage(1);
        let a_later = PhaseSnapshot::new("MessagePhase").with_stage(2);
        let b = PhaseSnapshot::new("ExpPhase");

        assert!(!state.record_observation(&a, &a_later));
        assert!(!state.record_observation(&a_later, &a));
        assert_eq!(state.repeat_count, 2);

        assert!(state.record_observation(&a, &b));
        assert_eq!(state.repeat_count, 0);
    }

    #[test]
    fn terminated_result_keeps_title_capture() {
        let title = PhaseSnapshot::new("TitlePhase").with_features(vec![1.0]);
        let after = PhaseSnapshot::new("EncounterPhase").with_features(vec![2.0]);

        let mut state = ResolutionState::new();
        state.mark_terminated(&title);
        let result = ResolutionResult::new(state, after.clone(), ResolutionOutcome::Terminated);

        assert!(result.terminated);
        assert_eq!(result.final_vector(), &[1.0]);
        assert_eq!(result.last_observed, after);
        assert!(!result.outcome.is_abort());
    }

    #[test]
    fn deadline_in_the_past_has_passed() {
        let state = ResolutionState::with_deadline(Some(Instant::now()));
        assert!(state.deadline_passed());
        assert!(!ResolutionState::new().deadline_passed());
    }
}
