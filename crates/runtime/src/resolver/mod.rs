//! Phase resolver: drives the game from any phase to the next decision point.
//!
//! The game spends most of its time in phases that need no real decision
//! (narration, experience screens, shops, prompts). [`PhaseResolver::resolve`]
//! answers each of them through the [`InputPort`], re-observes through the
//! [`ObservationPort`], and returns once the battle command phase or the title
//! screen is reached. Presses and observations strictly alternate.
//!
//! Control also returns early when:
//! - the same unhandled phase repeats `stuck_abort_at` times
//! - an observation or press fails
//! - the [`CancelToken`] fires, the deadline passes, or `max_iterations` runs out
mod handlers;
mod state;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use game_content::Content;
use game_core::{Button, ButtonCombos, ItemWeights, PhaseSnapshot, ResolverSettings};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{InputPort, ObservationPort, Result, RuntimeError};
use crate::control::{CancelToken, OperatorGate};
use crate::input::sleep_unless_zero;
use crate::metrics::ResolverMetrics;

use self::handlers::Action;
pub use self::state::{ResolutionOutcome, ResolutionResult, ResolutionState};

/// Result of a single [`PhaseResolver::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The phase was handled and this snapshot observed afterwards.
    Observed(PhaseSnapshot),
    /// The handler (or a failed port call) ended the resolution.
    Finished(ResolutionOutcome),
}

pub struct PhaseResolver {
    input: Arc<dyn InputPort>,
    observer: Arc<dyn ObservationPort>,
    items: ItemWeights,
    combos: ButtonCombos,
    settings: ResolverSettings,
    operator: OperatorGate,
    cancel: CancelToken,
    metrics: Arc<ResolverMetrics>,
    rng: StdRng,
}

impl PhaseResolver {
    pub fn builder() -> PhaseResolverBuilder {
        PhaseResolverBuilder::new()
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn metrics(&self) -> Arc<ResolverMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn operator(&self) -> OperatorGate {
        self.operator.clone()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Resolves phases starting from `initial` until control must return.
    ///
    /// Never fails: port errors end the chain with
    /// [`ResolutionOutcome::ObservationFailed`] and the last known snapshot.
    #[instrument(skip_all, fields(from = %initial.phase_name))]
    pub async fn resolve(&mut self, initial: PhaseSnapshot) -> ResolutionResult {
        let deadline = self.settings.deadline().map(|d| Instant::now() + d);
        let mut state = ResolutionState::with_deadline(deadline);
        let mut current = initial;

        let outcome = loop {
            if let Some(outcome) = self.interruption(&state) {
                break outcome;
            }
            if state.iterations >= self.settings.max_iterations {
                warn!(iterations = state.iterations, "iteration limit reached");
                break ResolutionOutcome::IterationLimit;
            }

            match self.step(&mut state, &current).await {
                StepOutcome::Observed(next) => {
                    current = next;
                    if state.terminated {
                        break ResolutionOutcome::Terminated;
                    }
                }
                StepOutcome::Finished(outcome) => break outcome,
            }
        };

        self.metrics.record_resolution();
        debug!(
            ?outcome,
            iterations = state.iterations,
            presses = state.presses,
            to = %current.phase_name,
            "resolution finished"
        );
        ResolutionResult::new(state, current, outcome)
    }

    /// Handles `current` once, then re-observes and updates the repeat count.
    ///
    /// Exposed so callers can drive the state machine one phase at a time.
    pub async fn step(&mut self, state: &mut ResolutionState, current: &PhaseSnapshot) -> StepOutcome {
        state.iterations += 1;

        match self.dispatch(state, current).await {
            Ok(Action::Continue) => {}
            Ok(Action::Exit(outcome)) => return StepOutcome::Finished(outcome),
            Err(err) => return self.port_failure(err),
        }

        let next = match self.observer.observe().await {
            Ok(next) => next,
            Err(err) => return self.port_failure(err),
        };

        if state.record_observation(current, &next) {
            info!(from = %current.phase_name, to = %next.phase_name, "phase transition");
            self.metrics.record_transition();
        } else {
            self.metrics.record_repeat();
            debug!(phase = %next.phase_name, repeats = state.repeat_count, "same phase");
            self.pause(state, self.settings.same_phase_delay()).await;
        }

        StepOutcome::Observed(next)
    }

    async fn press(&self, state: &mut ResolutionState, buttons: &[Button]) -> Result<()> {
        let hold = self.settings.hold();
        for &button in buttons {
            self.input.press(button, hold).await?;
            state.presses += 1;
            self.metrics.record_presses(1);
        }
        Ok(())
    }

    fn port_failure(&self, err: RuntimeError) -> StepOutcome {
        if err.is_observation_failure() {
            error!(error = %err, "observation failed, returning last known state");
        } else {
            warn!(error = %err, "input failed, returning last known state");
        }
        self.metrics.record_observation_failure();
        StepOutcome::Finished(ResolutionOutcome::ObservationFailed)
    }

    fn interruption(&self, state: &ResolutionState) -> Option<ResolutionOutcome> {
        if self.cancel.is_cancelled() {
            info!("resolution cancelled");
            Some(ResolutionOutcome::Cancelled)
        } else if state.deadline_passed() {
            warn!("resolution deadline exceeded");
            Some(ResolutionOutcome::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Sleeps unless cancelled or past the deadline. The loop notices either
    /// on its next check.
    async fn pause(&self, state: &ResolutionState, duration: Duration) {
        let _ = self.interruptible(state, sleep_unless_zero(duration)).await;
    }

    /// Runs `fut` to completion, or returns `None` once cancellation or the
    /// deadline wins.
    async fn interruptible<F: Future>(&self, state: &ResolutionState, fut: F) -> Option<F::Output> {
        let deadline = async {
            match state.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            _ = deadline => None,
            out = fut => Some(out),
        }
    }
}

/// Builder for [`PhaseResolver`]. Both ports are required.
pub struct PhaseResolverBuilder {
    input: Option<Arc<dyn InputPort>>,
    observer: Option<Arc<dyn ObservationPort>>,
    items: ItemWeights,
    combos: ButtonCombos,
    settings: ResolverSettings,
    operator: OperatorGate,
    cancel: CancelToken,
    metrics: Option<Arc<ResolverMetrics>>,
}

impl PhaseResolverBuilder {
    fn new() -> Self {
        Self {
            input: None,
            observer: None,
            items: ItemWeights::default(),
            combos: ButtonCombos::default(),
            settings: ResolverSettings::default(),
            operator: OperatorGate::new(),
            cancel: CancelToken::new(),
            metrics: None,
        }
    }

    /// Set the input port (required)
    pub fn input(mut self, input: Arc<dyn InputPort>) -> Self {
        self.input = Some(input);
        self
    }

    /// Set the observation port (required)
    pub fn observer(mut self, observer: Arc<dyn ObservationPort>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn items(mut self, items: ItemWeights) -> Self {
        self.items = items;
        self
    }

    pub fn combos(mut self, combos: ButtonCombos) -> Self {
        self.combos = combos;
        self
    }

    pub fn settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Take item weights, button combos and resolver settings from loaded
    /// content.
    pub fn content(self, content: &Content) -> Self {
        self.items(content.items.clone())
            .combos(content.buttons.clone())
            .settings(content.config.resolver.clone())
    }

    pub fn operator(mut self, operator: OperatorGate) -> Self {
        self.operator = operator;
        self
    }

    pub fn cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Share a metrics sink; a private one is created otherwise.
    pub fn metrics(mut self, metrics: Arc<ResolverMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<PhaseResolver> {
        let input = self.input.ok_or(RuntimeError::PortNotSet { port: "input" })?;
        let observer = self
            .observer
            .ok_or(RuntimeError::PortNotSet { port: "observation" })?;

        let rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(PhaseResolver {
            input,
            observer,
            items: self.items,
            combos: self.combos,
            settings: self.settings,
            operator: self.operator,
            cancel: self.cancel,
            metrics: self.metrics.unwrap_or_default(),
            rng,
        })
    }
}
