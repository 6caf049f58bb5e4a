//! Step/reset interface for a reinforcement-learning loop.
//!
//! [`BattleEnv`] owns a [`PhaseResolver`] and both ports. A step enters one
//! battle command per active party member, resolves the phases that follow,
//! and scores the transition with [`RewardWeights`].
use std::sync::Arc;
use std::time::Duration;

use game_content::Content;
use game_core::{
    Button, ButtonCombos, Phase, PhaseSnapshot, RewardBreakdown, RewardWeights,
};
use tracing::{debug, info, warn};

use crate::api::{InputPort, ObservationPort, Result, RuntimeError};
use crate::resolver::{PhaseResolver, ResolutionOutcome};

/// `[move_0, target_0, move_1, target_1]` for the two field slots.
pub type BattleAction = [usize; 4];

/// Number of choices per [`BattleAction`] component.
pub const ACTION_SPACE: [usize; 4] = [4, 2, 4, 2];

/// Resolutions allowed during [`BattleEnv::reset`]; one to leave the title
/// screen, one to reach the first command.
const RESET_ATTEMPTS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    pub outcome: ResolutionOutcome,
    pub stage: u32,
    pub phase: String,
    pub presses: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub breakdown: RewardBreakdown,
    /// The run ended on the title screen.
    pub terminated: bool,
    /// Control returned without an exit phase (stuck, failure, cancel, ...).
    pub truncated: bool,
    pub info: StepInfo,
}

pub struct BattleEnv {
    resolver: PhaseResolver,
    input: Arc<dyn InputPort>,
    observer: Arc<dyn ObservationPort>,
    combos: ButtonCombos,
    reward: RewardWeights,
    last: Option<PhaseSnapshot>,
}

impl BattleEnv {
    pub fn new(
        resolver: PhaseResolver,
        input: Arc<dyn InputPort>,
        observer: Arc<dyn ObservationPort>,
        combos: ButtonCombos,
        reward: RewardWeights,
    ) -> Self {
        Self {
            resolver,
            input,
            observer,
            combos,
            reward,
            last: None,
        }
    }

    /// Builds the resolver from `content` with default control handles.
    pub fn from_content(
        input: Arc<dyn InputPort>,
        observer: Arc<dyn ObservationPort>,
        content: &Content,
    ) -> Result<Self> {
        let resolver = PhaseResolver::builder()
            .input(Arc::clone(&input))
            .observer(Arc::clone(&observer))
            .content(content)
            .build()?;
        Ok(Self::new(
            resolver,
            input,
            observer,
            content.buttons.clone(),
            content.config.reward.clone(),
        ))
    }

    pub fn resolver(&self) -> &PhaseResolver {
        &self.resolver
    }

    /// Last snapshot handed to the learner.
    pub fn last_snapshot(&self) -> Option<&PhaseSnapshot> {
        self.last.as_ref()
    }

    /// Drives the game to the first battle command of a run and returns its
    /// feature vector. Starts a new run when sitting on the title screen.
    pub async fn reset(&mut self) -> Result<Vec<f32>> {
        let mut snapshot = self.observer.observe().await?;

        for attempt in 0..RESET_ATTEMPTS {
            let result = self.resolver.resolve(snapshot).await;
            if result.is_decision_point() {
                info!(stage = result.last_observed.stage, "environment reset");
                let observation = result.last_observed.feature_vector.clone();
                self.last = Some(result.last_observed);
                return Ok(observation);
            }
            if !result.terminated {
                return Err(RuntimeError::ResetFailed {
                    outcome: result.outcome,
                });
            }
            debug!(attempt, "left title screen during reset");
            snapshot = result.last_observed;
        }

        Err(RuntimeError::ResetFailed {
            outcome: ResolutionOutcome::Terminated,
        })
    }

    /// Enters `action`, resolves until the next decision point and scores it.
    pub async fn step(&mut self, action: BattleAction) -> Result<StepResult> {
        let prev = match self.last.take() {
            Some(snapshot) => snapshot,
            None => self.observer.observe().await?,
        };

        let next = match self.act_and_observe(&prev, action).await {
            Ok(next) => next,
            Err(err) if err.is_observation_failure() => {
                warn!(error = %err, "observation failed after action");
                let result = self.truncated(&prev, ResolutionOutcome::ObservationFailed);
                self.last = Some(prev);
                return Ok(result);
            }
            Err(err) => {
                self.last = Some(prev);
                return Err(err);
            }
        };

        let result = self.resolver.resolve(next).await;
        let breakdown = self.reward.evaluate(&prev, &result.final_snapshot);
        let truncated = !result.terminated && result.outcome.is_abort();
        debug!(
            reward = breakdown.total(),
            outcome = ?result.outcome,
            stage = result.final_snapshot.stage,
            "step finished"
        );

        let step = StepResult {
            observation: result.final_vector().to_vec(),
            reward: breakdown.total(),
            breakdown,
            terminated: result.terminated,
            truncated,
            info: StepInfo {
                outcome: result.outcome,
                stage: result.final_snapshot.stage,
                phase: result.last_observed.phase_name.clone(),
                presses: result.presses,
            },
        };
        self.last = Some(result.last_observed);
        Ok(step)
    }

    async fn act_and_observe(&self, prev: &PhaseSnapshot, action: BattleAction) -> Result<PhaseSnapshot> {
        if prev.phase() == Phase::Command {
            self.enter_commands(prev, action).await?;
        } else {
            warn!(phase = %prev.phase_name, "not at a battle command, action ignored");
        }
        self.observer.observe().await
    }

    /// Presses the fight menu, move and target for slot 0, and for slot 1
    /// when the fight is double and the second member is still standing.
    async fn enter_commands(&self, snapshot: &PhaseSnapshot, action: BattleAction) -> Result<()> {
        let [move_0, target_0, move_1, target_1] = action;
        let second_active = snapshot.is_double_fight
            && snapshot
                .hp_ratios
                .players
                .get(1)
                .is_some_and(|p| p.ratio() > 0.0);

        let mut buttons = self.command_buttons(action, move_0, target_0)?;
        if second_active {
            buttons.extend(self.command_buttons(action, move_1, target_1)?);
        }

        debug!(?action, second_active, "entering battle commands");
        self.input.press_all(&buttons, self.hold()).await
    }

    fn command_buttons(&self, action: BattleAction, slot: usize, target: usize) -> Result<Vec<Button>> {
        let (Some(select_move), Some(select_target)) =
            (self.combos.move_slot(slot), self.combos.target(target))
        else {
            return Err(RuntimeError::InvalidAction { action });
        };

        let mut buttons = self.combos.open_fight.clone();
        buttons.extend_from_slice(select_move);
        buttons.extend_from_slice(select_target);
        Ok(buttons)
    }

    fn hold(&self) -> Duration {
        self.resolver.settings().hold()
    }

    fn truncated(&self, prev: &PhaseSnapshot, outcome: ResolutionOutcome) -> StepResult {
        StepResult {
            observation: prev.feature_vector.clone(),
            reward: 0.0,
            breakdown: RewardBreakdown::default(),
            terminated: false,
            truncated: true,
            info: StepInfo {
                outcome,
                stage: prev.stage,
                phase: prev.phase_name.clone(),
                presses: 0,
            },
        }
    }
}
