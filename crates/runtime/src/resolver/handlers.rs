//! Per-phase actions.
//!
//! Each handler issues the inputs its phase needs and reports whether the
//! resolver should re-observe ([`Action::Continue`]) or return.
use game_core::{
    Button, FORGET_NONE, Phase, PhaseSnapshot, forget_slot, select_item, select_switch_target,
};
use tracing::{debug, info, warn};

use super::PhaseResolver;
use super::state::{ResolutionOutcome, ResolutionState};
use crate::api::Result;

pub(super) enum Action {
    Continue,
    Exit(ResolutionOutcome),
}

impl PhaseResolver {
    pub(super) async fn dispatch(
        &mut self,
        state: &mut ResolutionState,
        snapshot: &PhaseSnapshot,
    ) -> Result<Action> {
        match snapshot.phase() {
            Phase::Title => self.on_title(state, snapshot).await,
            Phase::CheckSwitch => self.on_check_switch(state, snapshot).await,
            Phase::LearnMove => self.on_learn_move(state, snapshot).await,
            Phase::SelectModifier => self.on_select_modifier(state, snapshot).await,
            Phase::Switch => self.on_switch(state, snapshot).await,
            Phase::EggSummary => {
                self.press(state, &[Button::CANCEL]).await?;
                Ok(Action::Continue)
            }
            Phase::Command => Ok(Action::Exit(ResolutionOutcome::CommandPhase)),
            Phase::Other => self.on_other(state, snapshot).await,
        }
    }

    async fn on_title(&mut self, state: &mut ResolutionState, snapshot: &PhaseSnapshot) -> Result<Action> {
        let ongoing = self.settings.ongoing_save;
        info!(ongoing_save = ongoing, stage = snapshot.stage, "title screen reached, run over");

        state.mark_terminated(snapshot);
        self.press(state, self.combos.title(ongoing)).await?;
        Ok(Action::Continue)
    }

    async fn on_check_switch(&mut self, state: &mut ResolutionState, snapshot: &PhaseSnapshot) -> Result<Action> {
        self.press(state, &self.combos.decline).await?;
        if snapshot.is_double_fight {
            self.press(state, &self.combos.decline).await?;
        }
        debug!(double = snapshot.is_double_fight, "declined pre-battle switch");
        Ok(Action::Continue)
    }

    async fn on_learn_move(&mut self, state: &mut ResolutionState, snapshot: &PhaseSnapshot) -> Result<Action> {
        let context = snapshot.learn_move_context.as_ref();
        let known = context.map_or(FORGET_NONE, |c| c.known_moves);

        if known < FORGET_NONE {
            debug!(known, "free move slot, accepting new move");
            return self.press(state, &[Button::CONFIRM]).await.map(|_| Action::Continue);
        }

        let slot = forget_slot(self.settings.forget_strategy, context, &mut self.rng);
        debug!(
            member = context.map(|c| c.member.as_str()),
            slot,
            strategy = ?self.settings.forget_strategy,
            "replacing a known move"
        );

        let mut buttons = vec![Button::CONFIRM; self.settings.learn_move_prompt_presses as usize];
        buttons.extend(std::iter::repeat_n(Button::Down, slot));
        buttons.push(Button::CONFIRM);
        self.press(state, &buttons).await?;
        Ok(Action::Continue)
    }

    async fn on_select_modifier(&mut self, state: &mut ResolutionState, snapshot: &PhaseSnapshot) -> Result<Action> {
        if state.repeat_count > self.settings.shop_retry_limit {
            warn!(
                repeats = state.repeat_count,
                "shop did not resolve, waiting for operator"
            );
            self.metrics.record_operator_wait();
            let gate = self.operator.clone();
            match self.interruptible(state, gate.wait()).await {
                Some(()) => info!("operator resumed"),
                None => debug!("operator wait interrupted"),
            }
            return Ok(Action::Continue);
        }

        let choice = select_item(&snapshot.shop_items, &self.items);
        if !choice.unknown.is_empty() {
            self.metrics.record_unknown_items(choice.unknown.iter().cloned());
        }

        if !choice.is_worth_taking() {
            debug!(items = snapshot.shop_items.len(), "nothing worth taking, skipping shop");
            self.press(state, &self.combos.skip_shop).await?;
            return Ok(Action::Continue);
        }

        let item = snapshot.shop_items.get(choice.index).map(|i| i.id.as_str());
        info!(index = choice.index, weight = choice.weight, item, "taking shop item");
        let mut buttons = vec![Button::Right; choice.index];
        buttons.push(Button::CONFIRM);
        self.press(state, &buttons).await?;
        Ok(Action::Continue)
    }

    async fn on_switch(&mut self, state: &mut ResolutionState, snapshot: &PhaseSnapshot) -> Result<Action> {
        let target = select_switch_target(
            &snapshot.hp_ratios.players,
            self.settings.active_slots,
            self.settings.backup_slot,
            &mut self.rng,
        );
        info!(target, "switching in party member");

        let mut buttons = vec![Button::Down; target];
        buttons.extend([Button::CONFIRM, Button::CONFIRM]);
        self.press(state, &buttons).await?;
        Ok(Action::Continue)
    }

    async fn on_other(&mut self, state: &mut ResolutionState, snapshot: &PhaseSnapshot) -> Result<Action> {
        let repeats = state.repeat_count;

        if repeats >= self.settings.stuck_abort_at {
            warn!(phase = %snapshot.phase_name, repeats, "phase is stuck, returning control");
            self.metrics.record_stuck();
            return Ok(Action::Exit(ResolutionOutcome::Stuck {
                phase: snapshot.phase_name.clone(),
                repeats,
            }));
        }

        if repeats >= self.settings.stuck_backoff_from {
            debug!(phase = %snapshot.phase_name, repeats, "phase repeating, backing off");
            self.pause(state, self.settings.backoff_delay()).await;
            return Ok(Action::Continue);
        }

        debug!(phase = %snapshot.phase_name, "generic confirm");
        self.press(state, &[Button::CONFIRM]).await?;
        Ok(Action::Continue)
    }
}
