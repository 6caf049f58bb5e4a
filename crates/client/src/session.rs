//! Episode loop that plays random battle actions through a [`BattleEnv`].
use anyhow::Result;
use rand::Rng;
use runtime::{ACTION_SPACE, BattleAction, BattleEnv, CancelToken, ResolutionOutcome};
use tracing::{info, warn};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSummary {
    pub steps: usize,
    /// Runs that ended on the title screen.
    pub episodes: usize,
    pub truncations: usize,
    pub total_reward: f32,
}

/// Uniform sample from [`ACTION_SPACE`].
pub fn random_action<R: Rng + ?Sized>(rng: &mut R) -> BattleAction {
    ACTION_SPACE.map(|choices| rng.gen_range(0..choices))
}

/// Plays up to `steps` battle steps, resetting after every finished run.
///
/// Stops early when cancelled or when the observation source is gone.
pub async fn run<R: Rng + ?Sized>(
    env: &mut BattleEnv,
    steps: usize,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();
    env.reset().await?;

    while summary.steps < steps && !cancel.is_cancelled() {
        let action = random_action(rng);
        let step = env.step(action).await?;
        summary.steps += 1;
        summary.total_reward += step.reward;

        info!(
            step = summary.steps,
            ?action,
            reward = step.reward,
            stage = step.info.stage,
            outcome = ?step.info.outcome,
            "battle step"
        );

        if step.terminated {
            summary.episodes += 1;
            info!(episodes = summary.episodes, "run over, starting a new one");
            env.reset().await?;
        } else if step.truncated {
            summary.truncations += 1;
            match step.info.outcome {
                ResolutionOutcome::Cancelled | ResolutionOutcome::ObservationFailed => {
                    warn!(outcome = ?step.info.outcome, "stopping session");
                    break;
                }
                _ => {
                    env.reset().await?;
                }
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use game_core::{ButtonCombos, InputTiming, ResolverSettings, RewardWeights};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use runtime::{EmbeddingTables, KeyEventInput, PhaseResolver, SceneObservationPort};
    use serde_json::json;

    use super::*;
    use crate::replay::{KeyLog, ReplaySource};

    fn frame(phase: &str, wave: u32, enemy_hp: u32) -> serde_json::Value {
        json!({
            "phase": {"phaseName": phase},
            "metaData": {"waveIndex": wave, "isDoubleFight": false},
            "enemy": [{"id": 1, "hp": enemy_hp, "stats": [20]}],
            "player": [{"id": 2, "hp": 20, "stats": [20], "moveset": [{"id": 1}]}]
        })
    }

    fn replay_env(frames: Vec<serde_json::Value>) -> BattleEnv {
        let input = Arc::new(KeyEventInput::new(KeyLog::default(), InputTiming { settle_ms: 0 }));
        let observer = Arc::new(SceneObservationPort::new(
            ReplaySource::from_frames(frames),
            EmbeddingTables::default(),
        ));
        let resolver = PhaseResolver::builder()
            .input(input.clone())
            .observer(observer.clone())
            .settings(ResolverSettings {
                seed: Some(1),
                ..ResolverSettings::instant()
            })
            .build()
            .unwrap();
        BattleEnv::new(
            resolver,
            input,
            observer,
            ButtonCombos::default(),
            RewardWeights::default(),
        )
    }

    #[test]
    fn random_actions_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let action = random_action(&mut rng);
            for (value, choices) in action.iter().zip(ACTION_SPACE) {
                assert!(*value < choices);
            }
        }
    }

    #[tokio::test]
    async fn replay_session_stops_when_frames_run_out() {
        let mut env = replay_env(vec![
            frame("CommandPhase", 1, 20),
            frame("MessagePhase", 1, 10),
            frame("CommandPhase", 1, 10),
        ]);
        let mut rng = StdRng::seed_from_u64(5);

        let summary = run(&mut env, 10, &mut rng, &CancelToken::new()).await.unwrap();

        assert_eq!(summary.steps, 2);
        assert_eq!(summary.truncations, 1);
        assert_eq!(summary.episodes, 0);
        assert!((summary.total_reward - 50.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn stuck_step_resets_and_keeps_playing() {
        let mut frames = vec![frame("CommandPhase", 1, 20)];
        frames.extend(std::iter::repeat_n(frame("MysteryPhase", 1, 20), 6));
        frames.push(frame("CommandPhase", 2, 20));
        let mut env = replay_env(frames);
        let mut rng = StdRng::seed_from_u64(9);

        let summary = run(&mut env, 10, &mut rng, &CancelToken::new()).await.unwrap();

        // Stuck step, reset to the next command, then the replay runs dry.
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.truncations, 2);
        assert_eq!(summary.episodes, 0);
        assert_eq!(env.resolver().metrics().stuck_aborts(), 1);
    }

    #[tokio::test]
    async fn cancelled_session_plays_nothing() {
        let mut env = replay_env(vec![frame("CommandPhase", 1, 20)]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let summary = run(&mut env, 10, &mut StdRng::seed_from_u64(0), &cancel)
            .await
            .unwrap();

        assert_eq!(summary.steps, 0);
    }
}
