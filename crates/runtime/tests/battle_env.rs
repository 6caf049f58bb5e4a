mod common;

use std::sync::Arc;

use game_content::Content;
use game_core::{Button, ButtonCombos, PhaseSnapshot, RewardWeights};
use runtime::{BattleEnv, ResolutionOutcome, RuntimeError};

use common::{RecordingInput, ScriptedObserver, resolver, settings};

use Button::{Down, Enter, Left, Right, Space, Up};

fn env(frames: Vec<PhaseSnapshot>) -> (BattleEnv, Arc<RecordingInput>) {
    let input = Arc::new(RecordingInput::default());
    let observer = Arc::new(ScriptedObserver::new(frames));
    let resolver = resolver(&input, &observer, settings());
    let env = BattleEnv::new(
        resolver,
        input.clone(),
        observer,
        ButtonCombos::default(),
        RewardWeights::default(),
    );
    (env, input)
}

fn command(stage: u32, enemy: f32, player: f32) -> PhaseSnapshot {
    PhaseSnapshot::new("CommandPhase")
        .with_stage(stage)
        .with_enemy("e1", enemy)
        .with_player("p1", player)
        .with_player("p2", 1.0)
        .with_features(vec![enemy, player])
}

#[tokio::test]
async fn reset_leaves_title_and_reaches_first_command() {
    let (mut env, input) = env(vec![
        PhaseSnapshot::new("TitlePhase"),
        PhaseSnapshot::new("EncounterPhase"),
        command(1, 1.0, 1.0),
    ]);

    let observation = env.reset().await.expect("reset reaches a command");

    assert_eq!(observation, vec![1.0, 1.0]);
    assert_eq!(input.presses(), vec![Enter, Enter, Space]);
    assert_eq!(env.last_snapshot().map(|s| s.stage), Some(1));
}

#[tokio::test]
async fn reset_reports_stuck_session() {
    let stuck = PhaseSnapshot::new("LoginPhase");
    let input = Arc::new(RecordingInput::default());
    let observer = Arc::new(ScriptedObserver::repeating(stuck));
    let resolver = resolver(&input, &observer, settings());
    let mut env = BattleEnv::new(
        resolver,
        input,
        observer,
        ButtonCombos::default(),
        RewardWeights::default(),
    );

    let err = env.reset().await.unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::ResetFailed {
            outcome: ResolutionOutcome::Stuck { .. }
        }
    ));
}

#[tokio::test]
async fn step_enters_move_and_target_then_scores() {
    let (mut env, input) = env(vec![
        command(1, 1.0, 1.0),
        PhaseSnapshot::new("MessagePhase"),
        command(1, 0.6, 0.9),
    ]);
    env.reset().await.unwrap();

    let step = env.step([2, 1, 3, 0]).await.expect("step succeeds");

    // Single battle: only the first slot's command is entered.
    assert_eq!(
        input.presses(),
        vec![Left, Up, Space, Left, Down, Space, Right, Space, Space]
    );
    assert!(!step.terminated);
    assert!(!step.truncated);
    assert_eq!(step.info.outcome, ResolutionOutcome::CommandPhase);
    assert_eq!(step.observation, vec![0.6, 0.9]);
    assert!((step.breakdown.damage_dealt - 40.0).abs() < 1e-3);
    assert!((step.breakdown.damage_taken + 12.5).abs() < 1e-3);
    assert!((step.reward - 27.5).abs() < 1e-3);
}

#[tokio::test]
async fn double_fight_enters_both_commands() {
    let (mut env, input) = env(vec![
        command(2, 1.0, 1.0).with_double_fight(true),
        command(2, 1.0, 1.0).with_double_fight(true),
    ]);
    env.reset().await.unwrap();

    env.step([0, 0, 1, 1]).await.unwrap();

    assert_eq!(
        input.presses(),
        vec![
            Left, Up, Space, Left, Up, Space, Left, Space, // slot 0
            Left, Up, Space, Right, Up, Space, Right, Space, // slot 1
        ]
    );
}

#[tokio::test]
async fn fainted_second_member_gets_no_command() {
    let opening = PhaseSnapshot::new("CommandPhase")
        .with_double_fight(true)
        .with_player("p1", 0.8)
        .with_player("p2", 0.0);
    let (mut env, input) = env(vec![opening.clone(), opening]);
    env.reset().await.unwrap();

    env.step([0, 0, 1, 1]).await.unwrap();

    assert_eq!(input.presses().len(), 8);
}

#[tokio::test]
async fn out_of_range_action_is_rejected() {
    let (mut env, input) = env(vec![command(1, 1.0, 1.0)]);
    env.reset().await.unwrap();

    let err = env.step([4, 0, 0, 0]).await.unwrap_err();

    assert!(matches!(err, RuntimeError::InvalidAction { action: [4, 0, 0, 0] }));
    assert!(input.presses().is_empty());
}

#[tokio::test]
async fn rejected_action_keeps_reward_baseline() {
    let (mut env, _input) = env(vec![command(1, 1.0, 1.0), command(1, 0.5, 1.0)]);
    env.reset().await.unwrap();

    assert!(env.step([9, 0, 0, 0]).await.is_err());
    assert_eq!(env.last_snapshot().map(|s| s.feature_vector.clone()), Some(vec![1.0, 1.0]));

    let step = env.step([0, 0, 0, 0]).await.unwrap();

    assert!(!step.truncated);
    assert!((step.breakdown.damage_dealt - 50.0).abs() < 1e-3);
}

#[tokio::test]
async fn run_ending_on_title_terminates_episode() {
    let (mut env, _input) = env(vec![
        command(7, 1.0, 0.1),
        PhaseSnapshot::new("GameOverPhase"),
        PhaseSnapshot::new("TitlePhase").with_features(vec![0.0, 0.0]),
        PhaseSnapshot::new("EncounterPhase"),
    ]);
    env.reset().await.unwrap();

    let step = env.step([0, 0, 0, 0]).await.unwrap();

    assert!(step.terminated);
    assert!(!step.truncated);
    assert_eq!(step.info.outcome, ResolutionOutcome::Terminated);
    assert_eq!(step.observation, vec![0.0, 0.0]);
}

#[tokio::test]
async fn stuck_after_action_truncates_episode() {
    let stuck = PhaseSnapshot::new("MysteryPhase").with_stage(3);
    let input = Arc::new(RecordingInput::default());
    let observer = Arc::new(
        ScriptedObserver::new([command(3, 1.0, 1.0)]).then_repeat(stuck),
    );
    let resolver = resolver(&input, &observer, settings());
    let mut env = BattleEnv::new(
        resolver,
        input,
        observer,
        ButtonCombos::default(),
        RewardWeights::default(),
    );
    env.reset().await.unwrap();

    let step = env.step([0, 0, 0, 0]).await.unwrap();

    assert!(!step.terminated);
    assert!(step.truncated);
    assert!(matches!(step.info.outcome, ResolutionOutcome::Stuck { .. }));
    assert_eq!(step.info.phase, "MysteryPhase");
}

#[tokio::test]
async fn lost_observation_after_action_truncates() {
    let (mut env, _input) = env(vec![command(1, 1.0, 1.0)]);
    env.reset().await.unwrap();

    let step = env.step([0, 0, 0, 0]).await.unwrap();

    assert!(step.truncated);
    assert_eq!(step.reward, 0.0);
    assert_eq!(step.info.outcome, ResolutionOutcome::ObservationFailed);
    assert_eq!(step.observation, vec![1.0, 1.0]);
}

#[tokio::test]
async fn builds_from_embedded_content() {
    let content = Content::embedded().expect("embedded tables parse");
    let input = Arc::new(RecordingInput::default());
    let observer = Arc::new(ScriptedObserver::new([command(1, 1.0, 1.0)]));

    let mut env = BattleEnv::from_content(input.clone(), observer, &content)
        .expect("ports are set");

    assert_eq!(env.reset().await.unwrap(), vec![1.0, 1.0]);
    assert!(input.presses().is_empty());
}
