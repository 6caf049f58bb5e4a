//! Agent entry point.
//!
//! ```bash
//! AGENT_REPLAY_FILE=frames.jsonl AGENT_SEED=7 cargo run -p agent-client
//! ```
//!
//! Type `o` and enter to release a resolver waiting on the operator; Ctrl-C
//! cancels the session.
use std::sync::Arc;

use agent_client::{ClientConfig, KeyLog, ReplaySource, logging, session};
use anyhow::{Context, Result};
use game_content::{Content, ContentFactory};
use game_core::MoveForgetStrategy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use runtime::{
    BattleEnv, CancelToken, EmbeddingTables, InputPort, KeyEventInput, ObservationPort,
    OperatorGate, PhaseResolver, ResolverMetrics, SceneObservationPort,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();

    let session_name = logging::session_name(config.session_id.as_deref());
    let log_dir = config.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    let _log_guard = logging::setup_logging(&log_dir, &session_name)?;

    // 1. Static tables
    let mut content = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir).load_all()?,
        None => Content::embedded()?,
    };
    if let Some(seed) = config.seed {
        content.config.resolver.seed = Some(seed);
    }
    tracing::info!(items = content.items.len(), moves = content.moves.len(), "content loaded");

    // 2. Ports
    let replay = config
        .replay_file
        .as_deref()
        .context("AGENT_REPLAY_FILE is not set")?;
    let source = ReplaySource::load(replay)?;
    tracing::info!(frames = source.remaining(), "replay loaded");

    let embeddings = match (&config.species_embeddings, &config.move_embeddings) {
        (Some(species), Some(moves)) => EmbeddingTables::from_files(species, moves)?,
        _ => {
            tracing::warn!("no embedding tables configured, species and moves encode as zeros");
            EmbeddingTables::default()
        }
    };
    let sink = match &config.key_log_file {
        Some(path) => KeyLog::to_file(path)?,
        None => KeyLog::default(),
    };

    let input: Arc<dyn InputPort> = Arc::new(KeyEventInput::new(sink, content.config.input));
    if content.config.resolver.forget_strategy == MoveForgetStrategy::MovesetValue
        && content.moves.is_empty()
    {
        tracing::warn!("moveset_value forgetting configured without move data, falling back to uniform");
    }
    let observer: Arc<dyn ObservationPort> = Arc::new(
        SceneObservationPort::new(source, embeddings).with_move_table(content.moves.clone()),
    );

    // 3. Resolver and environment
    let operator = OperatorGate::new();
    let cancel = CancelToken::new();
    let metrics = Arc::new(ResolverMetrics::new());
    let resolver = PhaseResolver::builder()
        .input(Arc::clone(&input))
        .observer(Arc::clone(&observer))
        .content(&content)
        .operator(operator.clone())
        .cancel(cancel.clone())
        .metrics(Arc::clone(&metrics))
        .build()?;
    let mut env = BattleEnv::new(
        resolver,
        input,
        observer,
        content.buttons.clone(),
        content.config.reward.clone(),
    );

    // 4. Operator console and interrupt handling
    spawn_operator_console(operator);
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling");
                cancel.cancel();
            }
        });
    }

    // 5. Play
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let summary = session::run(&mut env, config.steps, &mut rng, &cancel).await?;

    let snapshot = metrics.snapshot();
    tracing::info!(
        steps = summary.steps,
        episodes = summary.episodes,
        truncations = summary.truncations,
        reward = summary.total_reward,
        presses = snapshot.presses,
        stuck = snapshot.stuck_aborts,
        "session finished"
    );
    if !snapshot.unknown_items.is_empty() {
        tracing::info!(items = ?snapshot.unknown_items, "shop items without a weight");
    }

    Ok(())
}

/// Releases the operator gate whenever `o` is entered on stdin.
fn spawn_operator_console(operator: OperatorGate) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().eq_ignore_ascii_case("o") {
                tracing::info!("operator resume");
                operator.resume();
            }
        }
    });
}
