//! Scripted ports shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use game_core::{Button, PhaseSnapshot, ResolverSettings};
use runtime::{InputPort, ObservationPort, PhaseResolver, Result, RuntimeError};

/// Records every press; optionally fails once `fail_after` presses happened.
#[derive(Default)]
pub struct RecordingInput {
    presses: Mutex<Vec<Button>>,
    fail_after: Option<usize>,
}

impl RecordingInput {
    pub fn failing_after(count: usize) -> Self {
        Self {
            presses: Mutex::default(),
            fail_after: Some(count),
        }
    }

    pub fn presses(&self) -> Vec<Button> {
        self.presses.lock().unwrap().clone()
    }
}

#[async_trait]
impl InputPort for RecordingInput {
    async fn press(&self, button: Button, _hold: Duration) -> Result<()> {
        let mut presses = self.presses.lock().unwrap();
        if self.fail_after.is_some_and(|limit| presses.len() >= limit) {
            return Err(RuntimeError::InputFailed("page closed".into()));
        }
        presses.push(button);
        Ok(())
    }
}

/// Plays back a fixed list of snapshots, then either repeats a fallback or
/// reports the source as unreachable.
pub struct ScriptedObserver {
    frames: Mutex<VecDeque<PhaseSnapshot>>,
    fallback: Option<PhaseSnapshot>,
    calls: AtomicUsize,
}

impl ScriptedObserver {
    pub fn new(frames: impl IntoIterator<Item = PhaseSnapshot>) -> Self {
        Self {
            frames: Mutex::new(frames.into_iter().collect()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn phases(names: &[&str]) -> Self {
        Self::new(names.iter().map(|name| PhaseSnapshot::new(*name)))
    }

    /// Always reports `snapshot`.
    pub fn repeating(snapshot: PhaseSnapshot) -> Self {
        Self::new([]).then_repeat(snapshot)
    }

    pub fn then_repeat(mut self, snapshot: PhaseSnapshot) -> Self {
        self.fallback = Some(snapshot);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObservationPort for ScriptedObserver {
    async fn observe(&self) -> Result<PhaseSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.frames.lock().unwrap().pop_front();
        next.or_else(|| self.fallback.clone())
            .ok_or_else(|| RuntimeError::SourceUnreachable("script exhausted".into()))
    }
}

pub fn settings() -> ResolverSettings {
    ResolverSettings {
        seed: Some(7),
        ..ResolverSettings::instant()
    }
}

pub fn resolver(
    input: &Arc<RecordingInput>,
    observer: &Arc<ScriptedObserver>,
    settings: ResolverSettings,
) -> PhaseResolver {
    PhaseResolver::builder()
        .input(input.clone())
        .observer(observer.clone())
        .settings(settings)
        .build()
        .expect("both ports are set")
}

/// Collects formatted log output of the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Installs a subscriber writing into this capture until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let capture = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || capture.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
