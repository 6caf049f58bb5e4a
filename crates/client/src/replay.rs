//! Offline session plumbing: recorded scene frames in, key events logged out.
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use runtime::{KeySink, RuntimeError, SceneSource};
use serde_json::Value;
use tracing::trace;

/// Plays back scene frames recorded from the in-page hook, one per
/// observation.
pub struct ReplaySource {
    frames: Mutex<VecDeque<Value>>,
}

impl ReplaySource {
    /// Reads a JSONL file; blank lines are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replay {}", path.display()))?;

        let frames = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("{}:{}: invalid frame", path.display(), number + 1))
            })
            .collect::<Result<VecDeque<Value>>>()?;

        Ok(Self::from_frames(frames))
    }

    pub fn from_frames(frames: impl IntoIterator<Item = Value>) -> Self {
        Self {
            frames: Mutex::new(frames.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.lock().map(|f| f.len()).unwrap_or_default()
    }
}

#[async_trait]
impl SceneSource for ReplaySource {
    async fn fetch_scene(&self) -> runtime::Result<Value> {
        let mut frames = self
            .frames
            .lock()
            .map_err(|_| RuntimeError::SourceUnreachable("replay lock poisoned".into()))?;
        frames
            .pop_front()
            .ok_or_else(|| RuntimeError::SourceUnreachable("replay exhausted".into()))
    }
}

/// [`KeySink`] that counts key events and optionally appends them to a file
/// as `down <code>` / `up <code>` lines.
#[derive(Default)]
pub struct KeyLog {
    writer: Option<Mutex<BufWriter<File>>>,
    events: AtomicU64,
}

impl KeyLog {
    pub fn to_file(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create key log {}", path.display()))?;
        Ok(Self {
            writer: Some(Mutex::new(BufWriter::new(file))),
            events: AtomicU64::new(0),
        })
    }

    pub fn events(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }

    fn record(&self, kind: &str, key_code: u16) -> runtime::Result<()> {
        self.events.fetch_add(1, Ordering::Relaxed);
        trace!(kind, key_code, "key event");

        let Some(writer) = &self.writer else {
            return Ok(());
        };
        let mut writer = writer
            .lock()
            .map_err(|_| RuntimeError::InputFailed("key log lock poisoned".into()))?;
        writeln!(writer, "{kind} {key_code}")
            .and_then(|()| writer.flush())
            .map_err(|err| RuntimeError::InputFailed(err.to_string()))
    }
}

#[async_trait]
impl KeySink for KeyLog {
    async fn key_down(&self, key_code: u16) -> runtime::Result<()> {
        self.record("down", key_code)
    }

    async fn key_up(&self, key_code: u16) -> runtime::Result<()> {
        self.record("up", key_code)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use game_core::{Button, InputTiming};
    use runtime::{EmbeddingTables, InputPort, KeyEventInput, ObservationPort, SceneObservationPort};

    use super::*;

    #[tokio::test]
    async fn replay_feeds_observation_port_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");
        std::fs::write(
            &path,
            concat!(
                r#"{"phase": {"phaseName": "EncounterPhase"}}"#,
                "\n\n",
                r#"{"phase": {"phaseName": "CommandPhase"}, "metaData": {"waveIndex": 2}}"#,
                "\n"
            ),
        )
        .unwrap();

        let source = ReplaySource::load(&path).unwrap();
        assert_eq!(source.remaining(), 2);
        let port = SceneObservationPort::new(source, EmbeddingTables::default());

        assert_eq!(port.observe().await.unwrap().phase_name, "EncounterPhase");
        assert_eq!(port.observe().await.unwrap().stage, 2);
        assert!(port.observe().await.unwrap_err().is_observation_failure());
    }

    #[test]
    fn bad_frame_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");
        std::fs::write(&path, "{}\nnot json\n").unwrap();

        let err = ReplaySource::load(&path).err().unwrap();
        assert!(format!("{err}").ends_with(":2: invalid frame"));
    }

    #[tokio::test]
    async fn key_log_writes_down_up_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.log");
        let input = KeyEventInput::new(KeyLog::to_file(&path).unwrap(), InputTiming { settle_ms: 0 });

        input.press(Button::Enter, Duration::ZERO).await.unwrap();

        assert_eq!(input.sink().events(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "down 13\nup 13\n");
    }
}
