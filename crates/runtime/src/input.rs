//! Input port built on raw key events.
//!
//! The game listens for keydown/keyup pairs; [`KeyEventInput`] turns a named
//! [`Button`] press into that pair with a hold in between and a settle delay
//! afterwards, so the game has processed the input before anyone observes.
use std::time::Duration;

use async_trait::async_trait;
use game_core::{Button, InputTiming};
use tracing::trace;

use crate::api::{InputPort, Result};

/// Destination of raw key events (a browser page, a recorder, ...).
#[async_trait]
pub trait KeySink: Send + Sync {
    async fn key_down(&self, key_code: u16) -> Result<()>;
    async fn key_up(&self, key_code: u16) -> Result<()>;
}

/// [`InputPort`] that sends keydown, waits `hold`, sends keyup, then waits
/// for the configured settle delay.
pub struct KeyEventInput<S> {
    sink: S,
    timing: InputTiming,
}

impl<S: KeySink> KeyEventInput<S> {
    pub fn new(sink: S, timing: InputTiming) -> Self {
        Self { sink, timing }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[async_trait]
impl<S: KeySink> InputPort for KeyEventInput<S> {
    async fn press(&self, button: Button, hold: Duration) -> Result<()> {
        let code = button.key_code();
        trace!(%button, code, "key press");

        self.sink.key_down(code).await?;
        sleep_unless_zero(hold).await;
        self.sink.key_up(code).await?;
        sleep_unless_zero(self.timing.settle()).await;

        Ok(())
    }
}

pub(crate) async fn sleep_unless_zero(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
