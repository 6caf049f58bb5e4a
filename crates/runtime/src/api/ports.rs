//! Asynchronous capabilities the resolver drives.
//!
//! The game session is an external process; everything the resolver knows
//! about it comes through an [`ObservationPort`], and everything it does goes
//! through an [`InputPort`]. Implementations may talk to a browser, replay a
//! recording, or script a fixture for tests.
use std::time::Duration;

use async_trait::async_trait;
use game_core::{Button, PhaseSnapshot};

use super::errors::Result;

/// Issues button presses to the game.
#[async_trait]
pub trait InputPort: Send + Sync {
    /// Press and release `button`, holding it for `hold`.
    ///
    /// Returns only after the press has settled so the next observation
    /// reflects it.
    async fn press(&self, button: Button, hold: Duration) -> Result<()>;

    /// Press a combination in order.
    async fn press_all(&self, buttons: &[Button], hold: Duration) -> Result<()> {
        for &button in buttons {
            self.press(button, hold).await?;
        }
        Ok(())
    }
}

/// Captures the current state of the game.
#[async_trait]
pub trait ObservationPort: Send + Sync {
    /// Fetch a fresh, validated snapshot.
    async fn observe(&self) -> Result<PhaseSnapshot>;
}
