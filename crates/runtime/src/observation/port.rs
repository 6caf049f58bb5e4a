use async_trait::async_trait;
use game_core::{MoveTable, PhaseSnapshot};
use serde_json::Value;
use tracing::trace;

use super::features::Embeddings;
use super::scene::{RawScene, normalize};
use crate::api::{ObservationPort, Result};

/// Where raw scene JSON comes from (an in-page hook, a replay file, ...).
#[async_trait]
pub trait SceneSource: Send + Sync {
    /// Fetch the current scene. `Value::Null` means the hook had nothing.
    async fn fetch_scene(&self) -> Result<Value>;
}

/// [`ObservationPort`] that validates and encodes scenes from a [`SceneSource`].
pub struct SceneObservationPort<S, E> {
    source: S,
    embeddings: E,
    moves: MoveTable,
}

impl<S, E> SceneObservationPort<S, E>
where
    S: SceneSource,
    E: Embeddings,
{
    pub fn new(source: S, embeddings: E) -> Self {
        Self {
            source,
            embeddings,
            moves: MoveTable::default(),
        }
    }

    /// Move data for scoring learn-move decisions. Without it every
    /// learn-move context is left unscored.
    pub fn with_move_table(mut self, moves: MoveTable) -> Self {
        self.moves = moves;
        self
    }

    pub fn move_table(&self) -> &MoveTable {
        &self.moves
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<S, E> ObservationPort for SceneObservationPort<S, E>
where
    S: SceneSource,
    E: Embeddings,
{
    async fn observe(&self) -> Result<PhaseSnapshot> {
        let value = self.source.fetch_scene().await?;
        let raw = RawScene::from_value(value)?;
        let snapshot = normalize(&raw, &self.embeddings, &self.moves)?;
        trace!(phase = %snapshot.phase_name, stage = snapshot.stage, "observed scene");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use game_core::Phase;
    use serde_json::json;

    use super::*;
    use crate::api::RuntimeError;
    use crate::observation::EmbeddingTables;

    struct Frames(Mutex<Vec<Value>>);

    #[async_trait]
    impl SceneSource for Frames {
        async fn fetch_scene(&self) -> Result<Value> {
            self.0
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| RuntimeError::SourceUnreachable("no frames left".into()))
        }
    }

    #[tokio::test]
    async fn observes_then_fails_on_bad_frame() {
        let frames = Frames(Mutex::new(vec![
            json!({"phase": "not an object"}),
            json!({"phase": {"phaseName": "SelectModifierPhase"}, "shopItems": [{"id": "POTION"}]}),
        ]));
        let port = SceneObservationPort::new(frames, EmbeddingTables::default());

        let snapshot = port.observe().await.unwrap();
        assert_eq!(snapshot.phase(), Phase::SelectModifier);
        assert_eq!(snapshot.shop_items.len(), 1);

        let err = port.observe().await.unwrap_err();
        assert!(err.is_observation_failure());
        assert!(matches!(err, RuntimeError::ObservationUnavailable(_)));

        let err = port.observe().await.unwrap_err();
        assert!(matches!(err, RuntimeError::SourceUnreachable(_)));
    }
}
