//! Observation side: raw scene payloads, validation, and feature encoding.
mod features;
mod port;
mod scene;

pub use features::{
    EmbeddingError, EmbeddingTables, Embeddings, FEATURE_LEN, MOVE_DIM, SPECIES_DIM,
    encode_features,
};
pub use port::{SceneObservationPort, SceneSource};
pub use scene::{RawPokemon, RawScene, SceneError, Side, normalize};
