//! Persistence: world documents, YAML/JSON codecs, file-backed store.
//!
//! # Invariants
//! - Layer order on disk is the world's layer order, and loading restores it
//!   from the order keys appear in the document.
//! - Loading validates the whole document before the world is built; a
//!   malformed document never yields a partial world.
//! - `restore(capture(w)) == w`.

pub mod codec;
pub mod document;
pub mod store;

pub use codec::DocumentFormat;
pub use document::{FeatureRecord, FormatError, LayerRecord, PrimitiveRecord, ROBOT_COUNT_KEY, WorldDocument};
pub use store::{DEFAULT_ROBOT_COUNT, WorldFile, WorldStore};

use worldspec_kernel::WorldError;

/// Errors from saving or loading a world.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode {format} document: {message}")]
    Encode {
        format: DocumentFormat,
        message: String,
    },
    #[error("layer '{0}' collides with a reserved document key")]
    ReservedLayerName(String),
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("world error: {0}")]
    World(#[from] WorldError),
}
