//! File-backed world persistence.
//!
//! A world lives in a single text document. The format follows the file
//! extension: `.json` is JSON, everything else is YAML.

use std::path::{Path, PathBuf};

use worldspec_kernel::{Visualizer, World};

use crate::codec::DocumentFormat;
use crate::document::WorldDocument;
use crate::PersistError;

/// Robot count assumed when a document does not carry one.
pub const DEFAULT_ROBOT_COUNT: u64 = 1;

/// A world loaded from disk together with its robot count passthrough.
#[derive(Debug)]
pub struct WorldFile<V> {
    pub world: World<V>,
    pub number_of_robots: Option<u64>,
}

impl<V> WorldFile<V> {
    /// The stored robot count, or [`DEFAULT_ROBOT_COUNT`].
    pub fn robot_count(&self) -> u64 {
        self.number_of_robots.unwrap_or(DEFAULT_ROBOT_COUNT)
    }
}

/// A world document at a fixed path.
#[derive(Debug, Clone)]
pub struct WorldStore {
    path: PathBuf,
    format: DocumentFormat,
}

impl WorldStore {
    /// Bind a store to `path`, picking the format from its extension.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = DocumentFormat::from_path(&path);
        Self { path, format }
    }

    /// Bind a store to `path` with an explicit format.
    pub fn with_format(path: impl AsRef<Path>, format: DocumentFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    /// File this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text format used for the file.
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Write the world, replacing any existing file.
    pub fn save<V>(&self, world: &World<V>, number_of_robots: Option<u64>) -> Result<(), PersistError> {
        let mut doc = WorldDocument::capture(world);
        if let Some(n) = number_of_robots {
            doc = doc.with_robot_count(n);
        }
        self.write_document(&doc)?;
        tracing::info!(
            path = %self.path.display(),
            format = %self.format,
            layers = world.layer_count(),
            features = world.feature_count(),
            "world saved"
        );
        Ok(())
    }

    /// Read the document and rebuild the world, notifying `visualizer`.
    pub fn load<V: Visualizer>(&self, visualizer: V) -> Result<WorldFile<V>, PersistError> {
        let doc = self.read_document()?;
        let world = doc.restore(visualizer)?;
        tracing::info!(
            path = %self.path.display(),
            layers = world.layer_count(),
            features = world.feature_count(),
            "world loaded"
        );
        Ok(WorldFile {
            world,
            number_of_robots: doc.robot_count(),
        })
    }

    /// Robot count stored in the document, without building a world.
    ///
    /// Lets a simulation driver size itself before it creates the
    /// visualizer that `load` will notify.
    pub fn peek_robot_count(&self) -> Result<u64, PersistError> {
        Ok(self
            .read_document()?
            .robot_count()
            .unwrap_or(DEFAULT_ROBOT_COUNT))
    }

    /// Read and decode the document without restoring it.
    pub fn read_document(&self) -> Result<WorldDocument, PersistError> {
        let text = std::fs::read_to_string(&self.path)?;
        WorldDocument::decode(self.format, &text)
    }

    /// Encode `doc` and write it, replacing any existing file.
    pub fn write_document(&self, doc: &WorldDocument) -> Result<(), PersistError> {
        let text = doc.encode(self.format)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}
