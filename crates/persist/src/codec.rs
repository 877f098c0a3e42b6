//! Text encodings of [`WorldDocument`].

use std::fmt;
use std::path::Path;

use crate::document::{FormatError, ROBOT_COUNT_KEY, WorldDocument};
use crate::PersistError;

/// Text format of a world document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON; anything else is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("YAML"),
            Self::Json => f.write_str("JSON"),
        }
    }
}

impl WorldDocument {
    /// Render the document as text.
    ///
    /// Fails with [`PersistError::ReservedLayerName`] when a layer is named
    /// after the robot count key, since that layer could not be read back.
    pub fn encode(&self, format: DocumentFormat) -> Result<String, PersistError> {
        if let Some(layer) = self.layers().iter().find(|l| l.name == ROBOT_COUNT_KEY) {
            return Err(PersistError::ReservedLayerName(layer.name.clone()));
        }
        let encoded = match format {
            DocumentFormat::Yaml => serde_yaml::to_string(self).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
        };
        encoded.map_err(|message| PersistError::Encode { format, message })
    }

    /// Parse a document from text. Records are checked later, by `restore`.
    pub fn decode(format: DocumentFormat, text: &str) -> Result<Self, PersistError> {
        let decoded = match format {
            DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        };
        Ok(decoded.map_err(|message| FormatError::Decode { format, message })?)
    }

    pub fn to_yaml(&self) -> Result<String, PersistError> {
        self.encode(DocumentFormat::Yaml)
    }

    pub fn from_yaml(text: &str) -> Result<Self, PersistError> {
        Self::decode(DocumentFormat::Yaml, text)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        self.encode(DocumentFormat::Json)
    }

    pub fn from_json(text: &str) -> Result<Self, PersistError> {
        Self::decode(DocumentFormat::Json, text)
    }
}
