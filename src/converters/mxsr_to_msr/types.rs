//! Settings and results of a conversion job

use super::errors::ConversionError;
use crate::diagnostics::Diagnostics;
use crate::msr::Score;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Trace narration toggles, all off by default
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TraceSettings {
    pub tuplets: bool,
    pub chords: bool,
    pub grace_notes: bool,
    pub staff_changes: bool,
    pub backup_forward: bool,
    pub pending: bool,
    pub measures: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LilypondSettings {
    /// Written to the `\version` line
    pub version: String,
    /// Emit `\lyricsto` contexts for stanzas
    pub include_lyrics: bool,
}

impl Default for LilypondSettings {
    fn default() -> Self {
        Self {
            version: "2.24.0".to_string(),
            include_lyrics: true,
        }
    }
}

/// Configuration for one conversion job
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConversionSettings {
    /// Stamped on every diagnostic
    pub input_source_name: String,
    pub trace: TraceSettings,
    pub lilypond: LilypondSettings,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            input_source_name: "-".to_string(),
            trace: TraceSettings::default(),
            lilypond: LilypondSettings::default(),
        }
    }
}

impl ConversionSettings {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::SettingsError(e.to_string()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConversionError> {
        serde_yaml::from_str(yaml).map_err(|e| ConversionError::SettingsError(e.to_string()))
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConversionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConversionError::SettingsError(format!("{}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }
}

/// A populated score and what was reported while building it
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub score: Score,
    pub diagnostics: Diagnostics,
}
