//! Error types for MusicXML → MSR conversion
//!
//! Parse errors and internal MSR errors are fatal for the job they occur
//! in. Everything recoverable goes to `Diagnostics` instead.

use crate::msr::MsrError;
use thiserror::Error;

pub use crate::mxsr::ParseError;

/// Top-level conversion error type
#[derive(Debug, Clone, Error)]
pub enum ConversionError {
    /// Fatal XML parsing error
    #[error("XML parsing failed: {0}")]
    ParseError(#[from] ParseError),

    /// Translator bookkeeping went inconsistent (indicates a bug or input
    /// beyond recovery)
    #[error("Internal conversion error: {0}")]
    InternalError(#[from] MsrError),

    /// Settings could not be read or decoded
    #[error("Invalid settings: {0}")]
    SettingsError(String),

    /// The LilyPond document template failed to render
    #[error("LilyPond template rendering failed: {0}")]
    TemplateError(String),
}
