//! MSR to LilyPond converter
//!
//! Downstream consumer of the populated MSR. The document wrapper is a
//! mustache template; the music inside it is generated from the score tree.
//!
//! # Basic Usage
//!
//! ```ignore
//! use musicformats_wasm::converters::msr_to_lilypond::convert_musicxml_to_lilypond;
//!
//! let result = convert_musicxml_to_lilypond(musicxml, None)?;
//! println!("{}", result.lilypond_source);
//! ```

pub mod lilypond;
pub mod templates;

pub use lilypond::generate_lilypond_document;
pub use templates::{render_lilypond, TemplateContext};

use crate::converters::mxsr_to_msr::{convert_musicxml_to_msr, ConversionError, ConversionSettings};
use crate::diagnostics::Diagnostics;
use serde::Serialize;

/// LilyPond source and the diagnostics of the MSR population it came from
#[derive(Debug, Clone, Serialize)]
pub struct LilypondResult {
    pub lilypond_source: String,
    pub diagnostics: Diagnostics,
}

/// Convert a MusicXML document to LilyPond source code.
///
/// The score is populated first; a fatal population error means no
/// LilyPond output.
pub fn convert_musicxml_to_lilypond(
    musicxml: &str,
    settings: Option<ConversionSettings>,
) -> Result<LilypondResult, ConversionError> {
    let settings = settings.unwrap_or_default();
    let lilypond_settings = settings.lilypond.clone();

    let result = convert_musicxml_to_msr(musicxml, Some(settings))?;
    let lilypond_source = generate_lilypond_document(&result.score, &lilypond_settings)?;

    Ok(LilypondResult {
        lilypond_source,
        diagnostics: result.diagnostics,
    })
}
