//! MusicXML to MSR converter
//!
//! Builds the MSR skeleton of a score from MusicXML text in a single pass.
//!
//! # Architecture
//!
//! ```text
//! MusicXML String
//!   ↓ [parse_musicxml_to_mxsr, roxmltree]
//! MXSR tree
//!   ↓ [SkeletonPopulator, one visit_start / visit_end per element]
//! MSR Score (arena + parts/staves/voices/measures) and Diagnostics
//! ```
//!
//! # Guarantees
//!
//! 1. **Well nested output**: tuplets, chords and grace notes groups form a
//!    proper tree even when the source markup interleaves them
//! 2. **Consistent timing**: every voice of a measure is padded to the
//!    measure's length
//! 3. **Recoverable problems are diagnostics**: only malformed XML and
//!    broken translator bookkeeping end a job with an error
//!
//! # Basic Usage
//!
//! ```ignore
//! use musicformats_wasm::converters::mxsr_to_msr::convert_musicxml_to_msr;
//!
//! let result = convert_musicxml_to_msr(musicxml, None)?;
//! println!("{}", result.score.summary());
//! for mark in &result.diagnostics.marks {
//!     eprintln!("{}", mark);
//! }
//! ```

pub mod errors;
pub mod pending;
pub mod populator;
pub mod types;

pub use errors::{ConversionError, ParseError};
pub use pending::{Orphan, PendingElements, PendingKind, PendingList};
pub use populator::SkeletonPopulator;
pub use types::{ConversionResult, ConversionSettings, LilypondSettings, TraceSettings};

use crate::mxsr::{browse, parse_musicxml_to_mxsr, MxsrElement};

/// Convert a MusicXML document to an MSR score.
///
/// # Arguments
///
/// * `musicxml` - `score-partwise` MusicXML document as string
/// * `settings` - Optional conversion settings (uses defaults if None)
///
/// # Returns
///
/// * `Ok(ConversionResult)` - The populated score and its diagnostics
/// * `Err(ConversionError)` - Fatal error, no score is produced
pub fn convert_musicxml_to_msr(
    musicxml: &str,
    settings: Option<ConversionSettings>,
) -> Result<ConversionResult, ConversionError> {
    let root = parse_musicxml_to_mxsr(musicxml)?;
    populate_msr(&root, settings.unwrap_or_default())
}

/// Run a fresh skeleton populator over an already parsed MXSR tree
pub fn populate_msr(
    root: &MxsrElement,
    settings: ConversionSettings,
) -> Result<ConversionResult, ConversionError> {
    log::info!(
        "populating MSR from {} ({} elements)",
        settings.input_source_name,
        root.element_count()
    );

    let mut populator = SkeletonPopulator::new(settings);
    browse(root, &mut populator)?;
    let result = populator.into_result();

    log::info!(
        "MSR populated: {} part(s), {} note(s), {} diagnostic(s)",
        result.score.parts.len(),
        result.score.arena.notes.len(),
        result.diagnostics.len()
    );
    Ok(result)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
