//! Format converters
//!
//! MusicXML → MSR skeleton population, and MSR → LilyPond generation.

pub mod msr_to_lilypond;
pub mod mxsr_to_msr;

// Re-export for convenience
pub use msr_to_lilypond::{convert_musicxml_to_lilypond, LilypondResult};
pub use mxsr_to_msr::{
    convert_musicxml_to_msr, populate_msr, ConversionError, ConversionResult, ConversionSettings,
};
