//! MusicXML conversion WASM API
//!
//! This module provides the JavaScript-facing API.
//!
//! # Module Structure
//!
//! - `helpers`: logging macros, serialization and settings decoding
//! - `convert`: MusicXML → MSR and MusicXML → LilyPond entry points

pub mod helpers;
pub mod convert;

pub use convert::{
    convert_musicxml_to_lilypond, convert_musicxml_to_msr, default_conversion_settings,
    diagnose_musicxml, summarize_musicxml,
};
