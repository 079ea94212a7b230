//! MusicXML to MSR WASM Module
//!
//! Reads MusicXML into an MXSR tree, populates the MSR score skeleton from
//! it in a single pass, and optionally generates LilyPond from the result.

pub mod api;
pub mod converters;
pub mod diagnostics;
pub mod msr;
pub mod mxsr;

// Re-export commonly used types
pub use converters::{
    convert_musicxml_to_lilypond, convert_musicxml_to_msr, populate_msr, ConversionError,
    ConversionResult, ConversionSettings, LilypondResult,
};
pub use diagnostics::{DiagnosticKind, DiagnosticMark, DiagnosticSeverity, Diagnostics};
pub use msr::Score;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logger();

    log::info!("musicformats WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logger() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        wasm_warn!("logger was already initialized");
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logger() {}
