//! Conversion entry points exported to JavaScript

use super::helpers::{serialize, settings_from_json};
use crate::converters::msr_to_lilypond;
use crate::converters::mxsr_to_msr::{self, ConversionSettings};
use crate::diagnostics::{DiagnosticSeverity, Diagnostics};
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};
use wasm_bindgen::prelude::*;

fn conversion_error(e: mxsr_to_msr::ConversionError) -> JsValue {
    wasm_error!("Conversion error: {}", e);
    JsValue::from_str(&format!("Conversion error: {}", e))
}

/// Populate the MSR of a MusicXML document.
///
/// Returns `{ score, diagnostics }` as a JS object.
#[wasm_bindgen(js_name = convertMusicXmlToMsr)]
pub fn convert_musicxml_to_msr(musicxml: String, settings_json: Option<String>) -> Result<JsValue, JsValue> {
    wasm_info!("convertMusicXmlToMsr called ({} bytes)", musicxml.len());
    let settings = settings_from_json(settings_json)?;

    let result = mxsr_to_msr::convert_musicxml_to_msr(&musicxml, Some(settings))
        .map_err(conversion_error)?;

    if result.diagnostics.has_errors() {
        wasm_warn!("  {} diagnostic(s), with errors", result.diagnostics.len());
    } else {
        wasm_log!("  {} diagnostic(s)", result.diagnostics.len());
    }
    report_to_console(&result.diagnostics);
    serialize(&result, "Result serialization error")
}

fn report_to_console(diagnostics: &Diagnostics) {
    for mark in &diagnostics.marks {
        let line = JsValue::from_str(&mark.to_string());
        match mark.severity {
            DiagnosticSeverity::Error => web_sys::console::error_1(&line),
            DiagnosticSeverity::Warning => web_sys::console::warn_1(&line),
            DiagnosticSeverity::Info => web_sys::console::info_1(&line),
        }
    }
}

/// Convert a MusicXML document to LilyPond.
///
/// Returns `{ lilypond_source, diagnostics }` as a JS object.
#[wasm_bindgen(js_name = convertMusicXmlToLilypond)]
pub fn convert_musicxml_to_lilypond(
    musicxml: String,
    settings_json: Option<String>,
) -> Result<JsValue, JsValue> {
    wasm_info!("convertMusicXmlToLilypond called ({} bytes)", musicxml.len());
    let settings = settings_from_json(settings_json)?;

    let result = msr_to_lilypond::convert_musicxml_to_lilypond(&musicxml, Some(settings))
        .map_err(conversion_error)?;

    wasm_info!("  LilyPond generated: {} bytes", result.lilypond_source.len());
    report_to_console(&result.diagnostics);
    serialize(&result, "Result serialization error")
}

/// Indented text outline of the populated MSR, for inspection
#[wasm_bindgen(js_name = summarizeMusicXml)]
pub fn summarize_musicxml(musicxml: String, settings_json: Option<String>) -> Result<String, JsValue> {
    let settings = settings_from_json(settings_json)?;
    let result = mxsr_to_msr::convert_musicxml_to_msr(&musicxml, Some(settings))
        .map_err(conversion_error)?;
    Ok(result.score.summary().to_string())
}

/// Diagnostics of populating the MSR, one `source:line: severity: message`
/// string per mark
#[wasm_bindgen(js_name = diagnoseMusicXml)]
pub fn diagnose_musicxml(musicxml: String, settings_json: Option<String>) -> Result<js_sys::Array, JsValue> {
    let settings = settings_from_json(settings_json)?;
    let result = mxsr_to_msr::convert_musicxml_to_msr(&musicxml, Some(settings))
        .map_err(conversion_error)?;
    Ok(result
        .diagnostics
        .marks
        .iter()
        .map(|mark| JsValue::from_str(&mark.to_string()))
        .collect())
}

/// Default settings, as a starting point for callers building their own
#[wasm_bindgen(js_name = defaultConversionSettings)]
pub fn default_conversion_settings() -> Result<JsValue, JsValue> {
    serialize(&ConversionSettings::default(), "Settings serialization error")
}
