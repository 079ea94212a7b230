//! WASM build test
//!
//! Checks that the JavaScript-facing entry points work from a browser.

use musicformats_wasm::api::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const MELODY: &str = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list><score-part id="P1"><part-name>Flute</part-name></score-part></part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>5</octave></pitch><duration>1</duration><type>quarter</type></note>
      <note><pitch><step>D</step><octave>5</octave></pitch><duration>1</duration><type>quarter</type></note>
    </measure>
  </part>
</score-partwise>"#;

#[wasm_bindgen_test]
fn test_convert_to_msr() {
    let result = convert_musicxml_to_msr(MELODY.to_string(), None);
    assert!(result.is_ok());
}

#[wasm_bindgen_test]
fn test_convert_to_lilypond() {
    let result = convert_musicxml_to_lilypond(
        MELODY.to_string(),
        Some(r#"{ "input_source_name": "flute.xml" }"#.to_string()),
    );
    assert!(result.is_ok());
}

#[wasm_bindgen_test]
fn test_summary() {
    let summary = summarize_musicxml(MELODY.to_string(), None).unwrap();
    assert!(summary.contains("Note C5 1/4"));
}

#[wasm_bindgen_test]
fn test_bad_input_is_an_error() {
    assert!(convert_musicxml_to_msr("<score-partwise>".to_string(), None).is_err());
    assert!(convert_musicxml_to_msr(MELODY.to_string(), Some("not json".to_string())).is_err());
}

#[wasm_bindgen_test]
fn test_default_settings() {
    assert!(default_conversion_settings().is_ok());
}

#[wasm_bindgen_test]
fn test_diagnostics_as_array() {
    let xml = MELODY.replace(
        "<step>D</step><octave>5</octave></pitch><duration>1</duration><type>quarter</type>",
        "<step>D</step><octave>5</octave></pitch><duration>1</duration><type>quarter</type>\
         <notations><tuplet type=\"stop\"/></notations>",
    );
    let marks = diagnose_musicxml(xml, None).unwrap();
    assert_eq!(marks.length(), 1);
}
