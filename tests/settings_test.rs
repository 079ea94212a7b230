//! Conversion settings loading and their effect on a job

use musicformats_wasm::converters::mxsr_to_msr::TraceSettings;
use musicformats_wasm::{convert_musicxml_to_msr, ConversionError, ConversionSettings};
use std::io::Write;
use tempfile::NamedTempFile;

const UNMATCHED_STOP: &str = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list><score-part id="P1"><part-name>Horn</part-name></score-part></part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>F</step><octave>4</octave></pitch><duration>1</duration>
        <notations><tuplet type="stop"/></notations></note>
    </measure>
  </part>
</score-partwise>"#;

fn settings_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let settings = ConversionSettings::default();
    assert_eq!(settings.input_source_name, "-");
    assert_eq!(settings.trace, TraceSettings::default());
    assert_eq!(settings.lilypond.version, "2.24.0");
    assert!(settings.lilypond.include_lyrics);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let settings =
        ConversionSettings::from_json(r#"{ "trace": { "tuplets": true } }"#).unwrap();
    assert!(settings.trace.tuplets);
    assert!(!settings.trace.chords);
    assert_eq!(settings.input_source_name, "-");
}

#[test]
fn test_json_file() {
    let file = settings_file(
        ".json",
        r#"{ "input_source_name": "horn.xml", "lilypond": { "version": "2.22.1" } }"#,
    );
    let settings = ConversionSettings::from_file(file.path()).unwrap();
    assert_eq!(settings.input_source_name, "horn.xml");
    assert_eq!(settings.lilypond.version, "2.22.1");
    assert!(settings.lilypond.include_lyrics);
}

#[test]
fn test_yaml_file() {
    let file = settings_file(
        ".yaml",
        "input_source_name: horn.xml\ntrace:\n  staff_changes: true\n  pending: true\n",
    );
    let settings = ConversionSettings::from_file(file.path()).unwrap();
    assert_eq!(settings.input_source_name, "horn.xml");
    assert!(settings.trace.staff_changes);
    assert!(settings.trace.pending);
}

#[test]
fn test_bad_settings_are_rejected() {
    let file = settings_file(".json", "{ \"trace\": 12 }");
    assert!(matches!(
        ConversionSettings::from_file(file.path()),
        Err(ConversionError::SettingsError(_))
    ));

    let missing = ConversionSettings::from_file("/nonexistent/settings.yaml");
    assert!(matches!(missing, Err(ConversionError::SettingsError(_))));
}

#[test]
fn test_source_name_and_tracing_in_a_job() {
    let settings = ConversionSettings {
        input_source_name: "horn.xml".to_string(),
        trace: TraceSettings {
            tuplets: true,
            chords: true,
            grace_notes: true,
            staff_changes: true,
            backup_forward: true,
            pending: true,
            measures: true,
        },
        ..ConversionSettings::default()
    };

    // tracing only narrates; the outcome is the same as without it
    let traced = convert_musicxml_to_msr(UNMATCHED_STOP, Some(settings)).unwrap();
    let plain = convert_musicxml_to_msr(UNMATCHED_STOP, None).unwrap();

    assert_eq!(
        traced.score.summary().to_string(),
        plain.score.summary().to_string()
    );
    assert_eq!(traced.diagnostics.len(), 1);
    assert!(traced
        .diagnostics
        .marks
        .iter()
        .all(|mark| mark.input_source == "horn.xml"));
}
