//! End-to-end population of multi-part and multi-staff scores
//!
//! Each test feeds a whole MusicXML document and inspects the populated
//! MSR through the public API only.

use musicformats_wasm::msr::{TupletMember, VoiceElement, WholeNotes};
use musicformats_wasm::{convert_musicxml_to_msr, DiagnosticKind};

const CROSS_STAFF_TRIPLET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Piano</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes>
        <divisions>6</divisions>
        <time><beats>1</beats><beat-type>4</beat-type></time>
        <staves>2</staves>
        <clef number="1"><sign>G</sign><line>2</line></clef>
        <clef number="2"><sign>F</sign><line>4</line></clef>
      </attributes>
      <note>
        <pitch><step>C</step><octave>5</octave></pitch>
        <duration>2</duration><voice>1</voice><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <staff>1</staff>
        <notations><tuplet type="start"/></notations>
      </note>
      <note>
        <pitch><step>D</step><octave>3</octave></pitch>
        <duration>2</duration><voice>1</voice><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <staff>2</staff>
      </note>
      <note>
        <pitch><step>E</step><octave>5</octave></pitch>
        <duration>2</duration><voice>1</voice><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <staff>1</staff>
        <notations><tuplet type="stop"/></notations>
      </note>
    </measure>
  </part>
</score-partwise>"#;

#[test]
fn test_tuplet_follows_voice_across_staves() {
    let result = convert_musicxml_to_msr(CROSS_STAFF_TRIPLET, None).unwrap();
    let score = &result.score;
    let part = score.part("P1").unwrap();

    assert_eq!(part.staves.len(), 2);
    assert_eq!(part.measures[0].clefs.len(), 2);

    let upper = part.voice(1, 1).unwrap();
    let VoiceElement::Tuplet(tuplet) = upper.measures[0].elements[0] else {
        panic!("Expected the triplet first, got {:?}", upper.measures[0].elements);
    };
    let tuplet = score.arena.tuplet(tuplet).unwrap();
    assert_eq!(tuplet.members.len(), 3);

    let pitches: Vec<String> = tuplet
        .members
        .iter()
        .map(|member| match member {
            TupletMember::Note(id) => score.arena.note(*id).unwrap().pitch().unwrap().to_string(),
            other => panic!("Expected notes only, got {:?}", other),
        })
        .collect();
    assert_eq!(pitches, vec!["C5", "D3", "E5"]);

    // The whole triplet is charged to the staff it started on
    assert_eq!(upper.measures[0].position, WholeNotes::new(1, 4));
    assert!(upper.measures[0]
        .elements
        .contains(&VoiceElement::StaffChange { from: 1, to: 2 }));

    let lower = part.voice(2, 1).unwrap();
    assert!(lower.measures[0]
        .elements
        .contains(&VoiceElement::StaffChange { from: 2, to: 1 }));
    assert_eq!(lower.measures[0].position, WholeNotes::new(1, 4));

    assert_eq!(upper.nesting().depth(), 0);
    assert_eq!(lower.nesting().depth(), 0);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_two_parts_keep_part_list_order() {
    let xml = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Violin</part-name></score-part>
    <score-part id="P2"><part-name>Cello</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>A</step><octave>4</octave></pitch><duration>4</duration><type>whole</type></note>
    </measure>
  </part>
  <part id="P2">
    <measure number="1">
      <attributes><divisions>2</divisions></attributes>
      <note><pitch><step>C</step><octave>3</octave></pitch><duration>4</duration><type>half</type></note>
      <note><pitch><step>G</step><octave>2</octave></pitch><duration>4</duration><type>half</type></note>
    </measure>
  </part>
</score-partwise>"#;

    let result = convert_musicxml_to_msr(xml, None).unwrap();
    let ids: Vec<&str> = result.score.parts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2"]);

    let cello = result.score.part("P2").unwrap();
    assert_eq!(cello.name.as_deref(), Some("Cello"));
    assert_eq!(cello.measures[0].length, WholeNotes::new(1, 1));
    assert_eq!(cello.voice(1, 1).unwrap().measures[0].elements.len(), 2);
}

#[test]
fn test_part_missing_from_part_list_is_reported() {
    let xml = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Oboe</part-name></score-part>
  </part-list>
  <part id="P9">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>A</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>
  </part>
</score-partwise>"#;

    let result = convert_musicxml_to_msr(xml, None).unwrap();
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::UnknownPart), 1);
}

#[test]
fn test_summary_outlines_the_score() {
    let result = convert_musicxml_to_msr(CROSS_STAFF_TRIPLET, None).unwrap();
    let summary = result.score.summary().to_string();

    assert!(summary.starts_with("Part P1 \"Piano\""));
    assert!(summary.contains("  Staff 2\n"));
    assert!(summary.contains("Tuplet #1 3:2"));
    assert!(summary.contains("StaffChange 1 -> 2"));
}
