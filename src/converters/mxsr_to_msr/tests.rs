//! Unit tests for MusicXML → MSR skeleton population

use super::*;
use crate::diagnostics::DiagnosticKind;
use crate::msr::{
    GraceMember, GraceNotesGroupKind, MsrError, NoteKind, NoteType, Part, Score, TupletFactor,
    TupletMember, Voice, VoiceElement, WholeNotes, MAX_DOTS,
};
use crate::mxsr::{browse, parse_musicxml_to_mxsr};

fn single_part(measures: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Flute</part-name></score-part>
  </part-list>
  <part id="P1">
{}
  </part>
</score-partwise>"#,
        measures
    )
}

fn convert(measures: &str) -> ConversionResult {
    convert_musicxml_to_msr(&single_part(measures), None).unwrap()
}

fn first_part(result: &ConversionResult) -> &Part {
    &result.score.parts[0]
}

fn voice<'a>(result: &'a ConversionResult, staff: i32, voice: i32) -> &'a Voice {
    first_part(result).voice(staff, voice).unwrap()
}

fn pitch_name(score: &Score, element: &VoiceElement) -> String {
    match element {
        VoiceElement::Note(id) => score.arena.note(*id).unwrap().pitch().unwrap().to_string(),
        other => panic!("Expected a note, got {:?}", other),
    }
}

#[test]
fn test_simple_melody() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>4</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration><type>quarter</type></note>
      <note><pitch><step>D</step><alter>-1</alter><octave>4</octave></pitch><duration>4</duration><type>quarter</type></note>
    </measure>"#,
    );

    let part = first_part(&result);
    assert_eq!(part.id, "P1");
    assert_eq!(part.name.as_deref(), Some("Flute"));
    assert_eq!(part.measures.len(), 1);
    assert_eq!(part.measures[0].length, WholeNotes::new(1, 2));

    let measure = &voice(&result, 1, 1).measures[0];
    assert_eq!(measure.elements.len(), 2);
    assert_eq!(pitch_name(&result.score, &measure.elements[0]), "C4");
    assert_eq!(pitch_name(&result.score, &measure.elements[1]), "Db4");
    assert_eq!(measure.position, WholeNotes::new(1, 2));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_score_header() {
    let xml = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <work><work-title>Syrinx</work-title></work>
  <identification><creator type="composer">Debussy</creator></identification>
  <part-list><score-part id="P1"><part-name>Flute</part-name></score-part></part-list>
  <part id="P1"><measure number="1"/></part>
</score-partwise>"#;

    let result = convert_musicxml_to_msr(xml, None).unwrap();

    assert_eq!(result.score.title.as_deref(), Some("Syrinx"));
    assert_eq!(result.score.composer.as_deref(), Some("Debussy"));
}

#[test]
fn test_chord_anchoring() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
      <note><chord/><pitch><step>E</step><octave>4</octave></pitch><duration>1</duration></note>
      <note><chord/><pitch><step>G</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );

    let measure = &voice(&result, 1, 1).measures[0];
    assert_eq!(measure.elements.len(), 1);
    let VoiceElement::Chord(chord) = measure.elements[0] else {
        panic!("Expected a chord, got {:?}", measure.elements[0]);
    };
    let chord = result.score.arena.chord(chord).unwrap();
    assert_eq!(chord.notes.len(), 3);
    assert_eq!(chord.sounding_whole_notes, WholeNotes::new(1, 4));
    assert_eq!(measure.position, WholeNotes::new(1, 4));
}

#[test]
fn test_chord_without_anchor_is_a_plain_note() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><chord/><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );

    let measure = &voice(&result, 1, 1).measures[0];
    assert_eq!(pitch_name(&result.score, &measure.elements[0]), "C4");
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::ChordWithoutAnchor), 1);
}

#[test]
fn test_triplet() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>6</divisions></attributes>
      <note><pitch><step>C</step><octave>5</octave></pitch><duration>2</duration><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations><tuplet type="start"/></notations></note>
      <note><pitch><step>D</step><octave>5</octave></pitch><duration>2</duration><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification></note>
      <note><pitch><step>E</step><octave>5</octave></pitch><duration>2</duration><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations><tuplet type="stop"/></notations></note>
    </measure>"#,
    );

    let voice = voice(&result, 1, 1);
    let measure = &voice.measures[0];
    assert_eq!(measure.elements.len(), 1);
    let VoiceElement::Tuplet(id) = measure.elements[0] else {
        panic!("Expected a tuplet, got {:?}", measure.elements[0]);
    };
    let tuplet = result.score.arena.tuplet(id).unwrap();
    assert_eq!(tuplet.factor, TupletFactor::new(3, 2).unwrap());
    assert_eq!(tuplet.members.len(), 3);
    assert_eq!(
        result.score.arena.tuplet_sounding_whole_notes(id).unwrap(),
        WholeNotes::new(1, 4)
    );
    assert_eq!(voice.nesting().depth(), 0);
    assert_eq!(measure.position, WholeNotes::new(1, 4));
}

#[test]
fn test_tuplet_with_chord() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>3</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration><type>quarter</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations><tuplet type="start" number="1"/></notations></note>
      <note><chord/><pitch><step>D</step><octave>4</octave></pitch><duration>2</duration><type>quarter</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification></note>
      <note><pitch><step>E</step><octave>4</octave></pitch><duration>2</duration><type>quarter</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations><tuplet type="stop" number="1"/></notations></note>
    </measure>"#,
    );

    let voice = voice(&result, 1, 1);
    let arena = &result.score.arena;
    let VoiceElement::Tuplet(id) = voice.measures[0].elements[0] else {
        panic!("Expected a tuplet");
    };
    let tuplet = arena.tuplet(id).unwrap();
    assert_eq!(tuplet.factor.to_string(), "3:2");
    assert_eq!(tuplet.members.len(), 2);

    let TupletMember::Chord(chord) = tuplet.members[0] else {
        panic!("Expected a chord, got {:?}", tuplet.members[0]);
    };
    let pitches: Vec<String> = arena
        .chord(chord)
        .unwrap()
        .notes
        .iter()
        .map(|n| arena.note(*n).unwrap().pitch().unwrap().to_string())
        .collect();
    assert_eq!(pitches, vec!["C4", "D4"]);

    let TupletMember::Note(last) = tuplet.members[1] else {
        panic!("Expected a note, got {:?}", tuplet.members[1]);
    };
    assert_eq!(arena.note(last).unwrap().pitch().unwrap().to_string(), "E4");

    assert_eq!(voice.nesting().depth(), 0);
    assert_eq!(voice.measures[0].position, WholeNotes::new(1, 3));
}

#[test]
fn test_nested_tuplets() {
    let nested = r#"<time-modification><actual-notes>9</actual-notes><normal-notes>4</normal-notes></time-modification>"#;
    let result = convert(&format!(
        r#"<measure number="1">
      <attributes><divisions>18</divisions></attributes>
      <note><pitch><step>C</step><octave>5</octave></pitch><duration>4</duration><type>eighth</type>{tm}
        <notations>
          <tuplet type="start" number="1"><tuplet-actual><tuplet-number>3</tuplet-number></tuplet-actual><tuplet-normal><tuplet-number>2</tuplet-number></tuplet-normal></tuplet>
          <tuplet type="start" number="2"/>
        </notations></note>
      <note><pitch><step>D</step><octave>5</octave></pitch><duration>4</duration><type>eighth</type>{tm}</note>
      <note><pitch><step>E</step><octave>5</octave></pitch><duration>4</duration><type>eighth</type>{tm}
        <notations><tuplet type="stop" number="2"/><tuplet type="stop" number="1"/></notations></note>
    </measure>"#,
        tm = nested
    ));

    let voice = voice(&result, 1, 1);
    let arena = &result.score.arena;
    let measure = &voice.measures[0];
    assert_eq!(measure.elements.len(), 1);

    let VoiceElement::Tuplet(outer) = measure.elements[0] else {
        panic!("Expected a tuplet");
    };
    let outer = arena.tuplet(outer).unwrap();
    assert_eq!(outer.number, 1);
    assert_eq!(outer.members.len(), 1);

    let TupletMember::Tuplet(inner) = outer.members[0] else {
        panic!("Expected a nested tuplet, got {:?}", outer.members[0]);
    };
    let inner = arena.tuplet(inner).unwrap();
    assert_eq!(inner.number, 2);
    assert_eq!(inner.factor, TupletFactor::new(3, 2).unwrap());
    assert_eq!(inner.members.len(), 3);

    assert_eq!(voice.nesting().depth(), 0);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_unmatched_tuplet_stop_is_ignored() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration>
        <notations><tuplet type="stop"/></notations></note>
      <note><pitch><step>D</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );

    let measure = &voice(&result, 1, 1).measures[0];
    assert_eq!(measure.elements.len(), 2);
    assert_eq!(pitch_name(&result.score, &measure.elements[1]), "D4");
    assert_eq!(
        result.diagnostics.count_of(DiagnosticKind::TupletStopWithoutStart),
        1
    );
    assert_eq!(result.diagnostics.warning_lines(), vec![10]);
}

#[test]
fn test_tuplet_across_barline_warns() {
    let tm = r#"<time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>"#;
    let result = convert(&format!(
        r#"<measure number="1">
      <attributes><divisions>3</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration>{tm}
        <notations><tuplet type="start"/></notations></note>
    </measure>
    <measure number="2">
      <note><pitch><step>D</step><octave>4</octave></pitch><duration>2</duration>{tm}</note>
      <note><pitch><step>E</step><octave>4</octave></pitch><duration>2</duration>{tm}
        <notations><tuplet type="stop"/></notations></note>
    </measure>"#,
        tm = tm
    ));

    assert_eq!(
        result.diagnostics.count_of(DiagnosticKind::TupletCrossesBarline),
        1
    );
    assert_eq!(voice(&result, 1, 1).nesting().depth(), 0);
}

#[test]
fn test_unclosed_tuplet_is_fatal() {
    let xml = single_part(
        r#"<measure number="1">
      <attributes><divisions>3</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations><tuplet type="start"/></notations></note>
    </measure>"#,
    );

    let error = convert_musicxml_to_msr(&xml, None).unwrap_err();

    assert!(matches!(
        error,
        ConversionError::InternalError(MsrError::UnclosedTuplets { depth: 1, .. })
    ));
}

#[test]
fn test_malformed_tuplet_start() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration>
        <notations><tuplet type="start"/></notations></note>
    </measure>"#,
    );

    let measure = &voice(&result, 1, 1).measures[0];
    assert!(matches!(measure.elements[0], VoiceElement::Note(_)));
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::MalformedTuplet), 1);
}

#[test]
fn test_pending_dynamics_drain_in_order() {
    let xml = single_part(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <direction><direction-type><dynamics><p/></dynamics></direction-type></direction>
      <direction><direction-type><dynamics><mf/></dynamics></direction-type></direction>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );
    let root = parse_musicxml_to_mxsr(&xml).unwrap();
    let mut populator = SkeletonPopulator::new(ConversionSettings::default());

    browse(&root, &mut populator).unwrap();

    assert!(populator.pending().dynamics.is_empty());
    let note = &populator.score().arena.notes[0];
    let kinds: Vec<&str> = note
        .annotations
        .dynamics
        .iter()
        .map(|d| d.kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["p", "mf"]);
}

#[test]
fn test_part_level_pending_goes_to_measure() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <direction placement="above">
        <direction-type><rehearsal>A</rehearsal></direction-type>
        <direction-type><words>Allegro</words></direction-type>
        <direction-type><metronome><beat-unit>quarter</beat-unit><per-minute>120</per-minute></metronome></direction-type>
      </direction>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );

    let measure = &first_part(&result).measures[0];
    assert_eq!(measure.rehearsal_marks[0].text, "A");
    assert_eq!(measure.tempos.len(), 1);
    assert_eq!(measure.tempos[0].per_minute.as_deref(), Some("120"));
    assert_eq!(measure.tempos[0].words.as_deref(), Some("Allegro"));
    assert!(result.score.arena.notes[0].annotations.words.is_empty());
}

#[test]
fn test_orphaned_pending_elements_are_reported() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
      <direction><direction-type><wedge type="crescendo"/></direction-type></direction>
      <direction><direction-type><segno/></direction-type></direction>
    </measure>"#,
    );

    let orphans: Vec<_> = result
        .diagnostics
        .of_kind(DiagnosticKind::OrphanedPendingElement)
        .collect();
    assert_eq!(orphans.len(), 2);
    assert!(orphans[0].message.starts_with("wedge"));
    assert!(orphans[0].input_line < orphans[1].input_line);
}

#[test]
fn test_staff_change_redirects_notes() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions><staves>2</staves></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration><voice>1</voice><staff>1</staff></note>
      <note><pitch><step>D</step><octave>3</octave></pitch><duration>1</duration><voice>1</voice><staff>2</staff></note>
      <note><pitch><step>E</step><octave>3</octave></pitch><duration>1</duration><voice>1</voice></note>
    </measure>"#,
    );

    let upper = &voice(&result, 1, 1).measures[0];
    assert_eq!(pitch_name(&result.score, &upper.elements[0]), "C4");
    assert_eq!(upper.elements[1], VoiceElement::StaffChange { from: 1, to: 2 });
    assert_eq!(upper.elements[2], VoiceElement::Padding(WholeNotes::new(1, 2)));

    let lower = &voice(&result, 2, 1).measures[0];
    assert_eq!(lower.elements[0], VoiceElement::Padding(WholeNotes::new(1, 4)));
    assert_eq!(pitch_name(&result.score, &lower.elements[1]), "D3");
    assert_eq!(pitch_name(&result.score, &lower.elements[2]), "E3");
    assert_eq!(lower.position, WholeNotes::new(3, 4));
}

#[test]
fn test_undeclared_staff_is_ignored() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration><staff>3</staff></note>
    </measure>"#,
    );

    assert!(first_part(&result).voice(1, 1).is_some());
    assert!(first_part(&result).voice(3, 1).is_none());
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::UndeclaredStaff), 1);
}

#[test]
fn test_grace_notes_before_principal() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><grace slash="yes"/><pitch><step>B</step><octave>3</octave></pitch><type>eighth</type></note>
      <note><grace slash="yes"/><pitch><step>D</step><octave>4</octave></pitch><type>eighth</type></note>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );

    let measure = &voice(&result, 1, 1).measures[0];
    assert_eq!(measure.elements.len(), 1);
    let VoiceElement::Note(principal) = measure.elements[0] else {
        panic!("Expected the principal note");
    };
    let arena = &result.score.arena;
    let group = arena
        .note(principal)
        .unwrap()
        .grace_notes_group_before
        .unwrap();
    let group = arena.grace_notes_group(group).unwrap();
    assert_eq!(group.kind, GraceNotesGroupKind::Before);
    assert!(group.slashed);
    assert_eq!(group.members.len(), 2);
    assert_eq!(measure.position, WholeNotes::new(1, 4));
}

#[test]
fn test_trailing_grace_notes_become_after_group() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>
      <note><grace/><pitch><step>B</step><octave>3</octave></pitch><type>16th</type></note>
      <note><grace/><chord/><pitch><step>D</step><octave>4</octave></pitch><type>16th</type></note>
    </measure>"#,
    );

    let arena = &result.score.arena;
    let group = arena.notes[0].grace_notes_group_after.unwrap();
    let group = arena.grace_notes_group(group).unwrap();
    assert_eq!(group.kind, GraceNotesGroupKind::After);
    assert_eq!(group.members.len(), 1);
    assert!(matches!(group.members[0], GraceMember::Chord(_)));
}

#[test]
fn test_backup_two_voices() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>2</divisions></attributes>
      <note><pitch><step>E</step><octave>5</octave></pitch><duration>8</duration><voice>1</voice></note>
      <backup><duration>8</duration></backup>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration><voice>2</voice></note>
      <note><rest/><duration>4</duration><voice>2</voice></note>
    </measure>"#,
    );

    let part = first_part(&result);
    assert_eq!(part.measures[0].length, WholeNotes::new(1, 1));
    assert_eq!(voice(&result, 1, 1).measures[0].elements.len(), 1);

    let second = &voice(&result, 1, 2).measures[0];
    assert_eq!(second.elements.len(), 2);
    let VoiceElement::Note(rest) = second.elements[1] else {
        panic!("Expected a rest");
    };
    assert!(result.score.arena.note(rest).unwrap().is_rest());
    assert_eq!(second.position, WholeNotes::new(1, 1));
}

#[test]
fn test_forward_pads_the_voice() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>5</octave></pitch><duration>4</duration><voice>1</voice></note>
      <backup><duration>4</duration></backup>
      <forward><duration>2</duration><voice>2</voice></forward>
      <note><pitch><step>G</step><octave>4</octave></pitch><duration>2</duration><voice>2</voice></note>
    </measure>"#,
    );

    let second = &voice(&result, 1, 2).measures[0];
    assert_eq!(second.elements[0], VoiceElement::Padding(WholeNotes::new(1, 2)));
    assert_eq!(pitch_name(&result.score, &second.elements[1]), "G4");
}

#[test]
fn test_negative_backup_is_clamped() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
      <backup><duration>3</duration></backup>
      <note><pitch><step>D</step><octave>4</octave></pitch><duration>1</duration><voice>2</voice></note>
    </measure>"#,
    );

    assert_eq!(result.diagnostics.count_of(DiagnosticKind::NegativeBackup), 1);
    let second = &voice(&result, 1, 2).measures[0];
    assert_eq!(pitch_name(&result.score, &second.elements[0]), "D4");
}

#[test]
fn test_hidden_rest_is_a_skip() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note print-object="no"><rest/><duration>1</duration></note>
    </measure>"#,
    );

    assert_eq!(result.score.arena.notes[0].kind, NoteKind::Skip);
}

#[test]
fn test_multiple_rest_span() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions><measure-style><multiple-rest>2</multiple-rest></measure-style></attributes>
      <note><rest measure="yes"/><duration>4</duration></note>
    </measure>
    <measure number="2">
      <note><rest measure="yes"/><duration>4</duration></note>
    </measure>"#,
    );

    let rests = &first_part(&result).multiple_measure_rests;
    assert_eq!(rests.len(), 1);
    assert_eq!(rests[0].first_measure, "1");
    assert_eq!(rests[0].last_measure, "2");
    assert_eq!(rests[0].measure_count, 2);
}

#[test]
fn test_measure_repeat_span() {
    let note = r#"<note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>"#;
    let result = convert(&format!(
        r#"<measure number="1"><attributes><divisions>1</divisions></attributes>{note}</measure>
    <measure number="2"><attributes><measure-style><measure-repeat type="start" slashes="1">1</measure-repeat></measure-style></attributes>{note}</measure>
    <measure number="3">{note}</measure>
    <measure number="4"><attributes><measure-style><measure-repeat type="stop"/></measure-style></attributes>{note}</measure>"#,
        note = note
    ));

    let repeats = &first_part(&result).measure_repeats;
    assert_eq!(repeats.len(), 1);
    assert_eq!(repeats[0].first_measure, "2");
    assert_eq!(repeats[0].last_measure, "3");
    assert_eq!(repeats[0].measure_count, 2);
    assert_eq!(repeats[0].slashes, Some(1));
}

#[test]
fn test_beat_repeat_span() {
    let note = r#"<note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>"#;
    let result = convert(&format!(
        r#"<measure number="1"><attributes><divisions>1</divisions><measure-style><beat-repeat type="start" slashes="2"/></measure-style></attributes>{note}</measure>
    <measure number="2"><attributes><measure-style><beat-repeat type="stop"/></measure-style></attributes>{note}</measure>"#,
        note = note
    ));

    let repeats = &first_part(&result).beat_repeats;
    assert_eq!(repeats.len(), 1);
    assert_eq!(repeats[0].first_measure, "1");
    assert_eq!(repeats[0].last_measure, "1");
    assert_eq!(repeats[0].measure_count, 1);
    assert_eq!(repeats[0].slashes, Some(2));
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::UnmatchedBeatRepeat), 0);
}

#[test]
fn test_beat_repeat_never_stopped() {
    let note = r#"<note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>"#;
    let result = convert(&format!(
        r#"<measure number="1"><attributes><divisions>1</divisions><measure-style><beat-repeat type="start"/></measure-style></attributes>{note}</measure>"#,
        note = note
    ));

    assert!(first_part(&result).beat_repeats.is_empty());
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::UnmatchedBeatRepeat), 1);
}

#[test]
fn test_double_tremolo_pairs_two_notes() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration><type>half</type>
        <notations><ornaments><tremolo type="start">3</tremolo></ornaments></notations></note>
      <note><pitch><step>E</step><octave>4</octave></pitch><duration>2</duration><type>half</type>
        <notations><ornaments><tremolo type="stop">3</tremolo></ornaments></notations></note>
    </measure>"#,
    );

    let measure = &voice(&result, 1, 1).measures[0];
    let [VoiceElement::DoubleTremolo(id)] = measure.elements[..] else {
        panic!("Expected a lone double tremolo, got {:?}", measure.elements);
    };
    let tremolo = result.score.arena.double_tremolo(id).unwrap();
    assert_eq!(tremolo.marks, 3);
    assert_eq!(tremolo.members.len(), 2);
    assert_eq!(measure.position, WholeNotes::new(1, 1));
    assert!(result.score.arena.notes.iter().all(|n| n.ornaments.is_empty()));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_single_tremolo_stays_an_ornament() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration><type>quarter</type>
        <notations><ornaments><tremolo type="single">2</tremolo></ornaments></notations></note>
    </measure>"#,
    );

    let note = &result.score.arena.notes[0];
    assert_eq!(note.ornaments.len(), 1);
    assert_eq!(note.ornaments[0].kind, "tremolo");
    assert_eq!(note.ornaments[0].marks, Some(2));
    assert!(result.score.arena.double_tremolos.is_empty());
}

#[test]
fn test_double_tremolo_without_stop() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration><type>half</type>
        <notations><ornaments><tremolo type="start">3</tremolo></ornaments></notations></note>
      <note><pitch><step>E</step><octave>4</octave></pitch><duration>2</duration><type>half</type></note>
      <note><pitch><step>G</step><octave>4</octave></pitch><duration>2</duration><type>half</type>
        <notations><ornaments><tremolo type="stop">3</tremolo></ornaments></notations></note>
    </measure>"#,
    );

    let measure = &voice(&result, 1, 1).measures[0];
    assert_eq!(measure.elements.len(), 3);
    assert_eq!(pitch_name(&result.score, &measure.elements[1]), "E4");
    assert_eq!(
        result.diagnostics.count_of(DiagnosticKind::UnmatchedDoubleTremolo),
        2
    );
}

#[test]
fn test_lyrics_collected_per_stanza() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration>
        <lyric number="1"><syllabic>begin</syllabic><text>Hal</text></lyric></note>
      <note><pitch><step>D</step><octave>4</octave></pitch><duration>1</duration>
        <lyric number="1"><syllabic>end</syllabic><text>le</text><elision/><text>lu</text></lyric></note>
    </measure>"#,
    );

    let stanzas = &voice(&result, 1, 1).stanzas;
    assert_eq!(stanzas.len(), 1);
    let texts: Vec<&str> = stanzas[0].syllables.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Hal", "le_lu"]);
}

#[test]
fn test_invalid_divisions_keep_previous_value() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>0</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );

    assert_eq!(result.diagnostics.count_of(DiagnosticKind::InvalidDivisions), 1);
    assert_eq!(
        result.score.arena.notes[0].sounding_whole_notes,
        WholeNotes::new(1, 4)
    );
}

#[test]
fn test_divisions_out_of_range_are_rejected() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>600000000</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );

    assert_eq!(result.diagnostics.count_of(DiagnosticKind::InvalidDivisions), 1);
    assert_eq!(
        result.score.arena.notes[0].sounding_whole_notes,
        WholeNotes::new(1, 4)
    );
}

#[test]
fn test_excessive_dots_are_capped() {
    let dots = "<dot/>".repeat(24);
    let result = convert(&format!(
        r#"<measure number="1">
      <attributes><divisions>256</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration><type>1024th</type>{dots}</note>
    </measure>"#,
        dots = dots
    ));

    assert_eq!(result.diagnostics.count_of(DiagnosticKind::ExcessiveDots), 1);
    let note = &result.score.arena.notes[0];
    assert_eq!(note.dots, MAX_DOTS);
    assert_eq!(
        note.display_whole_notes,
        NoteType::N1024th.dotted_whole_notes(MAX_DOTS)
    );
}

#[test]
fn test_unsupported_construct_is_skipped() {
    let result = convert(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <direction><direction-type><pedal type="start"/></direction-type></direction>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
    </measure>"#,
    );

    assert_eq!(
        result.diagnostics.count_of(DiagnosticKind::UnsupportedConstruct),
        1
    );
    assert!(!result.diagnostics.has_errors());
    assert_eq!(result.score.arena.notes.len(), 1);
}

#[test]
fn test_malformed_xml_is_fatal() {
    let error = convert_musicxml_to_msr("<score-partwise><part>", None).unwrap_err();

    assert!(matches!(error, ConversionError::ParseError(_)));
}

#[test]
fn test_input_source_name_stamped_on_diagnostics() {
    let settings = ConversionSettings {
        input_source_name: "syrinx.xml".to_string(),
        ..ConversionSettings::default()
    };
    let xml = single_part(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration>
        <notations><tuplet type="stop"/></notations></note>
    </measure>"#,
    );

    let result = convert_musicxml_to_msr(&xml, Some(settings)).unwrap();

    assert_eq!(result.diagnostics.marks[0].input_source, "syrinx.xml");
}
