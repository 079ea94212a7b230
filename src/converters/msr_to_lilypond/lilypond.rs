//! LilyPond notation generation
//!
//! Walks a populated MSR score and emits LilyPond source: one staff
//! context per staff, one voice context per voice, lyrics per stanza.
//! Pitches are absolute, in Dutch note names.

use super::templates::{render_lilypond, TemplateContext};
use crate::converters::mxsr_to_msr::{ConversionError, LilypondSettings};
use crate::msr::annotations::{NoteAnnotations, SyllableKind, Tempo, WedgeKind};
use crate::msr::{
    Alteration, ChordId, Clef, DoubleTremoloId, GraceMember, GraceNotesGroupId, Key, MsrArena,
    Note, NoteId, NoteKind, NoteType, Part, PartMeasure, Pitch, Placement, Score, StartStop, Step,
    Time, TremoloMember, TupletId, TupletMember, Voice, VoiceElement, WholeNotes,
};

/// Generate the LilyPond document for a score
pub fn generate_lilypond_document(
    score: &Score,
    settings: &LilypondSettings,
) -> Result<String, ConversionError> {
    let mut parts = Vec::new();
    for part in &score.parts {
        parts.push(part_to_lilypond(part, &score.arena, settings)?);
    }

    let context = TemplateContext::builder(settings.version.clone(), parts.join("\n"))
        .title(score.title.as_deref().map(escape_lilypond_string))
        .composer(score.composer.as_deref().map(escape_lilypond_string))
        .build();

    render_lilypond(&context)
}

fn staff_context_name(part: &Part, staff_number: i32) -> String {
    format!("{}-{}", part.id, staff_number)
}

fn voice_context_name(part: &Part, voice: &Voice) -> String {
    format!("{}-{}-{}", part.id, voice.staff_number, voice.number)
}

/// One part: a single staff, or a `PianoStaff` group for several staves
fn part_to_lilypond(
    part: &Part,
    arena: &MsrArena,
    settings: &LilypondSettings,
) -> Result<String, ConversionError> {
    let grouped = part.staves.len() > 1;
    let indent = if grouped { 6 } else { 4 };
    let instrument = part
        .name
        .as_deref()
        .map(|name| format!(" \\with {{ instrumentName = \"{}\" }}", escape_lilypond_string(name)))
        .unwrap_or_default();

    let mut staves = Vec::new();
    for (staff_index, staff) in part.staves.iter().enumerate() {
        let pad = " ".repeat(indent);
        let mut block = format!(
            "{}\\new Staff = \"{}\"{} <<\n",
            pad,
            staff_context_name(part, staff.number),
            if grouped { String::new() } else { instrument.clone() }
        );

        let mut lyrics = Vec::new();
        for (voice_index, voice) in staff.voices.iter().enumerate() {
            let voice_command = match (staff.voices.len(), voice_index) {
                (1, _) => "",
                (_, 0) => "\\voiceOne ",
                (_, 1) => "\\voiceTwo ",
                (_, 2) => "\\voiceThree ",
                _ => "\\voiceFour ",
            };
            let name = voice_context_name(part, voice);
            let carries_part_marks = staff_index == 0 && voice_index == 0;
            let music = voice_to_lilypond(part, voice, arena, carries_part_marks, indent + 4)?;
            block.push_str(&format!(
                "{}  \\new Voice = \"{}\" {{ {}\n{}{}  }}\n",
                pad, name, voice_command, music, pad
            ));

            if settings.include_lyrics {
                for stanza in &voice.stanzas {
                    if stanza.syllables.is_empty() {
                        continue;
                    }
                    lyrics.push(format!(
                        "{}\\new Lyrics \\lyricsto \"{}\" {{ {} }}",
                        pad,
                        name,
                        stanza_to_lilypond(&stanza.syllables)
                    ));
                }
            }
        }
        block.push_str(&format!("{}>>", pad));
        staves.push(block);
        staves.extend(lyrics);
    }

    if grouped {
        Ok(format!(
            "    \\new PianoStaff{} <<\n{}\n    >>",
            instrument,
            staves.join("\n")
        ))
    } else {
        Ok(staves.join("\n"))
    }
}

fn stanza_to_lilypond(syllables: &[crate::msr::annotations::Syllable]) -> String {
    syllables
        .iter()
        .map(|syllable| {
            let mut text = format!("\"{}\"", escape_lilypond_string(&syllable.text));
            if matches!(syllable.kind, SyllableKind::Begin | SyllableKind::Middle) {
                text.push_str(" --");
            }
            if syllable.extend {
                text.push_str(" __");
            }
            text
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per measure, each ending with a bar check
fn voice_to_lilypond(
    part: &Part,
    voice: &Voice,
    arena: &MsrArena,
    carries_part_marks: bool,
    indent: usize,
) -> Result<String, ConversionError> {
    let pad = " ".repeat(indent);
    let mut output = String::new();

    for (index, measure) in voice.measures.iter().enumerate() {
        let mut tokens = Vec::new();
        if let Some(part_measure) = part.measures.get(index) {
            tokens.extend(measure_attributes(part_measure, voice.staff_number));
            if carries_part_marks {
                tokens.extend(part_marks(part_measure));
            }
        }
        for element in &measure.elements {
            let rendered = element_to_lilypond(part, element, arena)?;
            if !rendered.is_empty() {
                tokens.push(rendered);
            }
        }
        if let Some(bar) = part.measures.get(index).and_then(final_barline) {
            tokens.push(bar);
        }
        tokens.push("|".to_string());
        output.push_str(&format!("{}{}\n", pad, tokens.join(" ")));
    }

    Ok(output)
}

/// Clef, key and time changes at the start of a measure
fn measure_attributes(measure: &PartMeasure, staff_number: i32) -> Vec<String> {
    let mut tokens = Vec::new();
    for clef in measure.clefs.iter().filter(|c| c.staff_number == staff_number) {
        tokens.push(clef_to_lilypond(clef));
    }
    if let Some(ref key) = measure.key {
        tokens.push(key_to_lilypond(key));
    }
    if let Some(ref time) = measure.time {
        tokens.push(time_to_lilypond(time));
    }
    tokens
}

/// Breaks, rehearsal marks and tempos, emitted once per part
fn part_marks(measure: &PartMeasure) -> Vec<String> {
    let mut tokens = Vec::new();
    if !measure.page_breaks.is_empty() {
        tokens.push("\\pageBreak".to_string());
    } else if !measure.line_breaks.is_empty() {
        tokens.push("\\break".to_string());
    }
    for mark in &measure.rehearsal_marks {
        tokens.push(format!("\\mark \"{}\"", escape_lilypond_string(&mark.text)));
    }
    for tempo in &measure.tempos {
        if let Some(rendered) = tempo_to_lilypond(tempo) {
            tokens.push(rendered);
        }
    }
    tokens
}

fn final_barline(measure: &PartMeasure) -> Option<String> {
    let barline = measure
        .barlines
        .iter()
        .find(|b| b.location == "right")?;
    if barline.repeat_direction.as_deref() == Some("backward") {
        return Some("\\bar \":|.\"".to_string());
    }
    let bar = match barline.bar_style.as_deref()? {
        "light-heavy" => "|.",
        "light-light" => "||",
        "heavy-light" => ".|",
        "heavy-heavy" => "..",
        "dashed" => "!",
        "dotted" => ";",
        "none" => "",
        _ => return None,
    };
    Some(format!("\\bar \"{}\"", bar))
}

fn element_to_lilypond(
    part: &Part,
    element: &VoiceElement,
    arena: &MsrArena,
) -> Result<String, ConversionError> {
    match element {
        VoiceElement::Note(id) => note_with_grace_notes(*id, arena),
        VoiceElement::Chord(id) => chord_with_grace_notes(*id, arena),
        VoiceElement::Tuplet(id) => tuplet_to_lilypond(*id, arena),
        VoiceElement::DoubleTremolo(id) => double_tremolo_to_lilypond(*id, arena),
        VoiceElement::Padding(duration) => Ok(padding_to_lilypond(*duration)),
        VoiceElement::StaffChange { to, .. } => Ok(format!(
            "\\change Staff = \"{}\"",
            staff_context_name(part, *to)
        )),
    }
}

fn padding_to_lilypond(duration: WholeNotes) -> String {
    if duration.is_zero() || duration.is_negative() {
        String::new()
    } else {
        format!("s{}", whole_notes_to_lilypond(duration))
    }
}

/// Wrap `main` with the grace notes groups hanging off `anchor`
fn with_grace_notes(
    main: String,
    anchor: &Note,
    arena: &MsrArena,
) -> Result<String, ConversionError> {
    let mut result = main;
    if let Some(group) = anchor.grace_notes_group_before {
        let (slashed, music) = grace_notes_to_lilypond(group, arena)?;
        let command = if slashed { "\\slashedGrace" } else { "\\grace" };
        result = format!("{} {{ {} }} {}", command, music, result);
    }
    if let Some(group) = anchor.grace_notes_group_after {
        let (_, music) = grace_notes_to_lilypond(group, arena)?;
        result = format!("\\afterGrace {} {{ {} }}", result, music);
    }
    Ok(result)
}

fn note_with_grace_notes(id: NoteId, arena: &MsrArena) -> Result<String, ConversionError> {
    let note = arena.note(id)?;
    with_grace_notes(note_to_lilypond(note), note, arena)
}

fn chord_with_grace_notes(id: ChordId, arena: &MsrArena) -> Result<String, ConversionError> {
    let chord = arena.chord(id)?;
    let Some(&anchor) = chord.notes.first() else {
        return Ok(String::new());
    };
    let anchor = arena.note(anchor)?;
    with_grace_notes(chord_to_lilypond(id, arena)?, anchor, arena)
}

fn grace_notes_to_lilypond(
    group: GraceNotesGroupId,
    arena: &MsrArena,
) -> Result<(bool, String), ConversionError> {
    let group = arena.grace_notes_group(group)?;
    let mut members = Vec::new();
    for member in &group.members {
        members.push(match member {
            GraceMember::Note(id) => note_to_lilypond(arena.note(*id)?),
            GraceMember::Chord(id) => chord_to_lilypond(*id, arena)?,
        });
    }
    Ok((group.slashed, members.join(" ")))
}

fn tuplet_to_lilypond(id: TupletId, arena: &MsrArena) -> Result<String, ConversionError> {
    // LilyPond syntax: \tuplet actual/normal { notes }
    let tuplet = arena.tuplet(id)?;
    let mut contents = Vec::new();
    for member in &tuplet.members {
        contents.push(match member {
            TupletMember::Note(id) => note_with_grace_notes(*id, arena)?,
            TupletMember::Chord(id) => chord_with_grace_notes(*id, arena)?,
            TupletMember::Tuplet(id) => tuplet_to_lilypond(*id, arena)?,
        });
    }
    Ok(format!(
        "\\tuplet {}/{} {{ {} }}",
        tuplet.factor.actual,
        tuplet.factor.normal,
        contents.join(" ")
    ))
}

/// Duration of one tremolo stroke: one mark strokes in eighths
fn tremolo_stroke(marks: u32) -> i64 {
    1 << (marks.min(8) + 2)
}

fn double_tremolo_to_lilypond(id: DoubleTremoloId, arena: &MsrArena) -> Result<String, ConversionError> {
    // LilyPond syntax: \repeat tremolo count { a b }, written in stroke durations
    let tremolo = arena.double_tremolo(id)?;
    let stroke = tremolo_stroke(tremolo.marks);
    let total = arena.double_tremolo_sounding_whole_notes(id)?;
    let numerator = i64::from(total.numerator()) * stroke;
    let denominator = i64::from(total.denominator()) * tremolo.members.len() as i64;

    if denominator == 0 || numerator <= 0 || numerator % denominator != 0 {
        let mut members = Vec::new();
        for member in &tremolo.members {
            members.push(match member {
                TremoloMember::Note(id) => note_with_grace_notes(*id, arena)?,
                TremoloMember::Chord(id) => chord_with_grace_notes(*id, arena)?,
            });
        }
        return Ok(members.join(" "));
    }

    let mut strokes = Vec::new();
    for member in &tremolo.members {
        let notes = match member {
            TremoloMember::Note(id) => vec![*id],
            TremoloMember::Chord(id) => arena.chord(*id)?.notes.clone(),
        };
        let mut pitches = Vec::new();
        for note in notes {
            pitches.push(match arena.note(note)?.pitch() {
                Some(pitch) => pitch_to_lilypond(&pitch),
                None => "r".to_string(),
            });
        }
        let body = if pitches.len() == 1 {
            pitches.concat()
        } else {
            format!("<{}>", pitches.join(" "))
        };
        strokes.push(format!("{}{}", body, stroke));
    }
    Ok(format!(
        "\\repeat tremolo {} {{ {} }}",
        numerator / denominator,
        strokes.join(" ")
    ))
}

fn note_to_lilypond(note: &Note) -> String {
    let duration = note_duration(note);
    let body = match &note.kind {
        NoteKind::Pitched(pitch) => format!("{}{}", pitch_to_lilypond(pitch), duration),
        NoteKind::Rest {
            measure_rest: true, ..
        } => format!("R{}", whole_notes_to_lilypond(note.sounding_whole_notes)),
        NoteKind::Rest { .. } => format!("r{}", duration),
        NoteKind::Unpitched {
            display_step,
            display_octave,
        } => {
            let pitch = Pitch::new(
                display_step.unwrap_or(Step::B),
                Alteration::Natural,
                display_octave.unwrap_or(4),
            );
            format!("{}{}", pitch_to_lilypond(&pitch), duration)
        }
        NoteKind::Skip => format!("s{}", duration),
    };
    let postfix = note_postfix(note);
    if postfix.is_empty() {
        body
    } else {
        format!("{}{}", body, postfix.concat())
    }
}

fn chord_to_lilypond(id: ChordId, arena: &MsrArena) -> Result<String, ConversionError> {
    let chord = arena.chord(id)?;
    let mut pitches = Vec::new();
    let mut postfix: Vec<String> = Vec::new();
    let mut duration = whole_notes_to_lilypond(chord.display_whole_notes);

    for (index, id) in chord.notes.iter().enumerate() {
        let note = arena.note(*id)?;
        if let Some(pitch) = note.pitch() {
            pitches.push(pitch_to_lilypond(&pitch));
        }
        if index == 0 {
            duration = note_duration(note);
        }
        for token in note_postfix(note) {
            if !postfix.contains(&token) {
                postfix.push(token);
            }
        }
    }

    Ok(format!("<{}>{}{}", pitches.join(" "), duration, postfix.concat()))
}

fn note_duration(note: &Note) -> String {
    match note.note_type {
        Some(note_type) => format!(
            "{}{}",
            note_type_to_lilypond(note_type),
            ".".repeat(note.dots as usize)
        ),
        None => whole_notes_to_lilypond(note.display_whole_notes),
    }
}

fn note_type_to_lilypond(note_type: NoteType) -> &'static str {
    match note_type {
        NoteType::Maxima => "\\maxima",
        NoteType::Long => "\\longa",
        NoteType::Breve => "\\breve",
        NoteType::Whole => "1",
        NoteType::Half => "2",
        NoteType::Quarter => "4",
        NoteType::Eighth => "8",
        NoteType::N16th => "16",
        NoteType::N32nd => "32",
        NoteType::N64th => "64",
        NoteType::N128th => "128",
        NoteType::N256th => "256",
        NoteType::N512th => "512",
        NoteType::N1024th => "1024",
    }
}

/// Plain duration for power-of-two fractions, scaled whole note otherwise
pub fn whole_notes_to_lilypond(duration: WholeNotes) -> String {
    let (numerator, denominator) = (duration.numerator(), duration.denominator());
    if numerator <= 0 {
        return "4".to_string();
    }
    if numerator == 1 && (denominator & (denominator - 1)) == 0 {
        return denominator.to_string();
    }
    if denominator == 1 {
        format!("1*{}", numerator)
    } else {
        format!("1*{}/{}", numerator, denominator)
    }
}

/// Absolute pitch: `c` is C3, `c'` is C4, `c,` is C2
pub fn pitch_to_lilypond(pitch: &Pitch) -> String {
    let marks = pitch.octave - 3;
    let octave = if marks >= 0 {
        "'".repeat(marks as usize)
    } else {
        ",".repeat(marks.unsigned_abs() as usize)
    };
    format!(
        "{}{}{}",
        pitch.step.lowercase(),
        pitch.alteration.dutch_suffix(),
        octave
    )
}

/// Marks following the note: ties, slurs, dynamics, articulations, text
fn note_postfix(note: &Note) -> Vec<String> {
    let mut tokens = Vec::new();
    let annotations: &NoteAnnotations = &note.annotations;

    if let Some(marks) = note
        .ornaments
        .iter()
        .find(|o| o.kind == "tremolo")
        .and_then(|o| o.marks)
    {
        tokens.push(format!(":{}", tremolo_stroke(marks)));
    }

    if annotations
        .ties
        .iter()
        .any(|t| matches!(t.kind, StartStop::Start | StartStop::Continue))
    {
        tokens.push("~".to_string());
    }

    for articulation in &note.articulations {
        if let Some(mark) = articulation_to_lilypond(&articulation.kind) {
            tokens.push(mark.to_string());
        }
    }
    for ornament in &note.ornaments {
        if let Some(mark) = ornament_to_lilypond(&ornament.kind) {
            tokens.push(mark.to_string());
        }
    }
    for technical in &note.technicals {
        match technical.kind.as_str() {
            "up-bow" => tokens.push("\\upbow".to_string()),
            "down-bow" => tokens.push("\\downbow".to_string()),
            "harmonic" => tokens.push("\\flageolet".to_string()),
            "fingering" => {
                if let Some(finger) = technical.text.as_deref().and_then(|t| t.trim().parse::<u32>().ok()) {
                    tokens.push(format!("-{}", finger));
                }
            }
            _ => {}
        }
    }
    if !note.fermatas.is_empty() {
        tokens.push("\\fermata".to_string());
    }
    if note.arpeggiate {
        tokens.push("\\arpeggio".to_string());
    }

    // a slur stop and start on the same note must close first
    for slur in annotations.slurs.iter().filter(|s| s.kind == StartStop::Stop) {
        tokens.push(slur_mark(slur.number, ")"));
    }
    for slur in annotations.slurs.iter().filter(|s| s.kind == StartStop::Start) {
        tokens.push(slur_mark(slur.number, "("));
    }

    for dynamic in &annotations.dynamics {
        tokens.push(dynamic_to_lilypond(&dynamic.kind));
    }
    for other in &annotations.other_dynamics {
        tokens.push(format!(
            "_\\markup {{ \\dynamic \"{}\" }}",
            escape_lilypond_string(&other.text)
        ));
    }
    for wedge in &annotations.wedges {
        tokens.push(
            match wedge.kind {
                WedgeKind::Crescendo => "\\<",
                WedgeKind::Diminuendo => "\\>",
                WedgeKind::Stop => "\\!",
            }
            .to_string(),
        );
    }
    if annotations
        .glissandos
        .iter()
        .any(|g| g.kind == StartStop::Start)
    {
        tokens.push("\\glissando".to_string());
    }
    for words in &annotations.words {
        let direction = match words.placement {
            Some(Placement::Below) => "_",
            _ => "^",
        };
        tokens.push(format!(
            "{}\\markup {{ \"{}\" }}",
            direction,
            escape_lilypond_string(&words.text)
        ));
    }
    if !annotations.segnos.is_empty() {
        tokens.push("^\\markup { \\musicglyph \"scripts.segno\" }".to_string());
    }
    if !annotations.codas.is_empty() {
        tokens.push("^\\markup { \\musicglyph \"scripts.coda\" }".to_string());
    }

    tokens
}

fn slur_mark(number: i32, mark: &str) -> String {
    // overlapping slurs need an explicit id
    if number > 1 {
        format!("\\={}{}", number, mark)
    } else {
        mark.to_string()
    }
}

fn dynamic_to_lilypond(kind: &str) -> String {
    const LILYPOND_DYNAMICS: &[&str] = &[
        "ppppp", "pppp", "ppp", "pp", "p", "mp", "mf", "f", "ff", "fff", "ffff", "fffff", "fp",
        "sf", "sff", "sp", "spp", "sfz", "rfz", "n",
    ];
    if LILYPOND_DYNAMICS.contains(&kind) {
        format!("\\{}", kind)
    } else {
        format!("_\\markup {{ \\dynamic {} }}", kind)
    }
}

fn articulation_to_lilypond(kind: &str) -> Option<&'static str> {
    match kind {
        "staccato" => Some("-."),
        "staccatissimo" => Some("-!"),
        "accent" => Some("->"),
        "strong-accent" => Some("-^"),
        "tenuto" => Some("--"),
        "detached-legato" => Some("-_"),
        "breath-mark" => Some("\\breathe"),
        _ => None,
    }
}

fn ornament_to_lilypond(kind: &str) -> Option<&'static str> {
    match kind {
        "trill-mark" => Some("\\trill"),
        "turn" => Some("\\turn"),
        "inverted-turn" => Some("\\reverseturn"),
        "mordent" => Some("\\mordent"),
        "inverted-mordent" => Some("\\prall"),
        _ => None,
    }
}

fn clef_to_lilypond(clef: &Clef) -> String {
    let name = match (clef.sign.as_str(), clef.line) {
        ("G", Some(1)) => "french",
        ("G", _) => "treble",
        ("F", Some(3)) => "varbaritone",
        ("F", Some(5)) => "subbass",
        ("F", _) => "bass",
        ("C", Some(1)) => "soprano",
        ("C", Some(2)) => "mezzosoprano",
        ("C", Some(4)) => "tenor",
        ("C", Some(5)) => "baritone",
        ("C", _) => "alto",
        ("percussion", _) => "percussion",
        ("TAB", _) => "tab",
        _ => "treble",
    };
    match clef.octave_change {
        -1 => format!("\\clef \"{}_8\"", name),
        1 => format!("\\clef \"{}^8\"", name),
        _ => format!("\\clef {}", name),
    }
}

fn key_to_lilypond(key: &Key) -> String {
    // tonics along the circle of fifths, from 7 flats to 10 sharps
    const TONICS: [&str; 18] = [
        "ces", "ges", "des", "as", "es", "bes", "f", "c", "g", "d", "a", "e", "b", "fis", "cis",
        "gis", "dis", "ais",
    ];
    let minor = key.mode.as_deref() == Some("minor");
    let position = key.fifths + 7 + if minor { 3 } else { 0 };
    let tonic = usize::try_from(position)
        .ok()
        .and_then(|p| TONICS.get(p))
        .copied()
        .unwrap_or("c");
    format!("\\key {} {}", tonic, if minor { "\\minor" } else { "\\major" })
}

fn time_to_lilypond(time: &Time) -> String {
    if time.senza_misura {
        "\\cadenzaOn".to_string()
    } else {
        format!("\\time {}/{}", time.beats, time.beat_type)
    }
}

fn tempo_to_lilypond(tempo: &Tempo) -> Option<String> {
    let words = tempo
        .words
        .as_deref()
        .map(|w| format!("\"{}\"", escape_lilypond_string(w)));
    let per_minute = tempo
        .per_minute
        .as_deref()
        .and_then(|p| p.trim().parse::<u32>().ok());
    let metronome = per_minute.map(|bpm| {
        let unit = tempo.beat_unit.map_or("4", note_type_to_lilypond);
        format!(
            "{}{} = {}",
            unit,
            ".".repeat(tempo.beat_unit_dots as usize),
            bpm
        )
    });

    match (words, metronome) {
        (Some(words), Some(metronome)) => Some(format!("\\tempo {} {}", words, metronome)),
        (Some(words), None) => Some(format!("\\tempo {}", words)),
        (None, Some(metronome)) => Some(format!("\\tempo {}", metronome)),
        (None, None) => None,
    }
}

/// Escape special characters for LilyPond strings
pub fn escape_lilypond_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_names_and_octaves() {
        assert_eq!(
            pitch_to_lilypond(&Pitch::new(Step::C, Alteration::Natural, 4)),
            "c'"
        );
        assert_eq!(
            pitch_to_lilypond(&Pitch::new(Step::B, Alteration::Flat, 3)),
            "bes"
        );
        assert_eq!(
            pitch_to_lilypond(&Pitch::new(Step::F, Alteration::Sharp, 1)),
            "fis,,"
        );
        assert_eq!(
            pitch_to_lilypond(&Pitch::new(Step::E, Alteration::SemiFlat, 5)),
            "eeh''"
        );
    }

    #[test]
    fn test_whole_notes_durations() {
        assert_eq!(whole_notes_to_lilypond(WholeNotes::new(1, 4)), "4");
        assert_eq!(whole_notes_to_lilypond(WholeNotes::new(1, 1)), "1");
        assert_eq!(whole_notes_to_lilypond(WholeNotes::new(3, 4)), "1*3/4");
        assert_eq!(whole_notes_to_lilypond(WholeNotes::new(2, 1)), "1*2");
    }

    #[test]
    fn test_key_signatures() {
        let key = |fifths, mode: Option<&str>| Key {
            fifths,
            mode: mode.map(str::to_string),
        };
        assert_eq!(key_to_lilypond(&key(0, None)), "\\key c \\major");
        assert_eq!(key_to_lilypond(&key(-3, Some("major"))), "\\key es \\major");
        assert_eq!(key_to_lilypond(&key(0, Some("minor"))), "\\key a \\minor");
        assert_eq!(key_to_lilypond(&key(7, Some("minor"))), "\\key ais \\minor");
    }

    #[test]
    fn test_clefs() {
        let clef = |sign: &str, line, octave_change| Clef {
            staff_number: 1,
            sign: sign.to_string(),
            line,
            octave_change,
        };
        assert_eq!(clef_to_lilypond(&clef("G", Some(2), 0)), "\\clef treble");
        assert_eq!(clef_to_lilypond(&clef("F", Some(4), 0)), "\\clef bass");
        assert_eq!(clef_to_lilypond(&clef("G", Some(2), -1)), "\\clef \"treble_8\"");
    }

    #[test]
    fn test_tempo() {
        let tempo = Tempo {
            beat_unit: Some(NoteType::Quarter),
            beat_unit_dots: 1,
            per_minute: Some("60".to_string()),
            words: Some("Lento".to_string()),
            input_line: 1,
        };
        assert_eq!(
            tempo_to_lilypond(&tempo).as_deref(),
            Some("\\tempo \"Lento\" 4. = 60")
        );
    }

    #[test]
    fn test_unknown_dynamic_goes_to_markup() {
        assert_eq!(dynamic_to_lilypond("mf"), "\\mf");
        assert_eq!(dynamic_to_lilypond("sfzp"), "_\\markup { \\dynamic sfzp }");
    }
}
