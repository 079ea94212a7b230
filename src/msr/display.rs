//! Indented text summary of a score, for tracing and tests
//!
//! ```text
//! Part P1 "Piano"
//!   Staff 1
//!     Voice 1
//!       Measure 1
//!         Tuplet #1 3:2
//!           Chord <C4 D4> 1/6
//!           Note E4 1/6
//!         DoubleTremolo 3
//!           Note C4 1/2
//!           Note E4 1/2
//! ```

use super::arena::{ChordId, DoubleTremoloId, MsrArena, NoteId, TupletId};
use super::elements::{NoteKind, TremoloMember, TupletMember};
use super::score::{Score, VoiceElement};
use std::fmt::{self, Write};

pub struct ScoreSummary<'a>(pub &'a Score);

impl Score {
    pub fn summary(&self) -> ScoreSummary<'_> {
        ScoreSummary(self)
    }
}

impl fmt::Display for ScoreSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let score = self.0;
        if let Some(title) = &score.title {
            writeln!(f, "Score \"{}\"", title)?;
        }
        for part in &score.parts {
            write!(f, "Part {}", part.id)?;
            if let Some(name) = &part.name {
                write!(f, " \"{}\"", name)?;
            }
            writeln!(f)?;
            for staff in &part.staves {
                writeln!(f, "  Staff {}", staff.number)?;
                for voice in &staff.voices {
                    writeln!(f, "    Voice {}", voice.number)?;
                    for measure in &voice.measures {
                        writeln!(f, "      Measure {}", measure.number)?;
                        for element in &measure.elements {
                            write_element(f, &score.arena, element, 8)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn write_element(
    f: &mut impl Write,
    arena: &MsrArena,
    element: &VoiceElement,
    indent: usize,
) -> fmt::Result {
    match element {
        VoiceElement::Note(n) => write_note(f, arena, *n, indent),
        VoiceElement::Chord(c) => write_chord(f, arena, *c, indent),
        VoiceElement::Tuplet(t) => write_tuplet(f, arena, *t, indent),
        VoiceElement::DoubleTremolo(t) => write_double_tremolo(f, arena, *t, indent),
        VoiceElement::Padding(wn) => writeln!(f, "{:indent$}Padding {}", "", wn, indent = indent),
        VoiceElement::StaffChange { from, to } => writeln!(
            f,
            "{:indent$}StaffChange {} -> {}",
            "",
            from,
            to,
            indent = indent
        ),
    }
}

fn note_label(arena: &MsrArena, id: NoteId) -> String {
    match arena.note(id) {
        Ok(note) => match &note.kind {
            NoteKind::Pitched(p) => p.to_string(),
            NoteKind::Rest { .. } => "rest".to_string(),
            NoteKind::Unpitched { .. } => "unpitched".to_string(),
            NoteKind::Skip => "skip".to_string(),
        },
        Err(_) => "?".to_string(),
    }
}

fn write_note(f: &mut impl Write, arena: &MsrArena, id: NoteId, indent: usize) -> fmt::Result {
    let duration = arena
        .note(id)
        .map(|n| n.sounding_whole_notes.to_string())
        .unwrap_or_default();
    writeln!(
        f,
        "{:indent$}Note {} {}",
        "",
        note_label(arena, id),
        duration,
        indent = indent
    )
}

fn write_chord(f: &mut impl Write, arena: &MsrArena, id: ChordId, indent: usize) -> fmt::Result {
    let Ok(chord) = arena.chord(id) else {
        return writeln!(f, "{:indent$}Chord ?", "", indent = indent);
    };
    let labels: Vec<String> = chord.notes.iter().map(|n| note_label(arena, *n)).collect();
    writeln!(
        f,
        "{:indent$}Chord <{}> {}",
        "",
        labels.join(" "),
        chord.sounding_whole_notes,
        indent = indent
    )
}

fn write_tuplet(f: &mut impl Write, arena: &MsrArena, id: TupletId, indent: usize) -> fmt::Result {
    let Ok(tuplet) = arena.tuplet(id) else {
        return writeln!(f, "{:indent$}Tuplet ?", "", indent = indent);
    };
    writeln!(
        f,
        "{:indent$}Tuplet #{} {}",
        "",
        tuplet.number,
        tuplet.factor,
        indent = indent
    )?;
    for member in &tuplet.members {
        match member {
            TupletMember::Note(n) => write_note(f, arena, *n, indent + 2)?,
            TupletMember::Chord(c) => write_chord(f, arena, *c, indent + 2)?,
            TupletMember::Tuplet(t) => write_tuplet(f, arena, *t, indent + 2)?,
        }
    }
    Ok(())
}

fn write_double_tremolo(
    f: &mut impl Write,
    arena: &MsrArena,
    id: DoubleTremoloId,
    indent: usize,
) -> fmt::Result {
    let Ok(tremolo) = arena.double_tremolo(id) else {
        return writeln!(f, "{:indent$}DoubleTremolo ?", "", indent = indent);
    };
    writeln!(f, "{:indent$}DoubleTremolo {}", "", tremolo.marks, indent = indent)?;
    for member in &tremolo.members {
        match member {
            TremoloMember::Note(n) => write_note(f, arena, *n, indent + 2)?,
            TremoloMember::Chord(c) => write_chord(f, arena, *c, indent + 2)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msr::elements::{Note, Tuplet};
    use crate::msr::score::{Part, PartMeasure};
    use crate::msr::types::{Alteration, Pitch, Step, TupletFactor, WholeNotes};

    #[test]
    fn test_summary_nests_tuplet_members() {
        let mut score = Score::new();
        let mut part = Part::new("P1");
        part.name = Some("Flute".to_string());
        part.measures.push(PartMeasure::new("1", 1));

        let t = score
            .arena
            .add_tuplet(Tuplet::new(1, TupletFactor::new(3, 2).unwrap(), 2));
        let n = score.arena.add_note(Note::new(
            NoteKind::Pitched(Pitch::new(Step::E, Alteration::Natural, 4)),
            WholeNotes::new(1, 6),
            3,
        ));
        score.arena.tuplet_mut(t).unwrap().members.push(TupletMember::Note(n));
        part.voice_in_measure(1, 1, 0).measures[0]
            .elements
            .push(VoiceElement::Tuplet(t));
        score.parts.push(part);

        let text = score.summary().to_string();

        assert_eq!(
            text,
            "Part P1 \"Flute\"\n  Staff 1\n    Voice 1\n      Measure 1\n        Tuplet #1 3:2\n          Note E4 1/6\n"
        );
    }
}
