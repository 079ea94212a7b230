//! Score containers: Score → Part → Staff → Voice → VoiceMeasure
//!
//! Containers own their children; notes, chords, tuplets and grace notes
//! groups are owned by the score's `MsrArena` and referenced by handle.

use super::annotations::{LineBreak, PageBreak, RehearsalMark, Stanza, Tempo};
use super::arena::{ChordId, DoubleTremoloId, MsrArena, NoteId, TupletId};
use super::elements::{Chord, GraceMember, TremoloMember, TupletMember};
use super::errors::MsrError;
use super::nesting::{ElementLocation, LastNote, TupletNumberingDrift, VoiceNestingState};
use super::types::WholeNotes;
use serde::Serialize;

/// Top-level content of a voice measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoiceElement {
    Note(NoteId),
    Chord(ChordId),
    Tuplet(TupletId),
    DoubleTremolo(DoubleTremoloId),
    /// Invisible time filling a lag behind the measure cursor
    Padding(WholeNotes),
    /// The voice's notes continue on another staff
    StaffChange { from: i32, to: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceMeasure {
    pub number: String,
    pub elements: Vec<VoiceElement>,
    /// Time filled so far, from the measure start
    pub position: WholeNotes,
}

impl VoiceMeasure {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            elements: Vec::new(),
            position: WholeNotes::zero(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Voice {
    pub number: i32,
    pub staff_number: i32,
    pub measures: Vec<VoiceMeasure>,
    pub stanzas: Vec<Stanza>,
    #[serde(skip)]
    nesting: VoiceNestingState,
}

impl Voice {
    pub fn new(number: i32, staff_number: i32) -> Self {
        Self {
            number,
            staff_number,
            measures: Vec::new(),
            stanzas: Vec::new(),
            nesting: VoiceNestingState::new(number),
        }
    }

    pub fn nesting(&self) -> &VoiceNestingState {
        &self.nesting
    }

    pub fn nesting_mut(&mut self) -> &mut VoiceNestingState {
        &mut self.nesting
    }

    /// Create voice measures up to `index`; skipped ones are filled with
    /// padding of their part measure's length.
    pub fn ensure_measure(&mut self, index: usize, part_measures: &[PartMeasure]) {
        while self.measures.len() <= index {
            let i = self.measures.len();
            let number = part_measures
                .get(i)
                .map(|m| m.number.clone())
                .unwrap_or_default();
            let mut measure = VoiceMeasure::new(number);
            if i < index {
                if let Some(length) = part_measures.get(i).map(|m| m.length) {
                    if !length.is_zero() {
                        measure.elements.push(VoiceElement::Padding(length));
                        measure.position = length;
                    }
                }
            }
            self.measures.push(measure);
        }
    }

    fn current_measure_mut(&mut self) -> Result<(usize, &mut VoiceMeasure), MsrError> {
        let index = self.measures.len().checked_sub(1);
        match index {
            Some(i) => Ok((i, &mut self.measures[i])),
            None => Err(MsrError::StaleLocation {
                voice: self.number,
                location: "current measure".to_string(),
            }),
        }
    }

    /// Position reached in the current measure
    pub fn position(&self) -> WholeNotes {
        self.measures
            .last()
            .map_or_else(WholeNotes::zero, |m| m.position)
    }

    /// Insert padding so the current measure reaches `target`
    pub fn pad_to(&mut self, target: WholeNotes) {
        if let Some(measure) = self.measures.last_mut() {
            if measure.position < target {
                let gap = target - measure.position;
                measure.elements.push(VoiceElement::Padding(gap));
                measure.position = target;
            }
        }
    }

    pub fn advance(&mut self, duration: WholeNotes) {
        if let Some(measure) = self.measures.last_mut() {
            measure.position += duration;
        }
    }

    /// Append a note to the innermost open tuplet, to the open double
    /// tremolo, or at top level after padding up to `cursor`.
    pub fn append_note(
        &mut self,
        arena: &mut MsrArena,
        note: NoteId,
        cursor: WholeNotes,
        input_line: u32,
    ) -> Result<ElementLocation, MsrError> {
        if self.nesting.depth() > 0 {
            return self
                .nesting
                .append_note_to_innermost_tuplet(arena, note, input_line);
        }
        if let Some(tremolo) = self.nesting.open_double_tremolo() {
            let members = &mut arena.double_tremolo_mut(tremolo)?.members;
            members.push(TremoloMember::Note(note));
            return Ok(ElementLocation::DoubleTremolo {
                tremolo,
                index: members.len() - 1,
            });
        }
        self.pad_to(cursor);
        let (measure_index, measure) = self.current_measure_mut()?;
        measure.elements.push(VoiceElement::Note(note));
        Ok(ElementLocation::Voice {
            measure: measure_index,
            index: measure.elements.len() - 1,
        })
    }

    /// Open a tuplet where it belongs and make it the innermost one
    pub fn open_tuplet(
        &mut self,
        arena: &mut MsrArena,
        tuplet: TupletId,
        number: i32,
        cursor: WholeNotes,
    ) -> Result<Option<TupletNumberingDrift>, MsrError> {
        if self.nesting.depth() == 0 {
            self.pad_to(cursor);
            self.nesting.set_tuplet_owner_staff(self.staff_number);
        }
        let voice_number = self.number;
        let measure = self.measures.last_mut().ok_or(MsrError::StaleLocation {
            voice: voice_number,
            location: "current measure".to_string(),
        })?;
        self.nesting
            .append_tuplet_where_it_belongs(arena, &mut measure.elements, tuplet, number)
    }

    /// Place a double tremolo at top level; the next notes appended go
    /// into it until it is taken back from the nesting state.
    pub fn open_double_tremolo(
        &mut self,
        tremolo: DoubleTremoloId,
        cursor: WholeNotes,
    ) -> Result<(), MsrError> {
        self.pad_to(cursor);
        let (_, measure) = self.current_measure_mut()?;
        measure.elements.push(VoiceElement::DoubleTremolo(tremolo));
        self.nesting.set_open_double_tremolo(tremolo);
        Ok(())
    }

    pub fn close_innermost_tuplet(&mut self, input_line: u32) -> Result<TupletId, MsrError> {
        self.nesting.pop_innermost_tuplet(input_line)
    }

    pub fn append_staff_change(&mut self, from: i32, to: i32) -> Result<(), MsrError> {
        let (_, measure) = self.current_measure_mut()?;
        measure.elements.push(VoiceElement::StaffChange { from, to });
        Ok(())
    }

    /// Turn the anchor note into a one-note chord, replacing it in its
    /// container. An anchor already in a chord yields that chord.
    pub fn promote_to_chord(
        &mut self,
        arena: &mut MsrArena,
        anchor: LastNote,
        input_line: u32,
    ) -> Result<ChordId, MsrError> {
        if let ElementLocation::Chord { chord } = anchor.location {
            return Ok(chord);
        }

        let (sounding, display) = {
            let note = arena.note(anchor.note)?;
            (note.sounding_whole_notes, note.display_whole_notes)
        };
        let chord = arena.add_chord(Chord {
            notes: vec![anchor.note],
            sounding_whole_notes: sounding,
            display_whole_notes: display,
            input_line,
        });

        let voice_number = self.number;
        let stale = || MsrError::StaleLocation {
            voice: voice_number,
            location: anchor.location.to_string(),
        };
        match anchor.location {
            ElementLocation::Voice { measure, index } => {
                let slot = self
                    .measures
                    .get_mut(measure)
                    .and_then(|m| m.elements.get_mut(index))
                    .ok_or_else(stale)?;
                if *slot != VoiceElement::Note(anchor.note) {
                    return Err(stale());
                }
                *slot = VoiceElement::Chord(chord);
            }
            ElementLocation::Tuplet { tuplet, index } => {
                let slot = arena
                    .tuplet_mut(tuplet)?
                    .members
                    .get_mut(index)
                    .ok_or_else(stale)?;
                if *slot != TupletMember::Note(anchor.note) {
                    return Err(stale());
                }
                *slot = TupletMember::Chord(chord);
            }
            ElementLocation::GraceNotesGroup { group, index } => {
                let slot = arena
                    .grace_notes_group_mut(group)?
                    .members
                    .get_mut(index)
                    .ok_or_else(stale)?;
                if *slot != GraceMember::Note(anchor.note) {
                    return Err(stale());
                }
                *slot = GraceMember::Chord(chord);
            }
            ElementLocation::DoubleTremolo { tremolo, index } => {
                let slot = arena
                    .double_tremolo_mut(tremolo)?
                    .members
                    .get_mut(index)
                    .ok_or_else(stale)?;
                if *slot != TremoloMember::Note(anchor.note) {
                    return Err(stale());
                }
                *slot = TremoloMember::Chord(chord);
            }
            ElementLocation::Chord { .. } => return Err(stale()),
        }
        Ok(chord)
    }

    pub fn stanza_mut(&mut self, number: &str) -> &mut Stanza {
        let index = match self.stanzas.iter().position(|s| s.number == number) {
            Some(i) => i,
            None => {
                self.stanzas.push(Stanza {
                    number: number.to_string(),
                    syllables: Vec::new(),
                });
                self.stanzas.len() - 1
            }
        };
        &mut self.stanzas[index]
    }

    /// Check the voice ends with no tuplet open
    pub fn finalize(&self, input_line: u32) -> Result<(), MsrError> {
        self.nesting.finalize(input_line)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Staff {
    pub number: i32,
    pub voices: Vec<Voice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clef {
    pub staff_number: i32,
    /// "G", "F", "C", "percussion", "TAB", ...
    pub sign: String,
    pub line: Option<i32>,
    pub octave_change: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Key {
    pub fifths: i32,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Time {
    pub beats: String,
    pub beat_type: String,
    pub senza_misura: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Barline {
    /// "left", "right" or "middle"
    pub location: String,
    pub bar_style: Option<String>,
    /// "forward" or "backward"
    pub repeat_direction: Option<String>,
    pub ending_number: Option<String>,
    /// "start", "stop" or "discontinue"
    pub ending_type: Option<String>,
    pub input_line: u32,
}

/// Part-wide data of one measure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartMeasure {
    pub number: String,
    pub input_line: u32,
    /// Furthest time cursor position reached in the measure
    pub length: WholeNotes,
    pub clefs: Vec<Clef>,
    pub key: Option<Key>,
    pub time: Option<Time>,
    pub barlines: Vec<Barline>,
    pub rehearsal_marks: Vec<RehearsalMark>,
    pub tempos: Vec<Tempo>,
    pub line_breaks: Vec<LineBreak>,
    pub page_breaks: Vec<PageBreak>,
}

impl PartMeasure {
    pub fn new(number: impl Into<String>, input_line: u32) -> Self {
        Self {
            number: number.into(),
            input_line,
            length: WholeNotes::zero(),
            clefs: Vec::new(),
            key: None,
            time: None,
            barlines: Vec::new(),
            rehearsal_marks: Vec::new(),
            tempos: Vec::new(),
            line_breaks: Vec::new(),
            page_breaks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleMeasureRest {
    pub first_measure: String,
    pub last_measure: String,
    pub measure_count: i32,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureRepeat {
    pub first_measure: String,
    pub last_measure: String,
    /// Measures covered by the span
    pub measure_count: i32,
    /// Length of the repeated pattern, in measures
    pub pattern_measures: i32,
    pub slashes: Option<i32>,
    pub input_line: u32,
}

/// Beats repeated with slashes, possibly over several measures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatRepeat {
    pub first_measure: String,
    pub last_measure: String,
    /// Measures the span reaches into
    pub measure_count: i32,
    pub slashes: Option<i32>,
    pub input_line: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub id: String,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    /// From `<staves>`, 1 when absent
    pub declared_staves: i32,
    pub staves: Vec<Staff>,
    pub measures: Vec<PartMeasure>,
    pub multiple_measure_rests: Vec<MultipleMeasureRest>,
    pub measure_repeats: Vec<MeasureRepeat>,
    pub beat_repeats: Vec<BeatRepeat>,
}

impl Part {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            abbreviation: None,
            declared_staves: 1,
            staves: Vec::new(),
            measures: Vec::new(),
            multiple_measure_rests: Vec::new(),
            measure_repeats: Vec::new(),
            beat_repeats: Vec::new(),
        }
    }

    pub fn voice(&self, staff_number: i32, voice_number: i32) -> Option<&Voice> {
        self.staves
            .iter()
            .find(|s| s.number == staff_number)?
            .voices
            .iter()
            .find(|v| v.number == voice_number)
    }

    /// Find or create the voice, with voice measures up to `measure_index`
    pub fn voice_in_measure(
        &mut self,
        staff_number: i32,
        voice_number: i32,
        measure_index: usize,
    ) -> &mut Voice {
        let Part {
            staves, measures, ..
        } = self;

        let staff_index = match staves.binary_search_by_key(&staff_number, |s| s.number) {
            Ok(i) => i,
            Err(i) => {
                staves.insert(
                    i,
                    Staff {
                        number: staff_number,
                        voices: Vec::new(),
                    },
                );
                i
            }
        };
        let voices = &mut staves[staff_index].voices;
        let voice_index = match voices.binary_search_by_key(&voice_number, |v| v.number) {
            Ok(i) => i,
            Err(i) => {
                voices.insert(i, Voice::new(voice_number, staff_number));
                i
            }
        };

        let voice = &mut voices[voice_index];
        voice.ensure_measure(measure_index, measures);
        voice
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.staves.iter().flat_map(|s| s.voices.iter())
    }

    pub fn voices_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.staves.iter_mut().flat_map(|s| s.voices.iter_mut())
    }

    pub fn current_measure(&self) -> Option<&PartMeasure> {
        self.measures.last()
    }

    pub fn current_measure_mut(&mut self) -> Option<&mut PartMeasure> {
        self.measures.last_mut()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Score {
    pub title: Option<String>,
    pub composer: Option<String>,
    pub parts: Vec<Part>,
    pub arena: MsrArena,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }
}
