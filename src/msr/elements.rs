//! Notes, chords, tuplets, grace notes groups and double tremolos
//!
//! These live in the `MsrArena`; containers refer to them by handle.

use super::annotations::{Articulation, Beam, Fermata, NoteAnnotations, Ornament, Technical};
use super::arena::{ChordId, GraceNotesGroupId, NoteId, TupletId};
use super::types::{NoteType, Pitch, Placement, Step, TupletFactor, WholeNotes};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoteKind {
    Pitched(Pitch),
    Rest {
        /// Whole-measure rest (`<rest measure="yes"/>`)
        measure_rest: bool,
        display_step: Option<Step>,
        display_octave: Option<i32>,
    },
    Unpitched {
        display_step: Option<Step>,
        display_octave: Option<i32>,
    },
    /// Invisible note occupying time
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub kind: NoteKind,
    pub sounding_whole_notes: WholeNotes,
    pub display_whole_notes: WholeNotes,
    pub note_type: Option<NoteType>,
    pub dots: u32,
    pub voice_number: i32,
    pub staff_number: i32,
    pub measure_number: String,

    pub is_grace: bool,
    pub is_cue: bool,
    /// Factor of the time modification this note sounds under
    pub tuplet_factor: Option<TupletFactor>,

    pub accidental: Option<String>,
    pub stem: Option<String>,
    pub beams: Vec<Beam>,
    pub articulations: Vec<Articulation>,
    pub technicals: Vec<Technical>,
    pub ornaments: Vec<Ornament>,
    pub fermatas: Vec<Fermata>,
    pub arpeggiate: bool,

    pub annotations: NoteAnnotations,

    pub grace_notes_group_before: Option<GraceNotesGroupId>,
    pub grace_notes_group_after: Option<GraceNotesGroupId>,

    pub input_line: u32,
}

impl Note {
    pub fn new(kind: NoteKind, sounding_whole_notes: WholeNotes, input_line: u32) -> Self {
        Self {
            kind,
            sounding_whole_notes,
            display_whole_notes: sounding_whole_notes,
            note_type: None,
            dots: 0,
            voice_number: 1,
            staff_number: 1,
            measure_number: String::new(),
            is_grace: false,
            is_cue: false,
            tuplet_factor: None,
            accidental: None,
            stem: None,
            beams: Vec::new(),
            articulations: Vec::new(),
            technicals: Vec::new(),
            ornaments: Vec::new(),
            fermatas: Vec::new(),
            arpeggiate: false,
            annotations: NoteAnnotations::default(),
            grace_notes_group_before: None,
            grace_notes_group_after: None,
            input_line,
        }
    }

    pub fn pitch(&self) -> Option<Pitch> {
        match self.kind {
            NoteKind::Pitched(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.kind, NoteKind::Rest { .. })
    }
}

/// Notes sharing one onset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub notes: Vec<NoteId>,
    /// Taken from the anchor note
    pub sounding_whole_notes: WholeNotes,
    pub display_whole_notes: WholeNotes,
    pub input_line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TupletMember {
    Note(NoteId),
    Chord(ChordId),
    Tuplet(TupletId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuplet {
    pub number: i32,
    pub factor: TupletFactor,
    pub members: Vec<TupletMember>,
    pub bracket: Option<bool>,
    /// "actual", "both" or "none"
    pub show_number: Option<String>,
    pub placement: Option<Placement>,
    pub measure_number: String,
    pub input_line: u32,
}

impl Tuplet {
    pub fn new(number: i32, factor: TupletFactor, input_line: u32) -> Self {
        Self {
            number,
            factor,
            members: Vec::new(),
            bracket: None,
            show_number: None,
            placement: None,
            measure_number: String::new(),
            input_line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TremoloMember {
    Note(NoteId),
    Chord(ChordId),
}

/// Two notes or chords alternating rapidly for their combined duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleTremolo {
    /// Beams between the two members
    pub marks: u32,
    pub members: Vec<TremoloMember>,
    pub measure_number: String,
    pub input_line: u32,
}

impl DoubleTremolo {
    pub fn new(marks: u32, input_line: u32) -> Self {
        Self {
            marks,
            members: Vec::new(),
            measure_number: String::new(),
            input_line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraceNotesGroupKind {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraceMember {
    Note(NoteId),
    Chord(ChordId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraceNotesGroup {
    pub kind: GraceNotesGroupKind,
    pub slashed: bool,
    pub members: Vec<GraceMember>,
    pub input_line: u32,
}

impl GraceNotesGroup {
    pub fn new(kind: GraceNotesGroupKind, slashed: bool, input_line: u32) -> Self {
        Self {
            kind,
            slashed,
            members: Vec::new(),
            input_line,
        }
    }
}
