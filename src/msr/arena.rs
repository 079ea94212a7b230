//! Arena owning every note, chord, tuplet, grace notes group and double
//! tremolo of a score
//!
//! Containers (voice measures, tuplets, chords, groups) hold plain index
//! handles into the arena. Handles are only minted by the arena, so a
//! lookup failure means a handle crossed scores.

use super::elements::{
    Chord, DoubleTremolo, GraceMember, GraceNotesGroup, Note, TremoloMember, Tuplet, TupletMember,
};
use super::errors::MsrError;
use super::types::WholeNotes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupletId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraceNotesGroupId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoubleTremoloId(pub usize);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MsrArena {
    pub notes: Vec<Note>,
    pub chords: Vec<Chord>,
    pub tuplets: Vec<Tuplet>,
    pub grace_notes_groups: Vec<GraceNotesGroup>,
    pub double_tremolos: Vec<DoubleTremolo>,
}

impl MsrArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_note(&mut self, note: Note) -> NoteId {
        self.notes.push(note);
        NoteId(self.notes.len() - 1)
    }

    pub fn add_chord(&mut self, chord: Chord) -> ChordId {
        self.chords.push(chord);
        ChordId(self.chords.len() - 1)
    }

    pub fn add_tuplet(&mut self, tuplet: Tuplet) -> TupletId {
        self.tuplets.push(tuplet);
        TupletId(self.tuplets.len() - 1)
    }

    pub fn add_grace_notes_group(&mut self, group: GraceNotesGroup) -> GraceNotesGroupId {
        self.grace_notes_groups.push(group);
        GraceNotesGroupId(self.grace_notes_groups.len() - 1)
    }

    pub fn add_double_tremolo(&mut self, tremolo: DoubleTremolo) -> DoubleTremoloId {
        self.double_tremolos.push(tremolo);
        DoubleTremoloId(self.double_tremolos.len() - 1)
    }

    pub fn note(&self, id: NoteId) -> Result<&Note, MsrError> {
        self.notes.get(id.0).ok_or(MsrError::DanglingHandle {
            kind: "note",
            index: id.0,
        })
    }

    pub fn note_mut(&mut self, id: NoteId) -> Result<&mut Note, MsrError> {
        self.notes.get_mut(id.0).ok_or(MsrError::DanglingHandle {
            kind: "note",
            index: id.0,
        })
    }

    pub fn chord(&self, id: ChordId) -> Result<&Chord, MsrError> {
        self.chords.get(id.0).ok_or(MsrError::DanglingHandle {
            kind: "chord",
            index: id.0,
        })
    }

    pub fn chord_mut(&mut self, id: ChordId) -> Result<&mut Chord, MsrError> {
        self.chords.get_mut(id.0).ok_or(MsrError::DanglingHandle {
            kind: "chord",
            index: id.0,
        })
    }

    pub fn tuplet(&self, id: TupletId) -> Result<&Tuplet, MsrError> {
        self.tuplets.get(id.0).ok_or(MsrError::DanglingHandle {
            kind: "tuplet",
            index: id.0,
        })
    }

    pub fn tuplet_mut(&mut self, id: TupletId) -> Result<&mut Tuplet, MsrError> {
        self.tuplets.get_mut(id.0).ok_or(MsrError::DanglingHandle {
            kind: "tuplet",
            index: id.0,
        })
    }

    pub fn grace_notes_group(&self, id: GraceNotesGroupId) -> Result<&GraceNotesGroup, MsrError> {
        self.grace_notes_groups
            .get(id.0)
            .ok_or(MsrError::DanglingHandle {
                kind: "grace notes group",
                index: id.0,
            })
    }

    pub fn grace_notes_group_mut(
        &mut self,
        id: GraceNotesGroupId,
    ) -> Result<&mut GraceNotesGroup, MsrError> {
        self.grace_notes_groups
            .get_mut(id.0)
            .ok_or(MsrError::DanglingHandle {
                kind: "grace notes group",
                index: id.0,
            })
    }

    pub fn double_tremolo(&self, id: DoubleTremoloId) -> Result<&DoubleTremolo, MsrError> {
        self.double_tremolos
            .get(id.0)
            .ok_or(MsrError::DanglingHandle {
                kind: "double tremolo",
                index: id.0,
            })
    }

    pub fn double_tremolo_mut(&mut self, id: DoubleTremoloId) -> Result<&mut DoubleTremolo, MsrError> {
        self.double_tremolos
            .get_mut(id.0)
            .ok_or(MsrError::DanglingHandle {
                kind: "double tremolo",
                index: id.0,
            })
    }

    /// Sounding duration of a double tremolo: both members together
    pub fn double_tremolo_sounding_whole_notes(
        &self,
        id: DoubleTremoloId,
    ) -> Result<WholeNotes, MsrError> {
        let mut total = WholeNotes::zero();
        for member in &self.double_tremolo(id)?.members {
            total += match member {
                TremoloMember::Note(n) => self.note(*n)?.sounding_whole_notes,
                TremoloMember::Chord(c) => self.chord(*c)?.sounding_whole_notes,
            };
        }
        Ok(total)
    }

    /// Sounding duration of a tuplet: the sum of its members
    pub fn tuplet_sounding_whole_notes(&self, id: TupletId) -> Result<WholeNotes, MsrError> {
        let mut total = WholeNotes::zero();
        for member in &self.tuplet(id)?.members {
            total += match member {
                TupletMember::Note(n) => self.note(*n)?.sounding_whole_notes,
                TupletMember::Chord(c) => self.chord(*c)?.sounding_whole_notes,
                TupletMember::Tuplet(t) => self.tuplet_sounding_whole_notes(*t)?,
            };
        }
        Ok(total)
    }

    /// Notes of a grace notes group, chord members flattened
    pub fn grace_notes(&self, id: GraceNotesGroupId) -> Result<Vec<NoteId>, MsrError> {
        let mut notes = Vec::new();
        for member in &self.grace_notes_group(id)?.members {
            match member {
                GraceMember::Note(n) => notes.push(*n),
                GraceMember::Chord(c) => notes.extend(self.chord(*c)?.notes.iter().copied()),
            }
        }
        Ok(notes)
    }
}
