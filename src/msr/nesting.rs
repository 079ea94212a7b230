//! Per-voice nesting state
//!
//! Each `Voice` owns one `VoiceNestingState`: the stack of tuplets currently
//! open in that voice (innermost last), the last note appended to it (for
//! chord continuation), the grace notes group waiting for its principal
//! note and the double tremolo waiting for its second member.
//!
//! ```text
//!            start (push)              start (push)
//! no tuplet ──────────────▶ open(1) ───────────────▶ open(2) ...
//!    open   ◀────────────── open(1) ◀─────────────── open(2)
//!              stop (pop)                stop (pop)
//! ```
//!
//! A `member` transition appends to the stack top and leaves the depth
//! unchanged. The voice must be back in "no tuplet open" when finalized.

use super::arena::{ChordId, DoubleTremoloId, GraceNotesGroupId, MsrArena, NoteId, TupletId};
use super::elements::TupletMember;
use super::errors::MsrError;
use super::score::VoiceElement;
use super::types::TupletFactor;
use serde::Serialize;
use std::fmt;

/// Where an appended note currently sits, so it can be replaced by a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElementLocation {
    Voice { measure: usize, index: usize },
    Tuplet { tuplet: TupletId, index: usize },
    GraceNotesGroup { group: GraceNotesGroupId, index: usize },
    DoubleTremolo { tremolo: DoubleTremoloId, index: usize },
    /// Already promoted: the note anchors or belongs to this chord
    Chord { chord: ChordId },
}

impl fmt::Display for ElementLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementLocation::Voice { measure, index } => {
                write!(f, "voice measure #{} element #{}", measure, index)
            }
            ElementLocation::Tuplet { tuplet, index } => {
                write!(f, "tuplet #{} member #{}", tuplet.0, index)
            }
            ElementLocation::GraceNotesGroup { group, index } => {
                write!(f, "grace notes group #{} member #{}", group.0, index)
            }
            ElementLocation::DoubleTremolo { tremolo, index } => {
                write!(f, "double tremolo #{} member #{}", tremolo.0, index)
            }
            ElementLocation::Chord { chord } => write!(f, "chord #{}", chord.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastNote {
    pub note: NoteId,
    pub location: ElementLocation,
}

/// Tuplet pushed with a number out of nesting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupletNumberingDrift {
    pub expected: i32,
    pub found: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenTuplet {
    id: TupletId,
    number: i32,
}

/// Open structure handed over when a voice moves to another staff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestingCarryOver {
    tuplet_stack: Vec<OpenTuplet>,
    tuplet_owner_staff: Option<i32>,
    pending_grace_notes: Option<GraceNotesGroupId>,
    open_double_tremolo: Option<DoubleTremoloId>,
}

impl NestingCarryOver {
    pub fn is_empty(&self) -> bool {
        self.tuplet_stack.is_empty()
            && self.pending_grace_notes.is_none()
            && self.open_double_tremolo.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VoiceNestingState {
    voice_number: i32,
    tuplet_stack: Vec<OpenTuplet>,
    /// Staff of the voice whose measure holds the outermost open tuplet
    tuplet_owner_staff: Option<i32>,
    last_note: Option<LastNote>,
    last_principal_note: Option<NoteId>,
    pending_grace_notes: Option<GraceNotesGroupId>,
    /// Started double tremolo, its second member not appended yet
    open_double_tremolo: Option<DoubleTremoloId>,
    /// Tuplet stops already honoured on the current chord's anchor
    anchor_tuplet_stops: usize,
}

impl VoiceNestingState {
    pub fn new(voice_number: i32) -> Self {
        Self {
            voice_number,
            ..Default::default()
        }
    }

    pub fn depth(&self) -> usize {
        self.tuplet_stack.len()
    }

    /// Make `tuplet` the innermost open tuplet.
    ///
    /// The push always happens; a number other than the expected one is
    /// returned for the caller to report.
    pub fn push_tuplet(&mut self, tuplet: TupletId, number: i32) -> Option<TupletNumberingDrift> {
        let expected = self.expected_tuplet_number();
        self.tuplet_stack.push(OpenTuplet { id: tuplet, number });
        (number != expected).then_some(TupletNumberingDrift {
            expected,
            found: number,
        })
    }

    /// Number a new innermost tuplet should carry
    pub fn expected_tuplet_number(&self) -> i32 {
        self.tuplet_stack.last().map_or(1, |t| t.number + 1)
    }

    pub fn pop_innermost_tuplet(&mut self, input_line: u32) -> Result<TupletId, MsrError> {
        let popped = self
            .tuplet_stack
            .pop()
            .map(|t| t.id)
            .ok_or(MsrError::TupletStackUnderflow {
                voice: self.voice_number,
                input_line,
            })?;
        if self.tuplet_stack.is_empty() {
            self.tuplet_owner_staff = None;
        }
        Ok(popped)
    }

    pub fn tuplet_owner_staff(&self) -> Option<i32> {
        self.tuplet_owner_staff
    }

    pub fn set_tuplet_owner_staff(&mut self, staff_number: i32) {
        self.tuplet_owner_staff = Some(staff_number);
    }

    /// Hand open tuplets and pending grace notes over to another voice
    pub fn take_carry_over(&mut self) -> NestingCarryOver {
        NestingCarryOver {
            tuplet_stack: std::mem::take(&mut self.tuplet_stack),
            tuplet_owner_staff: self.tuplet_owner_staff.take(),
            pending_grace_notes: self.pending_grace_notes.take(),
            open_double_tremolo: self.open_double_tremolo.take(),
        }
    }

    pub fn adopt_carry_over(&mut self, carry_over: NestingCarryOver) {
        if self.tuplet_stack.is_empty() {
            self.tuplet_owner_staff = carry_over.tuplet_owner_staff;
        }
        self.tuplet_stack.extend(carry_over.tuplet_stack);
        if carry_over.pending_grace_notes.is_some() {
            self.pending_grace_notes = carry_over.pending_grace_notes;
        }
        if carry_over.open_double_tremolo.is_some() {
            self.open_double_tremolo = carry_over.open_double_tremolo;
        }
    }

    pub fn fetch_innermost_tuplet(&self) -> Option<TupletId> {
        self.tuplet_stack.last().map(|t| t.id)
    }

    pub fn innermost_tuplet_number(&self) -> Option<i32> {
        self.tuplet_stack.last().map(|t| t.number)
    }

    pub fn append_note_to_innermost_tuplet(
        &self,
        arena: &mut MsrArena,
        note: NoteId,
        input_line: u32,
    ) -> Result<ElementLocation, MsrError> {
        let tuplet = self
            .fetch_innermost_tuplet()
            .ok_or(MsrError::TupletStackUnderflow {
                voice: self.voice_number,
                input_line,
            })?;
        let members = &mut arena.tuplet_mut(tuplet)?.members;
        members.push(TupletMember::Note(note));
        Ok(ElementLocation::Tuplet {
            tuplet,
            index: members.len() - 1,
        })
    }

    /// Append `tuplet` to `measure_elements` when no tuplet is open, nested
    /// into the innermost open one otherwise, then push it.
    pub fn append_tuplet_where_it_belongs(
        &mut self,
        arena: &mut MsrArena,
        measure_elements: &mut Vec<VoiceElement>,
        tuplet: TupletId,
        number: i32,
    ) -> Result<Option<TupletNumberingDrift>, MsrError> {
        match self.fetch_innermost_tuplet() {
            None => measure_elements.push(VoiceElement::Tuplet(tuplet)),
            Some(enclosing) => arena
                .tuplet_mut(enclosing)?
                .members
                .push(TupletMember::Tuplet(tuplet)),
        }
        Ok(self.push_tuplet(tuplet, number))
    }

    /// Product of the factors of all open tuplets
    pub fn enclosing_factor(&self, arena: &MsrArena) -> Result<TupletFactor, MsrError> {
        let mut factor = TupletFactor::identity();
        for open in &self.tuplet_stack {
            factor = factor.combined_with(arena.tuplet(open.id)?.factor);
        }
        Ok(factor)
    }

    pub fn last_note(&self) -> Option<LastNote> {
        self.last_note
    }

    pub fn set_last_note(&mut self, note: NoteId, location: ElementLocation) {
        self.last_note = Some(LastNote { note, location });
    }

    /// Called at measure boundaries: a measure's first note anchors no chord
    pub fn forget_last_note(&mut self) {
        self.last_note = None;
        self.last_principal_note = None;
        self.anchor_tuplet_stops = 0;
    }

    pub fn last_principal_note(&self) -> Option<NoteId> {
        self.last_principal_note
    }

    pub fn set_last_principal_note(&mut self, note: NoteId, tuplet_stops: usize) {
        self.last_principal_note = Some(note);
        self.anchor_tuplet_stops = tuplet_stops;
    }

    pub fn anchor_tuplet_stops(&self) -> usize {
        self.anchor_tuplet_stops
    }

    pub fn add_anchor_tuplet_stops(&mut self, count: usize) {
        self.anchor_tuplet_stops += count;
    }

    pub fn pending_grace_notes(&self) -> Option<GraceNotesGroupId> {
        self.pending_grace_notes
    }

    pub fn set_pending_grace_notes(&mut self, group: GraceNotesGroupId) {
        self.pending_grace_notes = Some(group);
    }

    pub fn take_pending_grace_notes(&mut self) -> Option<GraceNotesGroupId> {
        self.pending_grace_notes.take()
    }

    pub fn open_double_tremolo(&self) -> Option<DoubleTremoloId> {
        self.open_double_tremolo
    }

    pub fn set_open_double_tremolo(&mut self, tremolo: DoubleTremoloId) {
        self.open_double_tremolo = Some(tremolo);
    }

    pub fn take_open_double_tremolo(&mut self) -> Option<DoubleTremoloId> {
        self.open_double_tremolo.take()
    }

    /// The voice must have no tuplet left open
    pub fn finalize(&self, input_line: u32) -> Result<(), MsrError> {
        if self.tuplet_stack.is_empty() {
            Ok(())
        } else {
            Err(MsrError::UnclosedTuplets {
                voice: self.voice_number,
                depth: self.tuplet_stack.len(),
                input_line,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msr::elements::{Note, NoteKind, Tuplet};
    use crate::msr::types::{Alteration, Pitch, Step, WholeNotes};

    fn triplet(arena: &mut MsrArena, number: i32) -> TupletId {
        arena.add_tuplet(Tuplet::new(number, TupletFactor::new(3, 2).unwrap(), 1))
    }

    fn note(arena: &mut MsrArena) -> NoteId {
        arena.add_note(Note::new(
            NoteKind::Pitched(Pitch::new(Step::G, Alteration::Natural, 4)),
            WholeNotes::new(1, 12),
            1,
        ))
    }

    #[test]
    fn test_push_pop_balance() {
        let mut arena = MsrArena::new();
        let mut state = VoiceNestingState::new(1);
        let t = triplet(&mut arena, 1);

        assert_eq!(state.push_tuplet(t, 1), None);
        assert_eq!(state.depth(), 1);
        assert_eq!(state.fetch_innermost_tuplet(), Some(t));
        assert_eq!(state.pop_innermost_tuplet(10), Ok(t));
        assert_eq!(state.depth(), 0);
        assert!(state.finalize(11).is_ok());
    }

    #[test]
    fn test_numbering_drift_still_pushes() {
        let mut arena = MsrArena::new();
        let mut state = VoiceNestingState::new(2);
        let t = triplet(&mut arena, 3);

        let drift = state.push_tuplet(t, 3);

        assert_eq!(drift, Some(TupletNumberingDrift { expected: 1, found: 3 }));
        assert_eq!(state.depth(), 1);
        assert_eq!(state.expected_tuplet_number(), 4);
    }

    #[test]
    fn test_underflow_is_fatal() {
        let mut arena = MsrArena::new();
        let mut state = VoiceNestingState::new(1);
        let n = note(&mut arena);

        assert_eq!(
            state.pop_innermost_tuplet(5),
            Err(MsrError::TupletStackUnderflow { voice: 1, input_line: 5 })
        );
        assert!(state.append_note_to_innermost_tuplet(&mut arena, n, 6).is_err());
    }

    #[test]
    fn test_nested_tuplet_belongs_to_enclosing() {
        let mut arena = MsrArena::new();
        let mut state = VoiceNestingState::new(1);
        let mut elements = Vec::new();
        let outer = triplet(&mut arena, 1);
        let inner = triplet(&mut arena, 2);

        state
            .append_tuplet_where_it_belongs(&mut arena, &mut elements, outer, 1)
            .unwrap();
        state
            .append_tuplet_where_it_belongs(&mut arena, &mut elements, inner, 2)
            .unwrap();
        let n = note(&mut arena);
        let location = state.append_note_to_innermost_tuplet(&mut arena, n, 3).unwrap();

        assert_eq!(elements, vec![VoiceElement::Tuplet(outer)]);
        assert_eq!(arena.tuplet(outer).unwrap().members, vec![TupletMember::Tuplet(inner)]);
        assert_eq!(location, ElementLocation::Tuplet { tuplet: inner, index: 0 });
        assert_eq!(
            state.enclosing_factor(&arena).unwrap(),
            TupletFactor::new(9, 4).unwrap()
        );

        assert_eq!(state.pop_innermost_tuplet(4), Ok(inner));
        assert_eq!(state.pop_innermost_tuplet(4), Ok(outer));
        assert!(state.finalize(5).is_ok());
    }

    #[test]
    fn test_finalize_with_open_tuplet() {
        let mut arena = MsrArena::new();
        let mut state = VoiceNestingState::new(4);
        let t = triplet(&mut arena, 1);
        state.push_tuplet(t, 1);

        assert_eq!(
            state.finalize(20),
            Err(MsrError::UnclosedTuplets { voice: 4, depth: 1, input_line: 20 })
        );
    }

    #[test]
    fn test_carry_over_moves_open_tuplets() {
        let mut arena = MsrArena::new();
        let mut departing = VoiceNestingState::new(1);
        let mut receiving = VoiceNestingState::new(1);
        let t = triplet(&mut arena, 1);
        departing.push_tuplet(t, 1);
        departing.set_tuplet_owner_staff(1);

        let carry_over = departing.take_carry_over();
        assert!(!carry_over.is_empty());
        receiving.adopt_carry_over(carry_over);

        assert_eq!(departing.depth(), 0);
        assert!(departing.finalize(9).is_ok());
        assert_eq!(receiving.fetch_innermost_tuplet(), Some(t));
        assert_eq!(receiving.tuplet_owner_staff(), Some(1));

        assert_eq!(receiving.pop_innermost_tuplet(10), Ok(t));
        assert_eq!(receiving.tuplet_owner_staff(), None);
    }

    #[test]
    fn test_forget_last_note() {
        let mut arena = MsrArena::new();
        let mut state = VoiceNestingState::new(1);
        let n = note(&mut arena);
        state.set_last_note(n, ElementLocation::Voice { measure: 0, index: 0 });
        state.set_last_principal_note(n, 1);

        state.forget_last_note();

        assert_eq!(state.last_note(), None);
        assert_eq!(state.last_principal_note(), None);
        assert_eq!(state.anchor_tuplet_stops(), 0);
    }
}
