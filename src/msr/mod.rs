//! MSR: the well-formed music score representation
//!
//! Notes, chords, tuplets and grace notes groups live in an arena owned by
//! the `Score`; the container tree (parts, staves, voices, measures) holds
//! handles. Each voice carries its own `VoiceNestingState`.

pub mod annotations;
pub mod arena;
pub mod display;
pub mod elements;
pub mod errors;
pub mod nesting;
pub mod score;
pub mod types;

pub use arena::{ChordId, DoubleTremoloId, GraceNotesGroupId, MsrArena, NoteId, TupletId};
pub use elements::{
    Chord, DoubleTremolo, GraceMember, GraceNotesGroup, GraceNotesGroupKind, Note, NoteKind,
    TremoloMember, Tuplet, TupletMember,
};
pub use errors::MsrError;
pub use nesting::{
    ElementLocation, LastNote, NestingCarryOver, TupletNumberingDrift, VoiceNestingState,
};
pub use score::{
    Barline, BeatRepeat, Clef, Key, MeasureRepeat, MultipleMeasureRest, Part, PartMeasure, Score,
    Staff, Time, Voice, VoiceElement, VoiceMeasure,
};
pub use types::{
    Alteration, NoteType, Pitch, Placement, StartStop, Step, TupletFactor, WholeNotes,
    MAX_DIVISIONS, MAX_DOTS,
};
