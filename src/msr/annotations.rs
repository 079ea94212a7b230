//! Annotations carried by notes and part measures
//!
//! Most of these arrive before the note they decorate and travel through the
//! populator's pending buffers. Part-level ones (rehearsal marks, tempos,
//! breaks) end up on a `PartMeasure` instead of a note.

use super::types::{NoteType, Placement, StartStop, Step};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dynamic {
    /// MusicXML element name: "p", "mf", "sfz", ...
    pub kind: String,
    pub placement: Option<Placement>,
    pub input_line: u32,
}

/// `<other-dynamics>` free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherDynamic {
    pub text: String,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Words {
    pub text: String,
    pub placement: Option<Placement>,
    pub font_style: Option<String>,
    pub input_line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WedgeKind {
    Crescendo,
    Diminuendo,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wedge {
    pub kind: WedgeKind,
    pub number: i32,
    pub niente: bool,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tie {
    pub kind: StartStop,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slur {
    pub number: i32,
    pub kind: StartStop,
    pub placement: Option<Placement>,
    pub input_line: u32,
}

/// A `<bracket>` direction, rendered as a ligature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ligature {
    pub number: i32,
    pub kind: StartStop,
    pub line_end: Option<String>,
    pub input_line: u32,
}

/// Glissandos and slides share one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glide {
    pub number: i32,
    pub kind: StartStop,
    pub line_type: Option<String>,
    pub text: Option<String>,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segno {
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coda {
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringTuning {
    pub string: i32,
    pub step: Step,
    pub alter: f64,
    pub octave: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scordatura {
    pub tunings: Vec<StringTuning>,
    pub input_line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OctaveShiftKind {
    Up,
    Down,
    Stop,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OctaveShift {
    pub kind: OctaveShiftKind,
    /// 8, 15 or 22
    pub size: i32,
    pub input_line: u32,
}

/// Eyeglasses, damp and damp-all only mark a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonyDegree {
    pub value: i32,
    pub alter: f64,
    /// "add", "alter" or "subtract"
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harmony {
    pub root_step: Option<Step>,
    pub root_alter: f64,
    /// MusicXML kind value: "major", "minor-seventh", ...
    pub kind: String,
    /// Display text from the kind's `text` attribute
    pub kind_text: Option<String>,
    pub bass_step: Option<Step>,
    pub bass_alter: f64,
    pub degrees: Vec<HarmonyDegree>,
    pub inversion: Option<i32>,
    pub staff_number: Option<i32>,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub prefix: Option<String>,
    pub number: Option<i32>,
    pub suffix: Option<String>,
    pub extend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiguredBass {
    pub figures: Vec<Figure>,
    pub parentheses: bool,
    /// In divisions, as written
    pub duration: Option<i32>,
    pub input_line: u32,
}

/// Note-attached annotations filled from the pending buffers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteAnnotations {
    pub dynamics: Vec<Dynamic>,
    pub other_dynamics: Vec<OtherDynamic>,
    pub words: Vec<Words>,
    pub wedges: Vec<Wedge>,
    pub ties: Vec<Tie>,
    pub slurs: Vec<Slur>,
    pub ligatures: Vec<Ligature>,
    pub glissandos: Vec<Glide>,
    pub slides: Vec<Glide>,
    pub segnos: Vec<Segno>,
    pub codas: Vec<Coda>,
    pub scordaturas: Vec<Scordatura>,
    pub octave_shifts: Vec<OctaveShift>,
    pub eyeglasses: Vec<Marker>,
    pub damps: Vec<Marker>,
    pub damp_alls: Vec<Marker>,
    pub harmonies: Vec<Harmony>,
    pub figured_basses: Vec<FiguredBass>,
}

impl NoteAnnotations {
    pub fn is_empty(&self) -> bool {
        self.dynamics.is_empty()
            && self.other_dynamics.is_empty()
            && self.words.is_empty()
            && self.wedges.is_empty()
            && self.ties.is_empty()
            && self.slurs.is_empty()
            && self.ligatures.is_empty()
            && self.glissandos.is_empty()
            && self.slides.is_empty()
            && self.segnos.is_empty()
            && self.codas.is_empty()
            && self.scordaturas.is_empty()
            && self.octave_shifts.is_empty()
            && self.eyeglasses.is_empty()
            && self.damps.is_empty()
            && self.damp_alls.is_empty()
            && self.harmonies.is_empty()
            && self.figured_basses.is_empty()
    }
}

// Note-local notations, set while the note is being built

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Articulation {
    /// Element name: "staccato", "accent", "breath-mark", ...
    pub kind: String,
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technical {
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ornament {
    pub kind: String,
    pub placement: Option<Placement>,
    /// Strokes of a single-note tremolo
    pub marks: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fermata {
    /// "normal", "angled", "square", ...
    pub shape: Option<String>,
    pub inverted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub number: i32,
    /// "begin", "continue", "end", "forward hook", "backward hook"
    pub value: String,
}

// Part-level annotations

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehearsalMark {
    pub text: String,
    pub enclosure: Option<String>,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    pub beat_unit: Option<NoteType>,
    pub beat_unit_dots: u32,
    pub per_minute: Option<String>,
    /// Tempo words from the same direction, if any
    pub words: Option<String>,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBreak {
    pub measure_number: String,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBreak {
    pub measure_number: String,
    pub input_line: u32,
}

// Lyrics

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyllableKind {
    Single,
    Begin,
    Middle,
    End,
}

impl SyllableKind {
    pub fn parse(s: Option<&str>) -> SyllableKind {
        match s {
            Some("begin") => SyllableKind::Begin,
            Some("middle") => SyllableKind::Middle,
            Some("end") => SyllableKind::End,
            _ => SyllableKind::Single,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Syllable {
    pub kind: SyllableKind,
    /// Elided texts joined with "_"
    pub text: String,
    pub extend: bool,
    pub note: super::arena::NoteId,
    pub measure_number: String,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stanza {
    pub number: String,
    pub syllables: Vec<Syllable>,
}
