//! Translation context: the in-flight state of one conversion job
//!
//! Holds the "current" part, measure, time cursor and partially built
//! note or direction. Containers are referenced by index or number, never
//! owned here.

use crate::msr::annotations::{Tempo, Words};
use crate::msr::{Note, Placement, StartStop, TupletFactor, WholeNotes};
use std::collections::HashMap;

/// `<score-part>` header read from the part list
#[derive(Debug, Clone, PartialEq)]
pub struct PartHeader {
    pub id: String,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
}

/// A `<tuplet>` marker found on the note being built
#[derive(Debug, Clone, PartialEq)]
pub struct TupletMarker {
    pub number: Option<i32>,
    /// From `<tuplet-actual>` / `<tuplet-normal>`
    pub explicit_factor: Option<TupletFactor>,
    pub bracket: Option<bool>,
    pub show_number: Option<String>,
    pub placement: Option<Placement>,
    pub input_line: u32,
}

/// `<tremolo type="start|stop">` found on the note being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TremoloMarker {
    pub kind: StartStop,
    pub marks: u32,
    pub input_line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceInfo {
    pub slashed: bool,
    pub steal_time_previous: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LyricInfo {
    pub number: String,
    pub syllabic: Option<String>,
    pub text: String,
    pub extend: bool,
    pub input_line: u32,
}

/// Note between its `visit_start` and `visit_end`
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    pub note: Note,
    pub voice: Option<i32>,
    pub staff: Option<i32>,
    pub is_chord_member: bool,
    pub grace: Option<GraceInfo>,
    pub time_modification: Option<TupletFactor>,
    pub tuplet_starts: Vec<TupletMarker>,
    pub tuplet_stops: Vec<TupletMarker>,
    pub tremolo: Option<TremoloMarker>,
    pub lyrics: Vec<LyricInfo>,
}

/// Direction between its `visit_start` and `visit_end`
#[derive(Debug, Clone, Default)]
pub struct DirectionState {
    pub placement: Option<Placement>,
    /// Held back until the direction ends: they become tempo text when a
    /// metronome mark shares the direction
    pub words: Vec<Words>,
    pub metronome: Option<Tempo>,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenMultipleRest {
    pub first_measure: String,
    pub measure_count: i32,
    pub remaining: i32,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenMeasureRepeat {
    pub first_measure: String,
    pub pattern_measures: i32,
    pub slashes: Option<i32>,
    /// Measures ended since the span started
    pub measures_done: i32,
    pub input_line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenBeatRepeat {
    pub first_measure: String,
    pub slashes: Option<i32>,
    /// Measures ended since the span started
    pub measures_done: i32,
    pub input_line: u32,
}

#[derive(Debug, Clone)]
pub struct TranslationContext {
    pub part_headers: Vec<PartHeader>,

    pub part_index: Option<usize>,
    pub measure_index: usize,
    pub measure_number: String,
    /// Divisions per quarter note, always positive
    pub divisions: i32,

    /// Measure time cursor moved by notes, backup and forward
    pub cursor: WholeNotes,
    /// Furthest cursor position reached in the measure
    pub furthest: WholeNotes,

    /// Staff each voice number was last seen on
    pub voice_staves: HashMap<i32, i32>,
    /// Staff receiving notes that lack `<staff>`, after a staff change
    pub recipient_staff: Option<i32>,
    /// Voices targeted by `<forward>` in the current measure
    pub forwarded_voices: Vec<i32>,

    pub note: Option<NoteBuilder>,
    pub direction: Option<DirectionState>,

    pub multiple_rest: Option<OpenMultipleRest>,
    pub measure_repeat: Option<OpenMeasureRepeat>,
    pub beat_repeat: Option<OpenBeatRepeat>,

    /// Line of the latest element browsed
    pub input_line: u32,
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationContext {
    pub fn new() -> Self {
        Self {
            part_headers: Vec::new(),
            part_index: None,
            measure_index: 0,
            measure_number: String::new(),
            divisions: 1,
            cursor: WholeNotes::zero(),
            furthest: WholeNotes::zero(),
            voice_staves: HashMap::new(),
            recipient_staff: None,
            forwarded_voices: Vec::new(),
            note: None,
            direction: None,
            multiple_rest: None,
            measure_repeat: None,
            beat_repeat: None,
            input_line: 0,
        }
    }

    /// Reset part-scoped state when a `<part>` starts
    pub fn begin_part(&mut self, part_index: usize) {
        self.part_index = Some(part_index);
        self.measure_index = 0;
        self.measure_number.clear();
        self.divisions = 1;
        self.voice_staves.clear();
        self.multiple_rest = None;
        self.measure_repeat = None;
        self.beat_repeat = None;
        self.begin_measure_cursor();
    }

    pub fn begin_measure_cursor(&mut self) {
        self.cursor = WholeNotes::zero();
        self.furthest = WholeNotes::zero();
        self.recipient_staff = None;
        self.forwarded_voices.clear();
    }

    /// Move the cursor forward, keeping track of the furthest point
    pub fn advance_cursor(&mut self, duration: WholeNotes) {
        self.cursor += duration;
        if self.cursor > self.furthest {
            self.furthest = self.cursor;
        }
    }

    /// Move the cursor back; `false` when clamped at the measure start
    pub fn rewind_cursor(&mut self, duration: WholeNotes) -> bool {
        let target = self.cursor - duration;
        if target.is_negative() {
            self.cursor = WholeNotes::zero();
            false
        } else {
            self.cursor = target;
            true
        }
    }

    pub fn part_header(&self, id: &str) -> Option<&PartHeader> {
        self.part_headers.iter().find(|h| h.id == id)
    }

    /// Whole notes for a duration in the current divisions
    pub fn whole_notes(&self, duration: i32) -> WholeNotes {
        WholeNotes::from_divisions(duration, self.divisions)
    }
}
