//! Value types shared across the MSR model
//!
//! Durations are exact rationals expressed in whole notes: a quarter note is
//! 1/4, a triplet eighth is 1/12. MusicXML durations (in divisions per
//! quarter note) convert through `WholeNotes::from_divisions`.

use num_rational::Rational32;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Largest `<divisions>` whose whole-note denominator still fits an `i32`
pub const MAX_DIVISIONS: i32 = i32::MAX / 4;

/// Augmentation dots honoured on a note type; a 1024th with more would
/// overflow the duration denominator
pub const MAX_DOTS: u32 = 8;

/// Exact duration in whole notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WholeNotes(pub Rational32);

impl WholeNotes {
    pub fn new(numerator: i32, denominator: i32) -> Self {
        WholeNotes(Rational32::new(numerator, denominator))
    }

    pub fn zero() -> Self {
        WholeNotes(Rational32::from_integer(0))
    }

    /// Convert a MusicXML duration to whole notes.
    ///
    /// `divisions` is the number of divisions per quarter note and must be
    /// in `1..=MAX_DIVISIONS`; the populator never stores another value.
    pub fn from_divisions(duration: i32, divisions: i32) -> Self {
        WholeNotes(Rational32::new(duration, divisions) * Rational32::new(1, 4))
    }

    pub fn is_zero(&self) -> bool {
        *self.0.numer() == 0
    }

    pub fn is_negative(&self) -> bool {
        *self.0.numer() < 0
    }

    pub fn numerator(&self) -> i32 {
        *self.0.numer()
    }

    pub fn denominator(&self) -> i32 {
        *self.0.denom()
    }

    /// Scale by a tuplet factor: 1/4 under 3:2 becomes 1/6
    pub fn under_tuplet(&self, factor: TupletFactor) -> Self {
        WholeNotes(self.0 * Rational32::new(factor.normal, factor.actual))
    }
}

impl Default for WholeNotes {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for WholeNotes {
    type Output = WholeNotes;

    fn add(self, other: WholeNotes) -> WholeNotes {
        WholeNotes(self.0 + other.0)
    }
}

impl AddAssign for WholeNotes {
    fn add_assign(&mut self, other: WholeNotes) {
        self.0 += other.0;
    }
}

impl Sub for WholeNotes {
    type Output = WholeNotes;

    fn sub(self, other: WholeNotes) -> WholeNotes {
        WholeNotes(self.0 - other.0)
    }
}

impl fmt::Display for WholeNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator(), self.denominator())
    }
}

/// Diatonic step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    pub fn parse(s: &str) -> Option<Step> {
        match s.trim() {
            "C" => Some(Step::C),
            "D" => Some(Step::D),
            "E" => Some(Step::E),
            "F" => Some(Step::F),
            "G" => Some(Step::G),
            "A" => Some(Step::A),
            "B" => Some(Step::B),
            _ => None,
        }
    }

    /// Lowercase note name, as used by LilyPond's Dutch names
    pub fn lowercase(&self) -> &'static str {
        match self {
            Step::C => "c",
            Step::D => "d",
            Step::E => "e",
            Step::F => "f",
            Step::G => "g",
            Step::A => "a",
            Step::B => "b",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lowercase().to_uppercase())
    }
}

/// Chromatic alteration, quarter tones included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Alteration {
    TripleFlat,
    DoubleFlat,
    SesquiFlat,
    Flat,
    SemiFlat,
    #[default]
    Natural,
    SemiSharp,
    Sharp,
    SesquiSharp,
    DoubleSharp,
    TripleSharp,
}

impl Alteration {
    /// From a MusicXML `<alter>` value (semitones, halves allowed)
    pub fn from_alter(alter: f64) -> Option<Alteration> {
        let half_steps = (alter * 2.0).round() as i32;
        if (alter * 2.0 - half_steps as f64).abs() > f64::EPSILON {
            return None;
        }
        match half_steps {
            -6 => Some(Alteration::TripleFlat),
            -4 => Some(Alteration::DoubleFlat),
            -3 => Some(Alteration::SesquiFlat),
            -2 => Some(Alteration::Flat),
            -1 => Some(Alteration::SemiFlat),
            0 => Some(Alteration::Natural),
            1 => Some(Alteration::SemiSharp),
            2 => Some(Alteration::Sharp),
            3 => Some(Alteration::SesquiSharp),
            4 => Some(Alteration::DoubleSharp),
            6 => Some(Alteration::TripleSharp),
            _ => None,
        }
    }

    /// Dutch suffix: "es", "is", "eh", "ih" and their combinations
    pub fn dutch_suffix(&self) -> &'static str {
        match self {
            Alteration::TripleFlat => "eseses",
            Alteration::DoubleFlat => "eses",
            Alteration::SesquiFlat => "eseh",
            Alteration::Flat => "es",
            Alteration::SemiFlat => "eh",
            Alteration::Natural => "",
            Alteration::SemiSharp => "ih",
            Alteration::Sharp => "is",
            Alteration::SesquiSharp => "isih",
            Alteration::DoubleSharp => "isis",
            Alteration::TripleSharp => "isisis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub step: Step,
    pub alteration: Alteration,
    pub octave: i32,
}

impl Pitch {
    pub fn new(step: Step, alteration: Alteration, octave: i32) -> Self {
        Self { step, alteration, octave }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = match self.alteration {
            Alteration::Flat => "b",
            Alteration::Sharp => "#",
            Alteration::DoubleFlat => "bb",
            Alteration::DoubleSharp => "##",
            Alteration::Natural => "",
            _ => "~",
        };
        write!(f, "{}{}{}", self.step, accidental, self.octave)
    }
}

/// Graphic note type, from `<type>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteType {
    Maxima,
    Long,
    Breve,
    Whole,
    Half,
    Quarter,
    Eighth,
    N16th,
    N32nd,
    N64th,
    N128th,
    N256th,
    N512th,
    N1024th,
}

impl NoteType {
    pub fn from_musicxml(s: &str) -> Option<NoteType> {
        match s.trim() {
            "maxima" => Some(NoteType::Maxima),
            "long" => Some(NoteType::Long),
            "breve" => Some(NoteType::Breve),
            "whole" => Some(NoteType::Whole),
            "half" => Some(NoteType::Half),
            "quarter" => Some(NoteType::Quarter),
            "eighth" => Some(NoteType::Eighth),
            "16th" => Some(NoteType::N16th),
            "32nd" => Some(NoteType::N32nd),
            "64th" => Some(NoteType::N64th),
            "128th" => Some(NoteType::N128th),
            "256th" => Some(NoteType::N256th),
            "512th" => Some(NoteType::N512th),
            "1024th" => Some(NoteType::N1024th),
            _ => None,
        }
    }

    /// Undotted value in whole notes
    pub fn whole_notes(&self) -> WholeNotes {
        match self {
            NoteType::Maxima => WholeNotes::new(8, 1),
            NoteType::Long => WholeNotes::new(4, 1),
            NoteType::Breve => WholeNotes::new(2, 1),
            NoteType::Whole => WholeNotes::new(1, 1),
            NoteType::Half => WholeNotes::new(1, 2),
            NoteType::Quarter => WholeNotes::new(1, 4),
            NoteType::Eighth => WholeNotes::new(1, 8),
            NoteType::N16th => WholeNotes::new(1, 16),
            NoteType::N32nd => WholeNotes::new(1, 32),
            NoteType::N64th => WholeNotes::new(1, 64),
            NoteType::N128th => WholeNotes::new(1, 128),
            NoteType::N256th => WholeNotes::new(1, 256),
            NoteType::N512th => WholeNotes::new(1, 512),
            NoteType::N1024th => WholeNotes::new(1, 1024),
        }
    }

    /// Value with `dots` augmentation dots, at most `MAX_DOTS` of them
    pub fn dotted_whole_notes(&self, dots: u32) -> WholeNotes {
        let base = self.whole_notes();
        let mut total = base;
        let mut increment = base;
        for _ in 0..dots.min(MAX_DOTS) {
            increment = WholeNotes(increment.0 / 2);
            total += increment;
        }
        total
    }
}

/// Tuplet ratio: `actual` notes in the time of `normal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupletFactor {
    pub actual: i32,
    pub normal: i32,
}

impl TupletFactor {
    /// Build a reduced factor; `None` for non-positive terms
    pub fn new(actual: i32, normal: i32) -> Option<Self> {
        if actual <= 0 || normal <= 0 {
            return None;
        }
        let g = gcd(actual, normal);
        Some(Self {
            actual: actual / g,
            normal: normal / g,
        })
    }

    pub fn identity() -> Self {
        Self { actual: 1, normal: 1 }
    }

    pub fn is_identity(&self) -> bool {
        self.actual == self.normal
    }

    /// Product of two factors (nesting)
    pub fn combined_with(&self, other: TupletFactor) -> TupletFactor {
        TupletFactor::new(self.actual * other.actual, self.normal * other.normal)
            .unwrap_or_else(TupletFactor::identity)
    }

    /// What remains of `self` once `enclosing` has been accounted for
    pub fn divided_by(&self, enclosing: TupletFactor) -> TupletFactor {
        TupletFactor::new(self.actual * enclosing.normal, self.normal * enclosing.actual)
            .unwrap_or_else(TupletFactor::identity)
    }
}

impl fmt::Display for TupletFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.actual, self.normal)
    }
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

/// Above / below, from the `placement` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Above,
    Below,
}

impl Placement {
    pub fn parse(s: Option<&str>) -> Option<Placement> {
        match s? {
            "above" => Some(Placement::Above),
            "below" => Some(Placement::Below),
            _ => None,
        }
    }
}

/// Shared start / stop / continue marker kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartStop {
    Start,
    Stop,
    Continue,
}

impl StartStop {
    pub fn parse(s: Option<&str>) -> Option<StartStop> {
        match s? {
            "start" => Some(StartStop::Start),
            "stop" => Some(StartStop::Stop),
            "continue" => Some(StartStop::Continue),
            _ => None,
        }
    }
}
