//! Pending-element buffers
//!
//! Annotations that precede the note (or measure) they belong to wait here
//! until that target is finalized. Each kind has its own FIFO list; draining
//! moves every item out in arrival order, so an item is delivered at most
//! once.

use crate::msr::annotations::{
    Coda, Dynamic, FiguredBass, Glide, Harmony, LineBreak, Ligature, Marker, NoteAnnotations,
    OctaveShift, OtherDynamic, PageBreak, RehearsalMark, Scordatura, Segno, Slur, Tempo, Tie,
    Wedge, Words,
};
use crate::msr::PartMeasure;
use serde::Serialize;
use std::fmt;

/// Anything carrying the input line it was read from
pub trait Located {
    fn input_line(&self) -> u32;
}

macro_rules! impl_located {
    ($($t:ty),* $(,)?) => {
        $(impl Located for $t {
            fn input_line(&self) -> u32 {
                self.input_line
            }
        })*
    };
}

impl_located!(
    Dynamic,
    OtherDynamic,
    Words,
    Wedge,
    Tie,
    Slur,
    Ligature,
    Glide,
    Segno,
    Coda,
    Scordatura,
    OctaveShift,
    Marker,
    Harmony,
    FiguredBass,
    RehearsalMark,
    Tempo,
    LineBreak,
    PageBreak,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    Dynamic,
    OtherDynamic,
    Words,
    Wedge,
    Tie,
    Slur,
    Ligature,
    Glissando,
    Slide,
    Segno,
    Coda,
    Scordatura,
    OctaveShift,
    Eyeglasses,
    Damp,
    DampAll,
    Harmony,
    FiguredBass,
    RehearsalMark,
    Tempo,
    LineBreak,
    PageBreak,
}

impl fmt::Display for PendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PendingKind::Dynamic => "dynamic",
            PendingKind::OtherDynamic => "other dynamic",
            PendingKind::Words => "words",
            PendingKind::Wedge => "wedge",
            PendingKind::Tie => "tie",
            PendingKind::Slur => "slur",
            PendingKind::Ligature => "ligature",
            PendingKind::Glissando => "glissando",
            PendingKind::Slide => "slide",
            PendingKind::Segno => "segno",
            PendingKind::Coda => "coda",
            PendingKind::Scordatura => "scordatura",
            PendingKind::OctaveShift => "octave shift",
            PendingKind::Eyeglasses => "eyeglasses",
            PendingKind::Damp => "damp",
            PendingKind::DampAll => "damp all",
            PendingKind::Harmony => "harmony",
            PendingKind::FiguredBass => "figured bass",
            PendingKind::RehearsalMark => "rehearsal mark",
            PendingKind::Tempo => "tempo",
            PendingKind::LineBreak => "line break",
            PendingKind::PageBreak => "page break",
        };
        write!(f, "{}", name)
    }
}

/// One buffered annotation left undelivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orphan {
    pub kind: PendingKind,
    pub input_line: u32,
}

/// FIFO list of one pending kind
#[derive(Debug, Clone)]
pub struct PendingList<T> {
    kind: PendingKind,
    items: Vec<T>,
}

impl<T: Located> PendingList<T> {
    pub fn new(kind: PendingKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Move every item onto `target`, oldest first
    pub fn drain_into(&mut self, target: &mut Vec<T>) -> usize {
        let count = self.items.len();
        target.append(&mut self.items);
        count
    }

    fn drain_orphans(&mut self, orphans: &mut Vec<Orphan>) {
        let kind = self.kind;
        orphans.extend(self.items.drain(..).map(|item| Orphan {
            kind,
            input_line: item.input_line(),
        }));
    }
}

/// All pending lists of one translator
#[derive(Debug, Clone)]
pub struct PendingElements {
    // note-level
    pub dynamics: PendingList<Dynamic>,
    pub other_dynamics: PendingList<OtherDynamic>,
    pub words: PendingList<Words>,
    pub wedges: PendingList<Wedge>,
    pub ties: PendingList<Tie>,
    pub slurs: PendingList<Slur>,
    pub ligatures: PendingList<Ligature>,
    pub glissandos: PendingList<Glide>,
    pub slides: PendingList<Glide>,
    pub segnos: PendingList<Segno>,
    pub codas: PendingList<Coda>,
    pub scordaturas: PendingList<Scordatura>,
    pub octave_shifts: PendingList<OctaveShift>,
    pub eyeglasses: PendingList<Marker>,
    pub damps: PendingList<Marker>,
    pub damp_alls: PendingList<Marker>,
    pub harmonies: PendingList<Harmony>,
    pub figured_basses: PendingList<FiguredBass>,

    // part-level
    pub rehearsal_marks: PendingList<RehearsalMark>,
    pub tempos: PendingList<Tempo>,
    pub line_breaks: PendingList<LineBreak>,
    pub page_breaks: PendingList<PageBreak>,
}

impl Default for PendingElements {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingElements {
    pub fn new() -> Self {
        Self {
            dynamics: PendingList::new(PendingKind::Dynamic),
            other_dynamics: PendingList::new(PendingKind::OtherDynamic),
            words: PendingList::new(PendingKind::Words),
            wedges: PendingList::new(PendingKind::Wedge),
            ties: PendingList::new(PendingKind::Tie),
            slurs: PendingList::new(PendingKind::Slur),
            ligatures: PendingList::new(PendingKind::Ligature),
            glissandos: PendingList::new(PendingKind::Glissando),
            slides: PendingList::new(PendingKind::Slide),
            segnos: PendingList::new(PendingKind::Segno),
            codas: PendingList::new(PendingKind::Coda),
            scordaturas: PendingList::new(PendingKind::Scordatura),
            octave_shifts: PendingList::new(PendingKind::OctaveShift),
            eyeglasses: PendingList::new(PendingKind::Eyeglasses),
            damps: PendingList::new(PendingKind::Damp),
            damp_alls: PendingList::new(PendingKind::DampAll),
            harmonies: PendingList::new(PendingKind::Harmony),
            figured_basses: PendingList::new(PendingKind::FiguredBass),
            rehearsal_marks: PendingList::new(PendingKind::RehearsalMark),
            tempos: PendingList::new(PendingKind::Tempo),
            line_breaks: PendingList::new(PendingKind::LineBreak),
            page_breaks: PendingList::new(PendingKind::PageBreak),
        }
    }

    /// Deliver every note-level item to a finalized note
    pub fn drain_onto_note(&mut self, annotations: &mut NoteAnnotations) -> usize {
        self.dynamics.drain_into(&mut annotations.dynamics)
            + self.other_dynamics.drain_into(&mut annotations.other_dynamics)
            + self.words.drain_into(&mut annotations.words)
            + self.wedges.drain_into(&mut annotations.wedges)
            + self.ties.drain_into(&mut annotations.ties)
            + self.slurs.drain_into(&mut annotations.slurs)
            + self.ligatures.drain_into(&mut annotations.ligatures)
            + self.glissandos.drain_into(&mut annotations.glissandos)
            + self.slides.drain_into(&mut annotations.slides)
            + self.segnos.drain_into(&mut annotations.segnos)
            + self.codas.drain_into(&mut annotations.codas)
            + self.scordaturas.drain_into(&mut annotations.scordaturas)
            + self.octave_shifts.drain_into(&mut annotations.octave_shifts)
            + self.eyeglasses.drain_into(&mut annotations.eyeglasses)
            + self.damps.drain_into(&mut annotations.damps)
            + self.damp_alls.drain_into(&mut annotations.damp_alls)
            + self.harmonies.drain_into(&mut annotations.harmonies)
            + self.figured_basses.drain_into(&mut annotations.figured_basses)
    }

    /// Deliver every part-level item to the current part measure
    pub fn drain_onto_measure(&mut self, measure: &mut PartMeasure) -> usize {
        self.rehearsal_marks.drain_into(&mut measure.rehearsal_marks)
            + self.tempos.drain_into(&mut measure.tempos)
            + self.line_breaks.drain_into(&mut measure.line_breaks)
            + self.page_breaks.drain_into(&mut measure.page_breaks)
    }

    pub fn len(&self) -> usize {
        self.dynamics.len()
            + self.other_dynamics.len()
            + self.words.len()
            + self.wedges.len()
            + self.ties.len()
            + self.slurs.len()
            + self.ligatures.len()
            + self.glissandos.len()
            + self.slides.len()
            + self.segnos.len()
            + self.codas.len()
            + self.scordaturas.len()
            + self.octave_shifts.len()
            + self.eyeglasses.len()
            + self.damps.len()
            + self.damp_alls.len()
            + self.harmonies.len()
            + self.figured_basses.len()
            + self.rehearsal_marks.len()
            + self.tempos.len()
            + self.line_breaks.len()
            + self.page_breaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty every list, returning what was left in it
    pub fn take_orphans(&mut self) -> Vec<Orphan> {
        let mut orphans = Vec::new();
        self.dynamics.drain_orphans(&mut orphans);
        self.other_dynamics.drain_orphans(&mut orphans);
        self.words.drain_orphans(&mut orphans);
        self.wedges.drain_orphans(&mut orphans);
        self.ties.drain_orphans(&mut orphans);
        self.slurs.drain_orphans(&mut orphans);
        self.ligatures.drain_orphans(&mut orphans);
        self.glissandos.drain_orphans(&mut orphans);
        self.slides.drain_orphans(&mut orphans);
        self.segnos.drain_orphans(&mut orphans);
        self.codas.drain_orphans(&mut orphans);
        self.scordaturas.drain_orphans(&mut orphans);
        self.octave_shifts.drain_orphans(&mut orphans);
        self.eyeglasses.drain_orphans(&mut orphans);
        self.damps.drain_orphans(&mut orphans);
        self.damp_alls.drain_orphans(&mut orphans);
        self.harmonies.drain_orphans(&mut orphans);
        self.figured_basses.drain_orphans(&mut orphans);
        self.rehearsal_marks.drain_orphans(&mut orphans);
        self.tempos.drain_orphans(&mut orphans);
        self.line_breaks.drain_orphans(&mut orphans);
        self.page_breaks.drain_orphans(&mut orphans);
        orphans.sort_by_key(|o| o.input_line);
        orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamic(kind: &str, line: u32) -> Dynamic {
        Dynamic {
            kind: kind.to_string(),
            placement: None,
            input_line: line,
        }
    }

    #[test]
    fn test_drain_keeps_arrival_order() {
        let mut pending = PendingElements::new();
        pending.dynamics.push(dynamic("p", 3));
        pending.dynamics.push(dynamic("f", 4));
        let mut annotations = NoteAnnotations::default();

        assert_eq!(pending.drain_onto_note(&mut annotations), 2);

        let kinds: Vec<&str> = annotations.dynamics.iter().map(|d| d.kind.as_str()).collect();
        assert_eq!(kinds, vec!["p", "f"]);
        assert!(pending.dynamics.is_empty());

        // at-most-once: a second drain delivers nothing
        let mut other = NoteAnnotations::default();
        assert_eq!(pending.drain_onto_note(&mut other), 0);
        assert!(other.is_empty());
    }

    #[test]
    fn test_part_level_items_skip_notes() {
        let mut pending = PendingElements::new();
        pending.rehearsal_marks.push(RehearsalMark {
            text: "A".to_string(),
            enclosure: None,
            input_line: 8,
        });
        let mut annotations = NoteAnnotations::default();
        let mut measure = PartMeasure::new("1", 1);

        assert_eq!(pending.drain_onto_note(&mut annotations), 0);
        assert_eq!(pending.drain_onto_measure(&mut measure), 1);
        assert_eq!(measure.rehearsal_marks.len(), 1);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_orphans_name_their_kind() {
        let mut pending = PendingElements::new();
        pending.words.push(Words {
            text: "dolce".to_string(),
            placement: None,
            font_style: None,
            input_line: 12,
        });
        pending.dynamics.push(dynamic("pp", 11));

        let orphans = pending.take_orphans();

        assert_eq!(
            orphans,
            vec![
                Orphan { kind: PendingKind::Dynamic, input_line: 11 },
                Orphan { kind: PendingKind::Words, input_line: 12 },
            ]
        );
        assert!(pending.is_empty());
        assert_eq!(PendingKind::OctaveShift.to_string(), "octave shift");
    }
}
