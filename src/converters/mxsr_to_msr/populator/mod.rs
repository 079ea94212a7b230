//! Skeleton populator: the single pass building MSR from an MXSR tree
//!
//! One `SkeletonPopulator` per conversion job. It is an `MxsrVisitor`:
//! `visit_start` / `visit_end` dispatch on `ElementKind` to the handlers
//! spread over the submodules:
//!
//! - `measures`: parts, measures, backup/forward, barlines, print breaks
//! - `attributes`: divisions, key, time, clefs, staves, measure styles
//! - `notes`: notes, notations, lyrics; chords, tuplets, grace notes and
//!   staff changes are resolved when a note ends
//! - `directions`: direction types buffered as pending elements
//! - `harmonies`: harmonies and figured basses
//!
//! All in-flight state lives in the job's `TranslationContext`.

pub mod attributes;
pub mod context;
pub mod directions;
pub mod harmonies;
pub mod measures;
pub mod notes;

use self::context::{PartHeader, TranslationContext};
use super::errors::ConversionError;
use super::pending::PendingElements;
use super::types::{ConversionResult, ConversionSettings, TraceSettings};
use crate::diagnostics::Diagnostics;
use crate::msr::{MsrError, Part, Score};
use crate::mxsr::{ElementKind, MxsrElement, MxsrVisitor};

pub struct SkeletonPopulator {
    settings: ConversionSettings,
    score: Score,
    diagnostics: Diagnostics,
    pending: PendingElements,
    ctx: TranslationContext,
}

impl SkeletonPopulator {
    pub fn new(settings: ConversionSettings) -> Self {
        let diagnostics = Diagnostics::new(settings.input_source_name.clone());
        Self {
            settings,
            score: Score::new(),
            diagnostics,
            pending: PendingElements::new(),
            ctx: TranslationContext::new(),
        }
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn pending(&self) -> &PendingElements {
        &self.pending
    }

    pub fn into_result(self) -> ConversionResult {
        ConversionResult {
            score: self.score,
            diagnostics: self.diagnostics,
        }
    }

    fn trace(&self) -> &TraceSettings {
        &self.settings.trace
    }

    fn part_index(&self, element: &MxsrElement) -> Result<usize, ConversionError> {
        self.ctx
            .part_index
            .filter(|i| *i < self.score.parts.len())
            .ok_or_else(|| {
                MsrError::NoCurrentPart {
                    element: element.name.clone(),
                    input_line: element.input_line,
                }
                .into()
            })
    }

    fn current_part_mut(&mut self, element: &MxsrElement) -> Result<&mut Part, ConversionError> {
        let index = self.part_index(element)?;
        Ok(&mut self.score.parts[index])
    }

    /// Title and composer, read from the root's header children
    fn visit_score_header(&mut self, root: &MxsrElement) -> Result<(), ConversionError> {
        self.score.title = root
            .child("work")
            .and_then(|w| w.child_text("work-title"))
            .or_else(|| root.child_text("movement-title"))
            .map(str::to_string);

        self.score.composer = root.child("identification").and_then(|id| {
            id.children_named("creator")
                .find(|c| c.attribute("type") == Some("composer"))
                .and_then(|c| c.text())
                .map(str::to_string)
        });
        Ok(())
    }

    fn visit_part_list(&mut self, part_list: &MxsrElement) -> Result<(), ConversionError> {
        for score_part in part_list.children_named("score-part") {
            let Some(id) = score_part.attribute("id") else {
                continue;
            };
            self.ctx.part_headers.push(PartHeader {
                id: id.to_string(),
                name: score_part.child_text("part-name").map(str::to_string),
                abbreviation: score_part
                    .child_text("part-abbreviation")
                    .map(str::to_string),
            });
        }
        Ok(())
    }
}

impl MxsrVisitor for SkeletonPopulator {
    type Error = ConversionError;

    fn visit_start(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        self.ctx.input_line = element.input_line;

        match element.kind {
            ElementKind::ScorePartwise => self.visit_score_header(element),
            ElementKind::PartList => self.visit_part_list(element),

            ElementKind::Part => self.start_part(element),
            ElementKind::Measure => self.start_measure(element),
            ElementKind::Backup => self.visit_backup(element),
            ElementKind::Forward => self.visit_forward(element),
            ElementKind::Barline => self.visit_barline(element),
            ElementKind::Print => self.visit_print(element),

            ElementKind::Attributes => self.visit_attributes(element),

            ElementKind::Note => self.start_note(element),
            ElementKind::Beam => self.visit_beam(element),
            ElementKind::Tuplet => self.visit_tuplet(element),
            ElementKind::Tied => self.visit_tied(element),
            ElementKind::Slur => self.visit_slur(element),
            ElementKind::Glissando | ElementKind::Slide => self.visit_glide(element),
            ElementKind::Articulations => self.visit_articulations(element),
            ElementKind::Technical => self.visit_technical(element),
            ElementKind::Ornaments => self.visit_ornaments(element),
            ElementKind::Fermata => self.visit_fermata(element),
            ElementKind::Arpeggiate => self.visit_arpeggiate(element),
            ElementKind::Lyric => self.visit_lyric(element),

            ElementKind::Direction => self.start_direction(element),
            ElementKind::Dynamics => self.visit_dynamics(element),
            ElementKind::Words => self.visit_words(element),
            ElementKind::Wedge => self.visit_wedge(element),
            ElementKind::Segno => self.visit_segno(element),
            ElementKind::Coda => self.visit_coda(element),
            ElementKind::Rehearsal => self.visit_rehearsal(element),
            ElementKind::OctaveShift => self.visit_octave_shift(element),
            ElementKind::Scordatura => self.visit_scordatura(element),
            ElementKind::Eyeglasses | ElementKind::Damp | ElementKind::DampAll => {
                self.visit_marker(element)
            }
            ElementKind::Metronome => self.visit_metronome(element),
            ElementKind::Bracket => self.visit_bracket(element),

            ElementKind::Pedal
            | ElementKind::AccordionRegistration
            | ElementKind::HarpPedals
            | ElementKind::OtherDirection
            | ElementKind::NonArpeggiate
            | ElementKind::ScoreTimewise => {
                self.diagnostics
                    .unsupported(element.input_line, &element.name);
                Ok(())
            }

            ElementKind::Harmony => self.visit_harmony(element),
            ElementKind::FiguredBass => self.visit_figured_bass(element),

            _ => Ok(()),
        }
    }

    fn visit_end(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        match element.kind {
            ElementKind::Part => self.end_part(element),
            ElementKind::Measure => self.end_measure(element),
            ElementKind::Note => self.end_note(element),
            ElementKind::Direction => self.end_direction(element),
            _ => Ok(()),
        }
    }
}
