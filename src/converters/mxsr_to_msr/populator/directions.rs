//! Directions
//!
//! Every direction type becomes a pending element, attached to the next
//! note (or to the current measure for part-level items) when that note
//! is finalized.

use super::context::DirectionState;
use super::SkeletonPopulator;
use crate::converters::mxsr_to_msr::errors::ConversionError;
use crate::msr::annotations::{
    Coda, Dynamic, Ligature, Marker, OctaveShift, OctaveShiftKind, OtherDynamic, RehearsalMark,
    Scordatura, Segno, StringTuning, Tempo, Wedge, WedgeKind, Words,
};
use crate::msr::{NoteType, Placement, StartStop, Step};
use crate::mxsr::{ElementKind, MxsrElement};

impl SkeletonPopulator {
    /// Placement of the whole direction, used when a direction type has none
    fn direction_placement(&self, element: &MxsrElement) -> Option<Placement> {
        Placement::parse(element.attribute("placement"))
            .or_else(|| self.ctx.direction.as_ref().and_then(|d| d.placement))
    }

    pub(super) fn start_direction(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        self.ctx.direction = Some(DirectionState {
            placement: Placement::parse(element.attribute("placement")),
            input_line: element.input_line,
            ..DirectionState::default()
        });
        Ok(())
    }

    pub(super) fn end_direction(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let Some(direction) = self.ctx.direction.take() else {
            return Ok(());
        };

        let sound_tempo = element
            .child("sound")
            .and_then(|s| s.attribute("tempo"))
            .map(str::to_string);
        let tempo = direction.metronome.or_else(|| {
            sound_tempo.map(|per_minute| Tempo {
                beat_unit: None,
                beat_unit_dots: 0,
                per_minute: Some(per_minute),
                words: None,
                input_line: direction.input_line,
            })
        });

        match tempo {
            Some(mut tempo) => {
                if tempo.words.is_none() && !direction.words.is_empty() {
                    let texts: Vec<&str> = direction.words.iter().map(|w| w.text.as_str()).collect();
                    tempo.words = Some(texts.join(" "));
                }
                self.pending.tempos.push(tempo);
            }
            None => {
                for words in direction.words {
                    self.pending.words.push(words);
                }
            }
        }
        Ok(())
    }

    pub(super) fn visit_dynamics(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let placement = self.direction_placement(element);
        for child in &element.children {
            if child.name == "other-dynamics" {
                self.pending.other_dynamics.push(OtherDynamic {
                    text: child.text().unwrap_or_default().to_string(),
                    input_line: child.input_line,
                });
            } else {
                self.pending.dynamics.push(Dynamic {
                    kind: child.name.clone(),
                    placement,
                    input_line: child.input_line,
                });
            }
        }
        Ok(())
    }

    pub(super) fn visit_words(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let Some(text) = element.text().filter(|t| !t.trim().is_empty()) else {
            return Ok(());
        };
        let words = Words {
            text: text.to_string(),
            placement: self.direction_placement(element),
            font_style: element.attribute("font-style").map(str::to_string),
            input_line: element.input_line,
        };
        match self.ctx.direction.as_mut() {
            Some(direction) => direction.words.push(words),
            None => self.pending.words.push(words),
        }
        Ok(())
    }

    pub(super) fn visit_wedge(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let kind = match element.attribute("type") {
            Some("crescendo") => WedgeKind::Crescendo,
            Some("diminuendo") => WedgeKind::Diminuendo,
            Some("stop") => WedgeKind::Stop,
            _ => return Ok(()),
        };
        self.pending.wedges.push(Wedge {
            kind,
            number: element.attribute_i32("number").unwrap_or(1),
            niente: element.attribute_is_yes("niente"),
            input_line: element.input_line,
        });
        Ok(())
    }

    pub(super) fn visit_segno(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        self.pending.segnos.push(Segno {
            input_line: element.input_line,
        });
        Ok(())
    }

    pub(super) fn visit_coda(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        self.pending.codas.push(Coda {
            input_line: element.input_line,
        });
        Ok(())
    }

    pub(super) fn visit_rehearsal(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(text) = element.text() {
            self.pending.rehearsal_marks.push(RehearsalMark {
                text: text.to_string(),
                enclosure: element.attribute("enclosure").map(str::to_string),
                input_line: element.input_line,
            });
        }
        Ok(())
    }

    pub(super) fn visit_octave_shift(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let kind = match element.attribute("type") {
            Some("up") => OctaveShiftKind::Up,
            Some("down") => OctaveShiftKind::Down,
            Some("stop") => OctaveShiftKind::Stop,
            Some("continue") => OctaveShiftKind::Continue,
            _ => return Ok(()),
        };
        self.pending.octave_shifts.push(OctaveShift {
            kind,
            size: element.attribute_i32("size").unwrap_or(8),
            input_line: element.input_line,
        });
        Ok(())
    }

    /// `<scordatura>`: one `<accord>` per retuned string
    pub(super) fn visit_scordatura(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let tunings = element
            .children_named("accord")
            .filter_map(|accord| {
                Some(StringTuning {
                    string: accord.attribute_i32("string")?,
                    step: accord.child_text("tuning-step").and_then(Step::parse)?,
                    alter: accord.child_f64("tuning-alter").unwrap_or(0.0),
                    octave: accord.child_i32("tuning-octave").unwrap_or(4),
                })
            })
            .collect();
        self.pending.scordaturas.push(Scordatura {
            tunings,
            input_line: element.input_line,
        });
        Ok(())
    }

    /// Eyeglasses, damp and damp-all carry nothing but their position
    pub(super) fn visit_marker(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let marker = Marker {
            input_line: element.input_line,
        };
        match element.kind {
            ElementKind::Eyeglasses => self.pending.eyeglasses.push(marker),
            ElementKind::Damp => self.pending.damps.push(marker),
            ElementKind::DampAll => self.pending.damp_alls.push(marker),
            _ => {}
        }
        Ok(())
    }

    pub(super) fn visit_metronome(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let tempo = Tempo {
            beat_unit: element
                .child_text("beat-unit")
                .and_then(NoteType::from_musicxml),
            beat_unit_dots: element.children_named("beat-unit-dot").count() as u32,
            per_minute: element.child_text("per-minute").map(str::to_string),
            words: None,
            input_line: element.input_line,
        };
        match self.ctx.direction.as_mut() {
            Some(direction) => direction.metronome = Some(tempo),
            None => self.pending.tempos.push(tempo),
        }
        Ok(())
    }

    /// `<bracket>` is kept as a ligature
    pub(super) fn visit_bracket(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(kind) = StartStop::parse(element.attribute("type")) {
            self.pending.ligatures.push(Ligature {
                number: element.attribute_i32("number").unwrap_or(1),
                kind,
                line_end: element.attribute("line-end").map(str::to_string),
                input_line: element.input_line,
            });
        }
        Ok(())
    }
}
