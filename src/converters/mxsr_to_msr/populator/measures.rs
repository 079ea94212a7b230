//! Parts, measures and the measure time cursor

use super::SkeletonPopulator;
use crate::converters::mxsr_to_msr::errors::ConversionError;
use crate::diagnostics::DiagnosticKind;
use crate::msr::annotations::{LineBreak, PageBreak};
use crate::msr::{Barline, GraceNotesGroupKind, MultipleMeasureRest, Part, PartMeasure};
use crate::mxsr::MxsrElement;

impl SkeletonPopulator {
    pub(super) fn start_part(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let id = element.attribute("id").unwrap_or_default().to_string();
        let mut part = Part::new(id.clone());

        match self.ctx.part_header(&id) {
            Some(header) => {
                part.name = header.name.clone();
                part.abbreviation = header.abbreviation.clone();
            }
            None => self.diagnostics.warning(
                element.input_line,
                DiagnosticKind::UnknownPart,
                format!("part \"{}\" is not declared in <part-list>", id),
            ),
        }

        self.score.parts.push(part);
        self.ctx.begin_part(self.score.parts.len() - 1);

        if self.trace().measures {
            log::debug!("part {} starts at line {}", id, element.input_line);
        }
        Ok(())
    }

    pub(super) fn end_part(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let line = element.input_line;

        for orphan in self.pending.take_orphans() {
            self.diagnostics.warning(
                orphan.input_line,
                DiagnosticKind::OrphanedPendingElement,
                format!("{} never found a note to attach to, dropped", orphan.kind),
            );
        }

        if let Some(span) = self.ctx.multiple_rest.take() {
            self.diagnostics.error(
                span.input_line,
                DiagnosticKind::UnmatchedMultipleRest,
                format!(
                    "multiple rest of {} measures from measure {} ends after {}",
                    span.measure_count,
                    span.first_measure,
                    span.measure_count - span.remaining
                ),
            );
        }
        if let Some(span) = self.ctx.measure_repeat.take() {
            self.diagnostics.error(
                span.input_line,
                DiagnosticKind::UnmatchedMeasureRepeat,
                format!(
                    "measure repeat from measure {} is never stopped",
                    span.first_measure
                ),
            );
        }

        if let Some(span) = self.ctx.beat_repeat.take() {
            self.diagnostics.error(
                span.input_line,
                DiagnosticKind::UnmatchedBeatRepeat,
                format!(
                    "beat repeat from measure {} is never stopped",
                    span.first_measure
                ),
            );
        }

        let part = self.current_part_mut(element)?;
        for voice in part.voices() {
            voice.finalize(line)?;
        }

        if self.trace().measures {
            let part = &self.score.parts[self.part_index(element)?];
            log::debug!(
                "part {} ends with {} measure(s) and {} voice(s)",
                part.id,
                part.measures.len(),
                part.voices().count()
            );
        }
        self.ctx.part_index = None;
        Ok(())
    }

    pub(super) fn start_measure(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let number = element.attribute("number").unwrap_or_default().to_string();
        let part = self.current_part_mut(element)?;
        part.measures.push(PartMeasure::new(number.clone(), element.input_line));
        let index = part.measures.len() - 1;

        self.ctx.measure_index = index;
        self.ctx.measure_number = number;
        self.ctx.begin_measure_cursor();

        if self.trace().measures {
            log::debug!(
                "measure {} starts at line {}",
                self.ctx.measure_number,
                element.input_line
            );
        }
        Ok(())
    }

    /// Close the measure: settle grace notes and open tuplets per voice,
    /// then pad every voice to the measure length.
    pub(super) fn end_measure(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let line = element.input_line;
        let index = self.ctx.measure_index;
        let measure_number = self.ctx.measure_number.clone();
        let part_index = self.part_index(element)?;
        let trace_grace = self.trace().grace_notes;

        let part = &mut self.score.parts[part_index];
        let arena = &mut self.score.arena;

        let mut length = self.ctx.furthest;
        for voice in part.voices() {
            if voice.measures.len() == index + 1 && voice.position() > length {
                length = voice.position();
            }
        }

        for voice in part.voices_mut() {
            if let Some(group) = voice.nesting_mut().take_pending_grace_notes() {
                match voice.nesting().last_principal_note() {
                    Some(principal) => {
                        arena.grace_notes_group_mut(group)?.kind = GraceNotesGroupKind::After;
                        arena.note_mut(principal)?.grace_notes_group_after = Some(group);
                        if trace_grace {
                            log::debug!(
                                "voice {}: trailing grace notes become an after-group",
                                voice.number
                            );
                        }
                    }
                    None => self.diagnostics.warning(
                        arena.grace_notes_group(group)?.input_line,
                        DiagnosticKind::GraceNotesWithoutPrincipal,
                        format!(
                            "grace notes in voice {} of measure {} have no principal note, dropped",
                            voice.number, measure_number
                        ),
                    ),
                }
            }

            let depth = voice.nesting().depth();
            if depth > 0 {
                self.diagnostics.warning(
                    line,
                    DiagnosticKind::TupletCrossesBarline,
                    format!(
                        "{} tuplet(s) of voice {} still open at the end of measure {}",
                        depth, voice.number, measure_number
                    ),
                );
            }

            if let Some(tremolo) = voice.nesting_mut().take_open_double_tremolo() {
                self.diagnostics.warning(
                    arena.double_tremolo(tremolo)?.input_line,
                    DiagnosticKind::UnmatchedDoubleTremolo,
                    format!(
                        "double tremolo of voice {} not stopped by the end of measure {}",
                        voice.number, measure_number
                    ),
                );
            }

            voice.nesting_mut().forget_last_note();
        }

        if let Some(measure) = part.measures.get_mut(index) {
            measure.length = length;
        }
        let part_measures = &part.measures;
        for staff in part.staves.iter_mut() {
            for voice in staff.voices.iter_mut() {
                voice.ensure_measure(index, part_measures);
                voice.pad_to(length);
            }
        }

        self.count_measure_for_spans(part_index);

        if self.trace().measures {
            log::debug!("measure {} ends, length {}", measure_number, length);
        }
        Ok(())
    }

    /// Advance open multiple rest and measure repeat spans past this measure
    fn count_measure_for_spans(&mut self, part_index: usize) {
        let measure_number = self.ctx.measure_number.clone();

        let finished = match self.ctx.multiple_rest.as_mut() {
            Some(span) => {
                span.remaining -= 1;
                span.remaining <= 0
            }
            None => false,
        };
        if finished {
            if let Some(span) = self.ctx.multiple_rest.take() {
                self.score.parts[part_index]
                    .multiple_measure_rests
                    .push(MultipleMeasureRest {
                        first_measure: span.first_measure,
                        last_measure: measure_number,
                        measure_count: span.measure_count,
                        input_line: span.input_line,
                    });
            }
        }

        if let Some(span) = self.ctx.measure_repeat.as_mut() {
            span.measures_done += 1;
        }
        if let Some(span) = self.ctx.beat_repeat.as_mut() {
            span.measures_done += 1;
        }
    }

    pub(super) fn visit_backup(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let duration = self.ctx.whole_notes(element.child_i32("duration").unwrap_or(0));
        let before = self.ctx.cursor;

        if !self.ctx.rewind_cursor(duration) {
            self.diagnostics.warning(
                element.input_line,
                DiagnosticKind::NegativeBackup,
                format!(
                    "backup of {} from position {} goes before the measure start, clamped",
                    duration, before
                ),
            );
        }
        self.ctx.recipient_staff = None;

        if self.trace().backup_forward {
            log::debug!("backup {} -> {}", before, self.ctx.cursor);
        }
        Ok(())
    }

    /// Forward moves the cursor; a targeted voice is padded up to it
    pub(super) fn visit_forward(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let duration = self.ctx.whole_notes(element.child_i32("duration").unwrap_or(0));
        let before = self.ctx.cursor;
        self.ctx.advance_cursor(duration);
        self.ctx.recipient_staff = None;

        if let Some(voice_number) = element.child_i32("voice") {
            let staff_number = element
                .child_i32("staff")
                .or_else(|| self.ctx.voice_staves.get(&voice_number).copied())
                .unwrap_or(1);
            let index = self.ctx.measure_index;
            let cursor = self.ctx.cursor;
            let voice = self
                .current_part_mut(element)?
                .voice_in_measure(staff_number, voice_number, index);
            voice.pad_to(cursor);
            self.ctx.forwarded_voices.push(voice_number);
            self.ctx.voice_staves.entry(voice_number).or_insert(staff_number);
        }

        if self.trace().backup_forward {
            log::debug!(
                "forward {} -> {} (voices forwarded to: {:?})",
                before,
                self.ctx.cursor,
                self.ctx.forwarded_voices
            );
        }
        Ok(())
    }

    pub(super) fn visit_barline(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let ending = element.child("ending");
        let barline = Barline {
            location: element.attribute("location").unwrap_or("right").to_string(),
            bar_style: element.child_text("bar-style").map(str::to_string),
            repeat_direction: element
                .child("repeat")
                .and_then(|r| r.attribute("direction"))
                .map(str::to_string),
            ending_number: ending.and_then(|e| e.attribute("number")).map(str::to_string),
            ending_type: ending.and_then(|e| e.attribute("type")).map(str::to_string),
            input_line: element.input_line,
        };

        let part = self.current_part_mut(element)?;
        if let Some(measure) = part.current_measure_mut() {
            measure.barlines.push(barline);
        }
        Ok(())
    }

    /// `new-system` / `new-page` become pending breaks
    pub(super) fn visit_print(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let measure_number = self.ctx.measure_number.clone();
        if element.attribute_is_yes("new-system") {
            self.pending.line_breaks.push(LineBreak {
                measure_number: measure_number.clone(),
                input_line: element.input_line,
            });
        }
        if element.attribute_is_yes("new-page") {
            self.pending.page_breaks.push(PageBreak {
                measure_number,
                input_line: element.input_line,
            });
        }
        Ok(())
    }
}

