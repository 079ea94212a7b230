//! `<attributes>`: divisions, key, time, clefs, staves and measure styles

use super::context::{OpenBeatRepeat, OpenMeasureRepeat, OpenMultipleRest};
use super::SkeletonPopulator;
use crate::converters::mxsr_to_msr::errors::ConversionError;
use crate::diagnostics::DiagnosticKind;
use crate::msr::{BeatRepeat, Clef, Key, MeasureRepeat, Time, MAX_DIVISIONS};
use crate::mxsr::MxsrElement;

impl SkeletonPopulator {
    pub(super) fn visit_attributes(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(divisions) = element.child("divisions") {
            match divisions.text_i32() {
                Some(value) if (1..=MAX_DIVISIONS).contains(&value) => self.ctx.divisions = value,
                _ => self.diagnostics.warning(
                    divisions.input_line,
                    DiagnosticKind::InvalidDivisions,
                    format!(
                        "invalid divisions {:?}, keeping {}",
                        divisions.text().unwrap_or_default(),
                        self.ctx.divisions
                    ),
                ),
            }
        }

        let key = element.child("key").map(|k| Key {
            fifths: k.child_i32("fifths").unwrap_or(0),
            mode: k.child_text("mode").map(str::to_string),
        });

        let time = element.child("time").map(|t| Time {
            beats: t.child_text("beats").unwrap_or_default().to_string(),
            beat_type: t.child_text("beat-type").unwrap_or_default().to_string(),
            senza_misura: t.has_child("senza-misura"),
        });

        let clefs: Vec<Clef> = element
            .children_named("clef")
            .map(|c| Clef {
                staff_number: c.attribute_i32("number").unwrap_or(1),
                sign: c.child_text("sign").unwrap_or("G").to_string(),
                line: c.child_i32("line"),
                octave_change: c.child_i32("clef-octave-change").unwrap_or(0),
            })
            .collect();

        let staves = element.child_i32("staves");

        let part = self.current_part_mut(element)?;
        if let Some(staves) = staves.filter(|s| *s > 0) {
            part.declared_staves = staves;
        }
        if let Some(measure) = part.current_measure_mut() {
            if key.is_some() {
                measure.key = key;
            }
            if time.is_some() {
                measure.time = time;
            }
            measure.clefs.extend(clefs);
        }

        for style in element.children_named("measure-style") {
            self.visit_measure_style(style)?;
        }
        Ok(())
    }

    fn visit_measure_style(&mut self, style: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(rest) = style.child("multiple-rest") {
            let count = rest.text_i32().unwrap_or(0);
            if count > 0 {
                if let Some(previous) = self.ctx.multiple_rest.take() {
                    self.diagnostics.error(
                        previous.input_line,
                        DiagnosticKind::UnmatchedMultipleRest,
                        format!(
                            "multiple rest from measure {} interrupted after {} of {} measures",
                            previous.first_measure,
                            previous.measure_count - previous.remaining,
                            previous.measure_count
                        ),
                    );
                }
                self.ctx.multiple_rest = Some(OpenMultipleRest {
                    first_measure: self.ctx.measure_number.clone(),
                    measure_count: count,
                    remaining: count,
                    input_line: rest.input_line,
                });
            }
        }

        if let Some(repeat) = style.child("measure-repeat") {
            match repeat.attribute("type") {
                Some("start") => {
                    self.ctx.measure_repeat = Some(OpenMeasureRepeat {
                        first_measure: self.ctx.measure_number.clone(),
                        pattern_measures: repeat.text_i32().unwrap_or(1),
                        slashes: repeat.attribute_i32("slashes"),
                        measures_done: 0,
                        input_line: repeat.input_line,
                    });
                }
                Some("stop") => self.stop_measure_repeat(repeat)?,
                _ => {}
            }
        }

        if let Some(repeat) = style.child("beat-repeat") {
            match repeat.attribute("type") {
                Some("start") => {
                    if let Some(previous) = self.ctx.beat_repeat.take() {
                        self.diagnostics.error(
                            previous.input_line,
                            DiagnosticKind::UnmatchedBeatRepeat,
                            format!(
                                "beat repeat from measure {} restarted before its stop",
                                previous.first_measure
                            ),
                        );
                    }
                    self.ctx.beat_repeat = Some(OpenBeatRepeat {
                        first_measure: self.ctx.measure_number.clone(),
                        slashes: repeat.attribute_i32("slashes"),
                        measures_done: 0,
                        input_line: repeat.input_line,
                    });
                }
                Some("stop") => self.stop_beat_repeat(repeat)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// A stop at the measure start ends the span with the previous measure,
    /// a stop further in includes the current one
    fn stop_beat_repeat(&mut self, repeat: &MxsrElement) -> Result<(), ConversionError> {
        let Some(span) = self.ctx.beat_repeat.take() else {
            self.diagnostics.warning(
                repeat.input_line,
                DiagnosticKind::UnmatchedBeatRepeat,
                "beat repeat stop without a start, ignored",
            );
            return Ok(());
        };

        let includes_current = !self.ctx.cursor.is_zero() || span.measures_done == 0;
        let current_number = self.ctx.measure_number.clone();
        let part = self.current_part_mut(repeat)?;
        let (last_measure, measure_count) = if includes_current {
            (current_number, span.measures_done + 1)
        } else {
            let previous = part
                .measures
                .iter()
                .rev()
                .nth(1)
                .map(|m| m.number.clone())
                .unwrap_or_else(|| span.first_measure.clone());
            (previous, span.measures_done)
        };
        part.beat_repeats.push(BeatRepeat {
            first_measure: span.first_measure,
            last_measure,
            measure_count,
            slashes: span.slashes,
            input_line: span.input_line,
        });
        Ok(())
    }

    /// The stop sits in the first measure after the span
    fn stop_measure_repeat(&mut self, repeat: &MxsrElement) -> Result<(), ConversionError> {
        let Some(span) = self.ctx.measure_repeat.take() else {
            self.diagnostics.warning(
                repeat.input_line,
                DiagnosticKind::UnmatchedMeasureRepeat,
                "measure repeat stop without a start, ignored",
            );
            return Ok(());
        };

        let part = self.current_part_mut(repeat)?;
        let last_measure = part
            .measures
            .iter()
            .rev()
            .nth(1)
            .map(|m| m.number.clone())
            .unwrap_or_else(|| span.first_measure.clone());
        part.measure_repeats.push(MeasureRepeat {
            first_measure: span.first_measure,
            last_measure,
            measure_count: span.measures_done,
            pattern_measures: span.pattern_measures,
            slashes: span.slashes,
            input_line: span.input_line,
        });
        Ok(())
    }
}
