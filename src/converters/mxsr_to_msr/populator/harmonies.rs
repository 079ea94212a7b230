//! Harmonies and figured basses, both buffered until the next note

use super::SkeletonPopulator;
use crate::converters::mxsr_to_msr::errors::ConversionError;
use crate::msr::annotations::{Figure, FiguredBass, Harmony, HarmonyDegree};
use crate::msr::Step;
use crate::mxsr::MxsrElement;

impl SkeletonPopulator {
    pub(super) fn visit_harmony(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let root = element.child("root");
        let bass = element.child("bass");
        let kind = element.child("kind");

        let degrees = element
            .children_named("degree")
            .filter_map(|degree| {
                Some(HarmonyDegree {
                    value: degree.child_i32("degree-value")?,
                    alter: degree.child_f64("degree-alter").unwrap_or(0.0),
                    kind: degree.child_text("degree-type").unwrap_or("add").to_string(),
                })
            })
            .collect();

        self.pending.harmonies.push(Harmony {
            root_step: root
                .and_then(|r| r.child_text("root-step"))
                .and_then(Step::parse),
            root_alter: root.and_then(|r| r.child_f64("root-alter")).unwrap_or(0.0),
            kind: kind.and_then(|k| k.text()).unwrap_or("none").to_string(),
            kind_text: kind.and_then(|k| k.attribute("text")).map(str::to_string),
            bass_step: bass
                .and_then(|b| b.child_text("bass-step"))
                .and_then(Step::parse),
            bass_alter: bass.and_then(|b| b.child_f64("bass-alter")).unwrap_or(0.0),
            degrees,
            inversion: element.child_i32("inversion"),
            staff_number: element.child_i32("staff"),
            input_line: element.input_line,
        });

        if self.trace().pending {
            log::debug!(
                "line {}: harmony pending ({} harmonies waiting)",
                element.input_line,
                self.pending.harmonies.len()
            );
        }
        Ok(())
    }

    pub(super) fn visit_figured_bass(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let figures = element
            .children_named("figure")
            .map(|figure| Figure {
                prefix: figure.child_text("prefix").map(str::to_string),
                number: figure.child_i32("figure-number"),
                suffix: figure.child_text("suffix").map(str::to_string),
                extend: figure.has_child("extend"),
            })
            .collect();

        self.pending.figured_basses.push(FiguredBass {
            figures,
            parentheses: element.attribute_is_yes("parentheses"),
            duration: element.child_i32("duration"),
            input_line: element.input_line,
        });
        Ok(())
    }
}
