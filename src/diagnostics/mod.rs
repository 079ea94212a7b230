//! Diagnostics collected while translating a score
//!
//! Every conversion job owns one `Diagnostics` collector. Input-structural
//! problems and unsupported constructs are recorded here with their source
//! location and streamed through the `log` facade; they never interrupt the
//! traversal. Fatal conditions travel as `ConversionError` instead.

use serde::{Deserialize, Serialize};

/// Severity level for diagnostic marks
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// What went wrong, one variant per recovery rule
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// `<tuplet type="stop">` with no open tuplet in the voice
    TupletStopWithoutStart,
    /// Tuplet number does not follow the voice's nesting order.
    /// Kept apart from other tuplet warnings so a strict mode can key on it.
    TupletNumberingDrift,
    /// A tuplet is still open when its measure ends
    TupletCrossesBarline,
    /// A tuplet start on a note without usable ratio information
    MalformedTuplet,
    /// `<chord/>` on a note that has nothing to anchor to
    ChordWithoutAnchor,
    /// `<staff>` names a staff beyond the part's `<staves>` count
    UndeclaredStaff,
    /// Grace notes that never found a principal note
    GraceNotesWithoutPrincipal,
    /// Pending annotation still buffered when its part ended
    OrphanedPendingElement,
    /// `<backup>` moving the time cursor before the measure start
    NegativeBackup,
    /// Non-positive, out of range or unparsable `<divisions>`
    InvalidDivisions,
    /// More augmentation dots than a duration can carry, extra ones ignored
    ExcessiveDots,
    /// `<part>` whose id is absent from `<part-list>`
    UnknownPart,
    /// Multiple-measure rest span that was not completed
    UnmatchedMultipleRest,
    /// Measure repeat span that was not completed, or stopped without start
    UnmatchedMeasureRepeat,
    /// Beat repeat span that was not completed, or stopped without start
    UnmatchedBeatRepeat,
    /// Double tremolo start with no stop note, or stop without start
    UnmatchedDoubleTremolo,
    /// Recognized MusicXML construct this translator does not handle
    UnsupportedConstruct,
}

/// A diagnostic mark attached to a source location
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DiagnosticMark {
    /// Name of the input (file name or "-")
    pub input_source: String,
    /// 1-based input line number
    pub input_line: u32,
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Kind identifier
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
}

impl DiagnosticMark {
    /// Create a new diagnostic mark
    pub fn new(
        input_source: impl Into<String>,
        input_line: u32,
        severity: DiagnosticSeverity,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            input_source: input_source.into(),
            input_line,
            severity,
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DiagnosticMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        };
        write!(
            f,
            "{}:{}: {}: {}",
            self.input_source, self.input_line, severity, self.message
        )
    }
}

/// Collection of diagnostic marks for one conversion job
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Diagnostics {
    /// Input source name stamped on every mark
    pub input_source: String,
    /// All diagnostic marks, in emission order
    pub marks: Vec<DiagnosticMark>,
}

impl Diagnostics {
    /// Create empty diagnostics for an input source
    pub fn new(input_source: impl Into<String>) -> Self {
        Self {
            input_source: input_source.into(),
            marks: Vec::new(),
        }
    }

    /// Add a mark, streaming it to the log as it arrives
    pub fn add(&mut self, mark: DiagnosticMark) {
        match mark.severity {
            DiagnosticSeverity::Error => log::error!("{}", mark),
            DiagnosticSeverity::Warning => log::warn!("{}", mark),
            DiagnosticSeverity::Info => log::info!("{}", mark),
        }
        self.marks.push(mark);
    }

    pub fn warning(&mut self, input_line: u32, kind: DiagnosticKind, message: impl Into<String>) {
        let mark = DiagnosticMark::new(
            self.input_source.clone(),
            input_line,
            DiagnosticSeverity::Warning,
            kind,
            message,
        );
        self.add(mark);
    }

    pub fn error(&mut self, input_line: u32, kind: DiagnosticKind, message: impl Into<String>) {
        let mark = DiagnosticMark::new(
            self.input_source.clone(),
            input_line,
            DiagnosticSeverity::Error,
            kind,
            message,
        );
        self.add(mark);
    }

    /// Report a recognized but unhandled construct; the caller skips it
    pub fn unsupported(&mut self, input_line: u32, construct: &str) {
        let mark = DiagnosticMark::new(
            self.input_source.clone(),
            input_line,
            DiagnosticSeverity::Info,
            DiagnosticKind::UnsupportedConstruct,
            format!("<{}> is not supported, skipped", construct),
        );
        self.add(mark);
    }

    /// Extend with multiple marks
    pub fn extend(&mut self, marks: impl IntoIterator<Item = DiagnosticMark>) {
        for mark in marks {
            self.add(mark);
        }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.marks
            .iter()
            .any(|m| m.severity == DiagnosticSeverity::Error)
    }

    /// Check if there are any diagnostics
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Marks of one kind, in emission order
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &DiagnosticMark> {
        self.marks.iter().filter(move |m| m.kind == kind)
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Input line numbers that carry at least one warning, sorted and deduplicated
    pub fn warning_lines(&self) -> Vec<u32> {
        let mut lines: Vec<u32> = self
            .marks
            .iter()
            .filter(|m| m.severity == DiagnosticSeverity::Warning)
            .map(|m| m.input_line)
            .collect();
        lines.sort_unstable();
        lines.dedup();
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_mark_creation() {
        let mark = DiagnosticMark::new(
            "score.xml",
            12,
            DiagnosticSeverity::Warning,
            DiagnosticKind::ChordWithoutAnchor,
            "chord without anchor",
        );

        assert_eq!(mark.input_source, "score.xml");
        assert_eq!(mark.input_line, 12);
        assert_eq!(mark.severity, DiagnosticSeverity::Warning);
        assert_eq!(mark.kind, DiagnosticKind::ChordWithoutAnchor);
        assert_eq!(mark.to_string(), "score.xml:12: warning: chord without anchor");
    }

    #[test]
    fn test_diagnostics_has_errors() {
        let mut diags = Diagnostics::new("-");
        assert!(!diags.has_errors());

        diags.warning(3, DiagnosticKind::NegativeBackup, "Warning");
        assert!(!diags.has_errors());

        diags.error(7, DiagnosticKind::UnmatchedMultipleRest, "Error");
        assert!(diags.has_errors());
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_warning_lines_are_deduplicated() {
        let mut diags = Diagnostics::new("-");
        diags.warning(9, DiagnosticKind::TupletStopWithoutStart, "a");
        diags.warning(4, DiagnosticKind::TupletNumberingDrift, "b");
        diags.warning(9, DiagnosticKind::TupletNumberingDrift, "c");
        diags.unsupported(2, "pedal");

        assert_eq!(diags.warning_lines(), vec![4, 9]);
        assert_eq!(diags.count_of(DiagnosticKind::TupletNumberingDrift), 2);
        assert_eq!(diags.count_of(DiagnosticKind::UnsupportedConstruct), 1);
    }
}
