//! Fatal errors of the MSR model
//!
//! These mean the populator's own bookkeeping is inconsistent. They abort
//! the conversion job they occur in and nothing else.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MsrError {
    /// Pop or member append with no open tuplet
    #[error("voice {voice}: tuplet stack underflow (line {input_line})")]
    TupletStackUnderflow { voice: i32, input_line: u32 },

    /// Voice finalized while tuplets are still open
    #[error("voice {voice}: {depth} tuplet(s) still open at voice finalization (line {input_line})")]
    UnclosedTuplets {
        voice: i32,
        depth: usize,
        input_line: u32,
    },

    /// Handle that does not address an arena slot
    #[error("dangling {kind} handle #{index}")]
    DanglingHandle { kind: &'static str, index: usize },

    /// Part content browsed with no part open
    #[error("<{element}> outside of any <part> (line {input_line})")]
    NoCurrentPart { element: String, input_line: u32 },

    /// Recorded element location no longer holds the expected element
    #[error("voice {voice}: no element at {location}")]
    StaleLocation { voice: i32, location: String },
}
