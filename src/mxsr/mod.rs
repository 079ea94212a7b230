//! MXSR: the source tree closest to the MusicXML text
//!
//! ```text
//! MusicXML String
//!   ↓ [parse with roxmltree]
//! MxsrElement tree (kinds, attributes, text, line numbers)
//!   ↓ [browse with an MxsrVisitor]
//! skeleton populator → MSR
//! ```

pub mod element;
pub mod kinds;
pub mod parser;
pub mod visitor;

pub use element::MxsrElement;
pub use kinds::ElementKind;
pub use parser::{parse_musicxml_to_mxsr, ParseError};
pub use visitor::{browse, MxsrVisitor};
