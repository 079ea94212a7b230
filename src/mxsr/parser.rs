//! MusicXML text → MXSR tree
//!
//! Parses with roxmltree (zero-copy) and copies the element structure into
//! an owned `MxsrElement` tree, recording the input line of every element.

use super::element::MxsrElement;
use super::kinds::ElementKind;
use roxmltree::{Document, Node};
use thiserror::Error;

/// Fatal XML parsing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// XML is malformed (not well-formed)
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// MusicXML format not supported (e.g., timewise instead of partwise)
    #[error("Unsupported MusicXML format: {0}")]
    UnsupportedFormat(String),

    /// Required structural element is missing
    #[error("Missing required element: {0}")]
    MissingRequiredElement(String),
}

/// Parse a MusicXML document into its MXSR tree.
///
/// The returned root is always a `<score-partwise>` element holding at
/// least one `<part>`.
pub fn parse_musicxml_to_mxsr(xml: &str) -> Result<MxsrElement, ParseError> {
    // MusicXML files include a DOCTYPE declaration, so DTDs must be allowed
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| ParseError::InvalidXml(format!("XML parse error: {}", e)))?;

    let root = doc.root_element();
    match ElementKind::from_tag(root.tag_name().name()) {
        ElementKind::ScorePartwise => {}
        ElementKind::ScoreTimewise => {
            return Err(ParseError::UnsupportedFormat(
                "score-timewise (use score-partwise instead)".to_string(),
            ));
        }
        _ => {
            return Err(ParseError::UnsupportedFormat(format!(
                "Expected score-partwise, found {}",
                root.tag_name().name()
            )));
        }
    }

    let tree = convert_node(&doc, root);

    if !tree.has_child("part") {
        return Err(ParseError::MissingRequiredElement(
            "No parts found in score".to_string(),
        ));
    }

    Ok(tree)
}

fn convert_node(doc: &Document, node: Node) -> MxsrElement {
    let name = node.tag_name().name();
    let input_line = doc.text_pos_at(node.range().start).row;

    let mut element = MxsrElement::new(name, input_line);
    element.attributes = node
        .attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();

    let text: String = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();
    element = element.with_text(&text);

    element.children = node
        .children()
        .filter(|c| c.is_element())
        .map(|c| convert_node(doc, c))
        .collect();

    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_structure_and_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN"
  "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <duration>4</duration>
      </note>
    </measure>
  </part>
</score-partwise>"#;

        let tree = parse_musicxml_to_mxsr(xml).unwrap();
        assert_eq!(tree.kind, ElementKind::ScorePartwise);
        assert_eq!(tree.attribute("version"), Some("3.1"));

        let part = tree.child("part").unwrap();
        assert_eq!(part.input_line, 5);
        let note = part.child("measure").unwrap().child("note").unwrap();
        assert_eq!(note.input_line, 7);
        assert_eq!(note.child("pitch").unwrap().child_text("step"), Some("C"));
        assert_eq!(note.child_i32("duration"), Some(4));
    }

    #[test]
    fn test_timewise_is_rejected() {
        let xml = r#"<score-timewise><measure number="1"/></score-timewise>"#;
        assert!(matches!(
            parse_musicxml_to_mxsr(xml),
            Err(ParseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            parse_musicxml_to_mxsr("<score-partwise><part>"),
            Err(ParseError::InvalidXml(_))
        ));
    }

    #[test]
    fn test_missing_parts() {
        let xml = r#"<score-partwise><part-list/></score-partwise>"#;
        assert!(matches!(
            parse_musicxml_to_mxsr(xml),
            Err(ParseError::MissingRequiredElement(_))
        ));
    }
}
