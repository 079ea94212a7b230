//! Owned MusicXML element tree
//!
//! `MxsrElement` is the generic labelled node the populator browses: kind,
//! tag name, attributes, trimmed text and children, stamped with the input
//! line it started on. Leaf values are read through the helpers below by
//! whichever compound element owns them.

use super::kinds::ElementKind;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MxsrElement {
    pub kind: ElementKind,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Trimmed text content, `None` when empty
    pub text: Option<String>,
    pub children: Vec<MxsrElement>,
    /// 1-based line where the start tag appears
    pub input_line: u32,
}

impl MxsrElement {
    /// Create an element with no attributes, text or children
    pub fn new(name: &str, input_line: u32) -> Self {
        Self {
            kind: ElementKind::from_tag(name),
            name: name.to_string(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            input_line,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        let trimmed = text.trim();
        self.text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn with_child(mut self, child: MxsrElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attribute_i32(&self, name: &str) -> Option<i32> {
        self.attribute(name)?.trim().parse().ok()
    }

    /// `true` when the attribute is present with value "yes"
    pub fn attribute_is_yes(&self, name: &str) -> bool {
        self.attribute(name) == Some("yes")
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn text_i32(&self) -> Option<i32> {
        self.text()?.parse().ok()
    }

    pub fn text_f64(&self) -> Option<f64> {
        self.text()?.parse().ok()
    }

    /// First direct child with the given tag name
    pub fn child(&self, name: &str) -> Option<&MxsrElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MxsrElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)?.text()
    }

    pub fn child_i32(&self, name: &str) -> Option<i32> {
        self.child(name)?.text_i32()
    }

    pub fn child_f64(&self, name: &str) -> Option<f64> {
        self.child(name)?.text_f64()
    }

    /// Number of elements in this subtree, this one included
    pub fn element_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.element_count()).sum::<usize>()
    }
}
