//! Depth-first browsing of an MXSR tree
//!
//! Each element gets exactly one `visit_start` on entry and one `visit_end`
//! on exit, in document order. Implementors dispatch on `ElementKind`.

use super::element::MxsrElement;

pub trait MxsrVisitor {
    type Error;

    fn visit_start(&mut self, element: &MxsrElement) -> Result<(), Self::Error>;

    fn visit_end(&mut self, element: &MxsrElement) -> Result<(), Self::Error>;
}

/// Browse `element` and its subtree, stopping at the first error
pub fn browse<V: MxsrVisitor>(element: &MxsrElement, visitor: &mut V) -> Result<(), V::Error> {
    visitor.visit_start(element)?;
    for child in &element.children {
        browse(child, visitor)?;
    }
    visitor.visit_end(element)
}
