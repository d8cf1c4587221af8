#![forbid(unsafe_code)]

//! Accessibility attribute vocabulary.

use crate::dom::Dom;

/// Hidden-state attribute on the overlay container.
pub const ARIA_HIDDEN: &str = "aria-hidden";
/// Expanded-state attribute on the disclosure toggle.
pub const ARIA_EXPANDED: &str = "aria-expanded";
/// Tab order attribute.
pub const TABINDEX: &str = "tabindex";
/// `tabindex` value that allows programmatic focus but keeps the element out
/// of the sequential tab order.
pub const PROGRAMMATIC_FOCUS: &str = "-1";

/// ARIA boolean attribute value.
#[inline]
#[must_use]
pub const fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Read an ARIA boolean attribute. Anything other than `"true"` is false.
pub fn read_aria_bool<D: Dom>(dom: &D, node: &D::Node, name: &str) -> bool {
    dom.attribute(node, name).as_deref() == Some("true")
}

/// Write an ARIA boolean attribute.
pub fn write_aria_bool<D: Dom>(dom: &mut D, node: &D::Node, name: &str, value: bool) {
    dom.set_attribute(node, name, aria_bool(value));
}

/// Make a non-interactive container a legal programmatic focus target.
pub fn make_programmatically_focusable<D: Dom>(dom: &mut D, node: &D::Node) {
    dom.set_attribute(node, TABINDEX, PROGRAMMATIC_FOCUS);
}
