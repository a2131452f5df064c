//! DOM Operations Adapter
//!
//! Thin layer over the `dom_query` crate exposing the tree operations the
//! locator and normalizer need: querying, attribute access, serialization,
//! ancestor walks, removal, replacement and subtree cloning.

// Re-export core types for external use
pub use dom_query::{Document, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Remove an attribute
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

/// Check the tag name of the first node in the selection.
#[must_use]
pub fn is_tag(sel: &Selection, tag: &str) -> bool {
    tag_name(sel).is_some_and(|t| t.eq_ignore_ascii_case(tag))
}

// === Text Content ===

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Get inner HTML content
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

// === Tree Navigation ===

/// Get parent element
#[inline]
#[must_use]
pub fn parent<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.parent()
}

/// All element ancestors, nearest first.
#[must_use]
pub fn ancestors<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    let mut found = Vec::new();
    let mut current = parent(sel);

    while current.exists() && tag_name(&current).is_some() {
        found.push(current.clone());
        current = parent(&current);
    }

    found
}

/// Whether `sel` is still connected to its document's `<html>` root.
///
/// Elements removed or replaced earlier in a pass stay reachable through
/// handles collected before the mutation; this tells them apart.
#[must_use]
pub fn is_attached(sel: &Selection) -> bool {
    ancestors(sel).iter().any(|a| is_tag(a, "html"))
}

/// Every element below `root`, in document order.
#[must_use]
pub fn descendants<'a>(root: &Selection<'a>) -> Vec<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .collect()
}

// === Identity ===

/// Structural identity of two element handles.
///
/// Two handles are the same element when their tag names and serialized
/// inner markup match. Node identity does not survive a subtree clone,
/// so this is the only comparison that works across one.
#[must_use]
pub fn same_element(a: &Selection, b: &Selection) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    match (tag_name(a), tag_name(b)) {
        (Some(ta), Some(tb)) if ta == tb => inner_html(a) == inner_html(b),
        _ => false,
    }
}

// === Tree Manipulation ===

/// Remove elements from tree
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Replace element with HTML
#[inline]
pub fn replace_with_html(sel: &Selection, html: &str) {
    sel.replace_with_html(html);
}

// === Parsing and Cloning ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Deep-clone the children of `sel` into a fresh document.
///
/// The clone's `<body>` stands in for `sel`; nothing in the new tree
/// shares node identity with the original.
#[must_use]
pub fn clone_contents(sel: &Selection) -> Document {
    parse(&inner_html(sel))
}

/// Serialized markup of a parsed fragment (the body's inner HTML).
#[must_use]
pub fn fragment_html(doc: &Document) -> String {
    let body = doc.select("body");
    if body.exists() {
        inner_html(&body).to_string()
    } else {
        doc.html().to_string()
    }
}

/// Escape text for safe inclusion in markup.
#[must_use]
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
