//! Selector Infrastructure
//!
//! Rules are plain predicate functions over a `Selection`. The locator uses
//! them to recognize containers while walking up from an anchor element.

use dom_query::Selection;

use crate::dom;

pub mod rules;

/// A selector rule that tests if a selection matches certain criteria
pub type Rule = fn(&Selection) -> bool;

/// Nearest ancestor of `sel` matching `rule`.
///
/// # Example
///
/// ```rust
/// use seirei_epub::{dom, selector};
///
/// let doc = dom::parse(r#"<div class="post-body"><div><h4>t</h4></div></div>"#);
/// let h4 = doc.select("h4");
///
/// let wrapper = selector::closest_ancestor(&h4, selector::rules::is_article_body);
/// assert!(wrapper.is_some());
/// ```
#[must_use]
pub fn closest_ancestor<'a>(sel: &Selection<'a>, rule: Rule) -> Option<Selection<'a>> {
    dom::ancestors(sel).into_iter().find(|a| rule(a))
}

/// First element below `root` matched by any of `selectors`, tried in order.
///
/// Returns the selector that matched alongside the element, so callers can
/// find the same element again in a cloned tree.
#[must_use]
pub fn first_match<'a, 's>(
    root: &Selection<'a>,
    selectors: &[&'s str],
) -> Option<(&'s str, Selection<'a>)> {
    selectors.iter().find_map(|css| {
        let found = root.select(css).first();
        found.exists().then_some((*css, found))
    })
}
