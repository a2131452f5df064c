//! Container rules for the source site's markup.

use dom_query::Selection;

use crate::dom;
use crate::patterns::ARTICLE_BODY_CLASSES;

/// A `div` carrying one of the article-body wrapper classes.
#[must_use]
pub fn is_article_body(sel: &Selection) -> bool {
    dom::is_tag(sel, "div") && ARTICLE_BODY_CLASSES.iter().any(|c| sel.has_class(c))
}

/// Any `div`.
#[must_use]
pub fn is_div(sel: &Selection) -> bool {
    dom::is_tag(sel, "div")
}
