//! Anchor-based strategies.
//!
//! Both strategies find a content-start anchor, pick a container above it,
//! clone the container, find the anchor again inside the clone, and delete
//! everything that precedes it in document order except the anchor's own
//! ancestors.

use dom_query::{Document, Selection};
use tracing::debug;

use super::{Extraction, PageContext};
use crate::debug::DebugDump;
use crate::dom;
use crate::patterns::{CHAPTER_TITLE_SELECTOR, SECONDARY_ANCHOR_SELECTORS};
use crate::selector::{self, rules};

/// Chapter-title anchor inside an article-body wrapper.
pub(super) fn anchor_descent(doc: &Document, page: PageContext<'_>, dump: &DebugDump) -> Extraction {
    let anchor = doc.select(CHAPTER_TITLE_SELECTOR).first();
    if !anchor.exists() {
        debug!(selector = CHAPTER_TITLE_SELECTOR, "title element not found");
        return Extraction::not_found();
    }
    dump.save(page.line, "title", &dom::inner_html(&anchor), page.url);

    let Some(container) = selector::closest_ancestor(&anchor, rules::is_article_body) else {
        debug!("no post-body/post-content wrapper above title element");
        return Extraction::not_found();
    };

    prune_before_anchor(&container, &anchor, CHAPTER_TITLE_SELECTOR, page, dump)
}

/// Any anchor rule; the nearest `div` or else the body as container.
pub(super) fn loose_container(doc: &Document, page: PageContext<'_>, dump: &DebugDump) -> Extraction {
    let root = doc.select("html");
    let rules_in_order: Vec<&str> = std::iter::once(CHAPTER_TITLE_SELECTOR)
        .chain(SECONDARY_ANCHOR_SELECTORS.iter().copied())
        .collect();

    let Some((anchor_css, anchor)) = selector::first_match(&root, &rules_in_order) else {
        debug!("could not find title element with any selector");
        return Extraction::not_found();
    };
    debug!(selector = anchor_css, "found title with fallback selector");

    let container = match selector::closest_ancestor(&anchor, rules::is_div) {
        Some(div) => {
            debug!("using fallback parent div");
            div
        }
        None => {
            let body = doc.select("body");
            if !body.exists() {
                debug!("could not find a suitable parent container");
                return Extraction::not_found();
            }
            debug!("using body as parent container");
            body
        }
    };

    prune_before_anchor(&container, &anchor, anchor_css, page, dump)
}

/// Clone `container`, relocate `anchor` in the clone by structural
/// identity, and delete every element before it that is neither the anchor
/// nor one of its ancestors. Elements holding another `anchor_css` match
/// are kept as well.
///
/// If the anchor cannot be relocated the result is not-found, so a
/// lower-priority strategy gets its turn.
fn prune_before_anchor(
    container: &Selection,
    anchor: &Selection,
    anchor_css: &str,
    page: PageContext<'_>,
    dump: &DebugDump,
) -> Extraction {
    let clone = dom::clone_contents(container);
    dump.save(page.line, "cloned_parent", &dom::fragment_html(&clone), page.url);

    let elements = dom::descendants(&clone.select("body"));
    let Some(anchor_index) = elements.iter().position(|el| dom::same_element(el, anchor)) else {
        debug!(selector = anchor_css, "could not find title element in cloned content");
        return Extraction::not_found();
    };

    let cloned_anchor = elements[anchor_index].clone();
    let anchor_ancestors = dom::ancestors(&cloned_anchor);
    let mut removed = 0usize;
    for el in &elements[..anchor_index] {
        if keeps_anchor(el, &cloned_anchor, &anchor_ancestors, anchor_css) {
            continue;
        }
        dom::remove(el);
        removed += 1;
    }
    debug!(removed, anchor_index, "removed elements before title");

    Extraction::found(dom::fragment_html(&clone))
}

fn keeps_anchor(el: &Selection, anchor: &Selection, anchor_ancestors: &[Selection], anchor_css: &str) -> bool {
    dom::same_element(el, anchor)
        || el.select(anchor_css).exists()
        || anchor_ancestors.iter().any(|a| dom::same_element(a, el))
}
