//! Whole-body fallback.

use dom_query::Document;
use tracing::debug;

use super::Extraction;
use crate::dom;
use crate::patterns::{MAIN_CONTENT_SELECTOR, NAVIGATION_BLOCK_SELECTOR};

/// The main content container, verbatim except for navigation and footer
/// sub-containers.
pub(super) fn whole_body(doc: &Document) -> Extraction {
    let main = doc.select(MAIN_CONTENT_SELECTOR).first();
    if !main.exists() {
        debug!(selector = MAIN_CONTENT_SELECTOR, "main content container not found");
        return Extraction::not_found();
    }

    let clone = dom::clone_contents(&main);
    clone.select(NAVIGATION_BLOCK_SELECTOR).remove();

    Extraction::found(dom::fragment_html(&clone))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_navigation_blocks() {
        let doc = dom::parse(
            r#"<div class="post-body">
                 <div class="post-header">Posted by</div>
                 <p>Story text</p>
                 <div class="post-footer">Labels</div>
                 <div class="post-bottom">Share</div>
               </div>"#,
        );
        let result = whole_body(&doc);

        assert!(result.found);
        assert!(result.fragment.contains("Story text"));
        assert!(!result.fragment.contains("Posted by"));
        assert!(!result.fragment.contains("Labels"));
        assert!(!result.fragment.contains("Share"));
    }

    #[test]
    fn test_leaves_source_document_untouched() {
        let doc = dom::parse(r#"<div class="post-body"><div class="post-footer">F</div><p>A</p></div>"#);
        let _ = whole_body(&doc);
        assert!(doc.select(".post-footer").exists());
    }

    #[test]
    fn test_first_container_only() {
        let doc = dom::parse(
            r#"<div class="post-body"><p>One</p></div><div class="post-body"><p>Two</p></div>"#,
        );
        let result = whole_body(&doc);
        assert!(result.fragment.contains("One"));
        assert!(!result.fragment.contains("Two"));
    }

    #[test]
    fn test_missing_container() {
        let doc = dom::parse("<div class=\"post-content\"><p>x</p></div>");
        assert!(!whole_body(&doc).found);
    }
}
