//! Cleanup passes over a parsed fragment.
//!
//! Each pass mutates the document in place and returns how many elements
//! it touched, so the caller can log what happened.

use dom_query::{Document, Selection};

use crate::dom;
use crate::patterns::{
    ATTRIBUTION_CANDIDATE_SELECTOR, BLANK_LINE, CENTERED_SELECTOR, CHAPTER_TITLE_SELECTOR,
    DECORATION, EMBEDDED_CODE_SELECTOR, EMPTY_CANDIDATE_SELECTOR, PART_MARKER_SELECTOR,
    PART_PREFIX, PART_WRAPPER_TAGS, PRESENTATION_ATTRIBUTES, WHITESPACE_RUN, WIDGET_SELECTOR,
};

/// Keywords of the prev/next navigation banners. Two of three mark one.
const NAVIGATION_KEYWORDS: &[&str] = &["previous", "next", "table of contents"];

/// Number of trailing centered paragraphs dropped by [`remove_trailing_centered`].
const TRAILING_CENTERED_COUNT: usize = 3;

/// Pass 1: social-share and reaction widgets, plus scripts, styles and frames.
pub fn remove_widgets(doc: &Document) -> usize {
    let mut count = 0;
    for selector in [WIDGET_SELECTOR, EMBEDDED_CODE_SELECTOR] {
        let widgets = doc.select(selector);
        count += widgets.length();
        widgets.remove();
    }
    count
}

/// Pass 2: the in-body copy of the chapter title.
///
/// "Part N" markers share the title's styling and are skipped; pass 4
/// turns them into subheadings instead.
pub fn remove_chapter_title(doc: &Document) -> usize {
    let title = doc
        .select(CHAPTER_TITLE_SELECTOR)
        .iter()
        .find(|el| !PART_PREFIX.is_match(dom::text_content(el).trim()));

    match title {
        Some(title) => {
            dom::remove(&title);
            1
        }
        None => 0,
    }
}

/// Pass 3: bare attribution lines naming the site.
///
/// Decorative characters are stripped from both sides before comparing,
/// and the comparison ignores ASCII case.
pub fn remove_attribution_lines(doc: &Document, site_domain: &str) -> usize {
    let domain = strip_decoration(site_domain);
    if domain.is_empty() {
        return 0;
    }

    let mut removed = 0;
    for el in doc.select(ATTRIBUTION_CANDIDATE_SELECTOR).iter() {
        if !dom::is_attached(&el) {
            continue;
        }
        if strip_decoration(&dom::text_content(&el)).eq_ignore_ascii_case(&domain) {
            dom::remove(&el);
            removed += 1;
        }
    }
    removed
}

fn strip_decoration(text: &str) -> String {
    DECORATION.replace_all(text, "").trim().to_string()
}

/// Pass 4: "Part N" markers become `<h3>` subheadings.
///
/// The marker's wrapper chain is climbed while each wrapper holds nothing
/// but the marker text, and the outermost such wrapper is replaced.
pub fn promote_part_markers(doc: &Document) -> usize {
    let mut promoted = 0;
    for marker in doc.select(PART_MARKER_SELECTOR).iter() {
        if !dom::is_attached(&marker) {
            continue;
        }
        let text = dom::text_content(&marker).trim().to_string();
        if !PART_PREFIX.is_match(&text) {
            continue;
        }

        let target = outermost_wrapper(&marker, &text);
        dom::replace_with_html(&target, &format!("<h3>{}</h3>", dom::escape_text(&text)));
        promoted += 1;
    }
    promoted
}

fn outermost_wrapper<'a>(marker: &Selection<'a>, text: &str) -> Selection<'a> {
    let mut target = marker.clone();
    loop {
        let parent = dom::parent(&target);
        let is_wrapper = dom::tag_name(&parent).is_some_and(|t| PART_WRAPPER_TAGS.contains(&t.as_str()));
        if !is_wrapper || dom::text_content(&parent).trim() != text {
            return target;
        }
        target = parent;
    }
}

/// Pass 5: blocks with neither text nor images.
///
/// Runs children first, so a wrapper emptied by removing its children is
/// removed too.
pub fn remove_empty_elements(doc: &Document) -> usize {
    let candidates = doc.select(EMPTY_CANDIDATE_SELECTOR).nodes().to_vec();

    let mut removed = 0;
    for node in candidates.into_iter().rev() {
        let el = Selection::from(node);
        if !dom::is_attached(&el) {
            continue;
        }
        if dom::text_content(&el).trim().is_empty() && !el.select("img").exists() {
            dom::remove(&el);
            removed += 1;
        }
    }
    removed
}

/// Pass 6: centered Patreon plugs and prev/next navigation banners.
///
/// Matches against markup, so a link whose only Patreon mention is its
/// `href` counts, as does an image-only banner.
pub fn remove_navigation_banners(doc: &Document) -> usize {
    let mut removed = 0;
    for el in doc.select(CENTERED_SELECTOR).iter() {
        if is_navigation_banner(&dom::inner_html(&el)) {
            dom::remove(&el);
            removed += 1;
        }
    }
    removed
}

/// Whether centered markup reads like a Patreon plug or a navigation banner.
#[must_use]
pub fn is_navigation_banner(markup: &str) -> bool {
    let lower = markup.to_lowercase();
    if lower.contains("patreon") {
        return true;
    }
    NAVIGATION_KEYWORDS.iter().filter(|k| lower.contains(*k)).count() >= 2
}

/// Pass 7: the last three centered paragraphs, when at least three remain.
///
/// Position-based heuristic for trailing credits that slip past pass 6.
/// It can drop legitimate centered text at the end of a post.
pub fn remove_trailing_centered(doc: &Document) -> usize {
    let centered = doc.select(CENTERED_SELECTOR).nodes().to_vec();
    if centered.len() < TRAILING_CENTERED_COUNT {
        return 0;
    }

    for node in &centered[centered.len() - TRAILING_CENTERED_COUNT..] {
        dom::remove(&Selection::from(*node));
    }
    TRAILING_CENTERED_COUNT
}

/// Pass 9: presentation attributes on every element except images.
pub fn strip_presentation_attributes(doc: &Document) -> usize {
    let mut stripped = 0;
    for el in doc.select("*").iter() {
        if dom::is_tag(&el, "img") {
            continue;
        }
        for attr in PRESENTATION_ATTRIBUTES {
            if el.has_attr(attr) {
                dom::remove_attribute(&el, attr);
                stripped += 1;
            }
        }
    }
    stripped
}

/// Pass 10: collapse whitespace runs and delete blank lines.
#[must_use]
pub fn collapse_whitespace(html: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(html, " ");
    BLANK_LINE.replace_all(&collapsed, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(doc: &Document) -> String {
        dom::fragment_html(doc)
    }

    #[test]
    fn test_remove_widgets() {
        let doc = dom::parse(r#"<div class="sharethis-inline-reaction-buttons">x</div><p>keep</p>"#);
        assert_eq!(remove_widgets(&doc), 1);
        assert_eq!(html(&doc), "<p>keep</p>");
    }

    #[test]
    fn test_remove_widgets_drops_embedded_code() {
        let doc = dom::parse(
            r#"<p>Story</p><script>if (a < b && c) { x(); }</script><style>p > b { color: red; }</style><noscript><img src="t.gif"></noscript><iframe src="https://ads.example/"></iframe>"#,
        );
        assert_eq!(remove_widgets(&doc), 4);
        assert_eq!(html(&doc), "<p>Story</p>");
    }

    #[test]
    fn test_remove_chapter_title_only_first() {
        let doc = dom::parse(
            r#"<h4 style="text-align: center">Chapter 1</h4><p>a</p><h4 style="text-align: center">Again</h4>"#,
        );
        assert_eq!(remove_chapter_title(&doc), 1);
        let out = html(&doc);
        assert!(!out.contains("Chapter 1"));
        assert!(out.contains("Again"));
    }

    #[test]
    fn test_remove_chapter_title_skips_part_markers() {
        let doc = dom::parse(
            r#"<p><span style="font-weight: 800">Part 1</span></p><h4 style="text-align: center">Chapter 2</h4>"#,
        );
        assert_eq!(remove_chapter_title(&doc), 1);
        let out = html(&doc);
        assert!(out.contains("Part 1"));
        assert!(!out.contains("Chapter 2"));
    }

    #[test]
    fn test_remove_attribution_lines() {
        let doc = dom::parse(
            "<p>—> SeireiTranslations.blogspot.com <—</p>\
             <p>Read at seireitranslations.blogspot.com for more</p>\
             <div>| seireitranslations.blogspot.com |</div>",
        );
        assert_eq!(remove_attribution_lines(&doc, "seireitranslations.blogspot.com"), 2);
        assert!(html(&doc).contains("for more"));
    }

    #[test]
    fn test_promote_bold_in_span_in_paragraph() {
        let doc = dom::parse(r#"<p><span><b> Part 3 </b></span></p><p>text</p>"#);
        assert_eq!(promote_part_markers(&doc), 1);
        assert_eq!(html(&doc), "<h3>Part 3</h3><p>text</p>");
    }

    #[test]
    fn test_promote_bold_in_div() {
        let doc = dom::parse(r#"<div><strong>PART 4</strong></div>"#);
        promote_part_markers(&doc);
        assert_eq!(html(&doc), "<h3>PART 4</h3>");
    }

    #[test]
    fn test_promote_keeps_surrounding_text() {
        let doc = dom::parse(r#"<p>Intro <b>Part 5</b></p>"#);
        promote_part_markers(&doc);
        let out = html(&doc);
        assert!(out.contains("Intro"));
        assert!(out.contains("<h3>Part 5</h3>"));
        assert!(!out.contains("<b>"));
    }

    #[test]
    fn test_no_promotion_without_part_prefix() {
        let doc = dom::parse(r#"<p><b>Partial eclipse</b></p>"#);
        assert_eq!(promote_part_markers(&doc), 0);
    }

    #[test]
    fn test_remove_empty_elements_keeps_images() {
        let doc = dom::parse(
            r#"<p> </p><p><br></p><div><span></span></div><p><img src="a.png"></p><h2>t</h2>"#,
        );
        remove_empty_elements(&doc);
        assert_eq!(html(&doc), r#"<p><img src="a.png"></p><h2>t</h2>"#);
    }

    #[test]
    fn test_navigation_banner_detection() {
        assert!(is_navigation_banner("Support us on Patreon!"));
        assert!(is_navigation_banner("Previous | Table of Contents"));
        assert!(is_navigation_banner("PREVIOUS CHAPTER - NEXT CHAPTER"));
        assert!(!is_navigation_banner("Next time, he said."));
        assert!(is_navigation_banner(r#"<a href="https://www.patreon.com/seireitl">Support us</a>"#));
    }

    #[test]
    fn test_remove_patreon_link_banners() {
        let doc = dom::parse(
            r#"<p>Story</p><p style="text-align: center"><a href="https://www.patreon.com/seireitl">Support us</a></p><p style="text-align: center"><a href="https://www.patreon.com/seireitl"><img src="https://x.example/support.png"></a></p>"#,
        );
        assert_eq!(remove_navigation_banners(&doc), 2);
        assert_eq!(html(&doc), "<p>Story</p>");
    }

    #[test]
    fn test_remove_navigation_banners_only_centered() {
        let doc = dom::parse(
            r#"<p style="text-align: center">Previous - Next</p><p>Previous and next, she said.</p>"#,
        );
        assert_eq!(remove_navigation_banners(&doc), 1);
        assert_eq!(html(&doc), "<p>Previous and next, she said.</p>");
    }

    #[test]
    fn test_remove_trailing_centered() {
        let doc = dom::parse(
            r#"<p style="text-align: center">a</p><p>body</p>
               <p style="text-align:center">b</p><p align="center">c</p><p style="text-align: center">d</p>"#,
        );
        assert_eq!(remove_trailing_centered(&doc), 3);
        let out = html(&doc);
        assert!(out.contains(">a<"));
        assert!(!out.contains(">b<"));
        assert!(!out.contains(">d<"));
    }

    #[test]
    fn test_remove_trailing_centered_needs_three() {
        let doc = dom::parse(r#"<p style="text-align: center">a</p><p style="text-align: center">b</p>"#);
        assert_eq!(remove_trailing_centered(&doc), 0);
    }

    #[test]
    fn test_strip_presentation_attributes_skips_images() {
        let doc = dom::parse(
            r#"<p style="color:red" align="left" class="x">t</p><img src="a.png" style="max-width: 100%;">"#,
        );
        assert_eq!(strip_presentation_attributes(&doc), 2);
        assert_eq!(
            html(&doc),
            r#"<p class="x">t</p><img src="a.png" style="max-width: 100%;">"#
        );
        assert_eq!(strip_presentation_attributes(&doc), 0);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("<p>a   b</p>\n\n  \n<p>c</p>"), "<p>a b</p> <p>c</p>");
        assert_eq!(collapse_whitespace("<p>x</p>\n<p>y</p>"), "<p>x</p>\n<p>y</p>");
    }
}
