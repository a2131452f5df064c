//! Compiled regex patterns and CSS selectors for extraction and cleanup.
//!
//! All patterns are compiled once at first use via `LazyLock`.
//! Selectors describe the markup shapes the source site has used over time.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Anchor Selectors
// =============================================================================

/// The "chapter title" element marking the start of the article body.
///
/// Also used by the normalizer to drop the duplicated in-body title.
pub const CHAPTER_TITLE_SELECTOR: &str =
    "h4[style*=center]:first-of-type, p[style*=center]:first-of-type, p>span[style*='800']";

/// Weaker anchor rules tried when the chapter title selector finds nothing.
pub const SECONDARY_ANCHOR_SELECTORS: &[&str] = &[
    "h4[style*='text-align: center']",
    "div.separator h4",
    "div.separator span h4",
    "h4",
];

// =============================================================================
// Container Selectors
// =============================================================================

/// Classes identifying the article-body wrapper `div`.
pub const ARTICLE_BODY_CLASSES: &[&str] = &["post-body", "post-content"];

/// Main content container used by the whole-body fallback.
pub const MAIN_CONTENT_SELECTOR: &str = ".post-body";

/// Navigation and footer sub-containers stripped by the whole-body fallback.
pub const NAVIGATION_BLOCK_SELECTOR: &str = ".post-header, .post-footer, .post-bottom";

// =============================================================================
// Normalizer Selectors
// =============================================================================

/// Non-content widgets removed before anything else.
pub const WIDGET_SELECTOR: &str = ".sharethis-inline-reaction-buttons";

/// Embedded code and frames. Their raw contents are not valid XHTML text.
pub const EMBEDDED_CODE_SELECTOR: &str = "script, style, noscript, iframe";

/// Blocks that may carry a bare attribution line.
pub const ATTRIBUTION_CANDIDATE_SELECTOR: &str = "p, div";

/// Inline elements that may carry a "Part N" marker.
pub const PART_MARKER_SELECTOR: &str = "b, strong, span[style*='font-weight: 800'], span[style*='font-weight:800']";

/// Wrapper tags collapsed when a "Part N" marker is promoted.
pub const PART_WRAPPER_TAGS: &[&str] = &["p", "div", "span", "b", "strong"];

/// Block elements removed when they hold neither text nor images.
pub const EMPTY_CANDIDATE_SELECTOR: &str = "p, div, span, h1, h2, h3, h4, h5, h6";

/// Centered paragraphs, where the site puts navigation and credits.
pub const CENTERED_SELECTOR: &str =
    "p[style*='text-align: center'], p[style*='text-align:center'], p[align='center']";

/// Presentation attributes stripped from every element except images.
pub const PRESENTATION_ATTRIBUTES: &[&str] =
    &["style", "align", "width", "height", "border", "bgcolor", "color"];

/// Sizing attributes stripped from converted images.
pub const IMAGE_SIZING_ATTRIBUTES: &[&str] = &[
    "border",
    "data-original-height",
    "data-original-width",
    "height",
    "width",
];

/// Style set on every converted image.
pub const RESPONSIVE_IMAGE_STYLE: &str = "max-width: 100%; height: auto;";

// =============================================================================
// Text Patterns
// =============================================================================

/// Decorative characters wrapped around attribution lines.
pub static DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[—–\-<>|*]").expect("DECORATION regex"));

/// Leading "part " marker, case-insensitive.
pub static PART_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^part\s").expect("PART_PREFIX regex"));

/// Runs of two or more ASCII whitespace characters.
///
/// Ideographic and em spaces inside text are kept.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\s){2,}").expect("WHITESPACE_RUN regex"));

/// Lines holding only ASCII whitespace, with their line terminators.
pub static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?-u:\s)*$[\r\n]*").expect("BLANK_LINE regex"));

/// Characters not allowed in generated file names.
pub static UNSAFE_FILENAME_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("UNSAFE_FILENAME_CHAR regex"));
