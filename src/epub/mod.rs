//! Book packaging.
//!
//! [`Packager`] is the capability the pipeline hands finished chapters to.
//! [`EpubPackager`] implements it as an EPUB 2 container.

use std::path::Path;

use crate::entries::SourceEntry;
use crate::error::Result;

mod writer;
mod xhtml;

pub use writer::EpubPackager;
pub use xhtml::{escape_xml, to_xhtml};

/// Stylesheet embedded in every book.
pub const DEFAULT_STYLESHEET: &str = include_str!("../../assets/styles.css");

/// Title of the chapter crediting the translators and listing the source pages.
pub const SOURCES_TITLE: &str = "Attribution and Sources";

/// Translation group credited in the sources chapter.
pub const TRANSLATOR_CREDIT: &str = "SeireiTranslations";

/// Support links listed in the sources chapter, as `(label, url)`.
pub const SUPPORT_LINKS: &[(&str, &str)] = &[
    ("Support on Ko-Fi", "https://ko-fi.com/seireitranslations"),
    ("Support on Patreon", "https://www.patreon.com/seireitl"),
];

/// Handle to a stylesheet added to a book, usable from chapter documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetRef {
    href: String,
}

impl StylesheetRef {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// Path relative to a chapter document.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }
}

/// Output container for one book.
///
/// The title and author are fixed when the packager is created.
pub trait Packager {
    /// Set the cover image. `source_url` only supplies the file extension.
    fn set_cover(&mut self, bytes: Vec<u8>, source_url: &str) -> Result<()>;

    fn add_stylesheet(&mut self, css: &[u8]) -> Result<StylesheetRef>;

    /// Embed an image under `name`, returning its href from chapter documents.
    fn add_image(&mut self, name: &str, bytes: Vec<u8>) -> Result<String>;

    /// Append a chapter. `body` is HTML markup without the title heading.
    fn add_chapter(&mut self, title: &str, body: &str, stylesheet: Option<&StylesheetRef>) -> Result<()>;

    /// Write the finished book to `output`.
    fn write(&mut self, output: &Path) -> Result<()>;
}

/// Body of the attribution chapter: the translator credit, support links,
/// and every source entry in input order.
#[must_use]
pub fn sources_body(entries: &[SourceEntry]) -> String {
    let mut body = String::from("<div class=\"attribution\">\n");
    body.push_str(&format!(
        "<p>This e-book contains content translated by <strong>{}</strong>.</p>\n",
        escape_xml(TRANSLATOR_CREDIT)
    ));

    body.push_str("<h3>Support the Translators</h3>\n");
    body.push_str(
        "<p>If you enjoy this translation, please consider supporting the translators \
         to help them continue their work:</p>\n<ul>\n",
    );
    for (label, url) in SUPPORT_LINKS {
        body.push_str(&format!("<li><a href=\"{}\">{}</a></li>\n", escape_xml(url), escape_xml(label)));
    }
    body.push_str("</ul>\n");

    body.push_str("<h3>Original Content Sources</h3>\n");
    body.push_str("<p>The content in this e-book was sourced from the following links:</p>\n<ul>\n");
    for entry in entries {
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_xml(&entry.url),
            escape_xml(&entry.title)
        ));
    }
    body.push_str("</ul>\n</div>\n");
    body
}

/// Media type for a package file, by extension.
#[must_use]
pub fn media_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "css" => "text/css",
        "xhtml" => "application/xhtml+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_types() {
        assert_eq!(media_type("image_0001.JPG"), "image/jpeg");
        assert_eq!(media_type("cover.png"), "image/png");
        assert_eq!(media_type("a.svg"), "image/svg+xml");
        assert_eq!(media_type("noext"), "application/octet-stream");
    }

    #[test]
    fn test_sources_body_escapes() {
        let body = sources_body(&[SourceEntry::new("Ch <1>", "http://x/a?b=1&c=2")]);
        assert!(body.contains("Ch &lt;1&gt;"));
        assert!(body.contains(r#"href="http://x/a?b=1&amp;c=2""#));
    }

    #[test]
    fn test_sources_body_credits_translators() {
        let body = sources_body(&[SourceEntry::new("Ch1", "http://x/a")]);
        assert!(body.contains("<strong>SeireiTranslations</strong>"));
        assert!(body.contains(r#"<a href="https://ko-fi.com/seireitranslations">Support on Ko-Fi</a>"#));
        assert!(body.contains(r#"<a href="https://www.patreon.com/seireitl">Support on Patreon</a>"#));

        let support = body.find("Support the Translators").unwrap();
        let sources = body.find("Original Content Sources").unwrap();
        let entry = body.find(r#"<a href="http://x/a">Ch1</a>"#).unwrap();
        assert!(support < sources && sources < entry);
    }

    #[test]
    fn test_default_stylesheet_is_embedded() {
        assert!(DEFAULT_STYLESHEET.contains("img"));
    }
}
