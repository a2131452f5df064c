//! # seirei-epub
//!
//! Turns an ordered list of blog-post pages into a chapterized EPUB.
//!
//! The interesting part is content extraction: the source site has changed
//! its markup many times, so the article body is found by an ordered list
//! of strategies, then cleaned of boilerplate and presentation noise so
//! that pages from different eras concatenate into uniform chapters.
//!
//! ## Quick Start
//!
//! ```rust
//! use seirei_epub::{extract_fragment, ImageResolver, Options};
//! # use seirei_epub::{Fetch, Fetched};
//! # struct Offline;
//! # impl Fetch for Offline {
//! #     fn fetch(&self, url: &str, _: Option<&str>) -> seirei_epub::Result<Fetched> {
//! #         Err(seirei_epub::Error::EmptyBody { url: url.to_string() })
//! #     }
//! # }
//!
//! let html = r#"<div class="post-body">
//!     <p>Translator notes</p>
//!     <h4 style="text-align: center">Chapter 1</h4>
//!     <p>It was a dark and stormy night.</p>
//! </div>"#;
//!
//! let mut images = ImageResolver::new(Offline);
//! let fragment = extract_fragment(html, "https://example.com/ch1", &Options::default(), &mut images)?;
//! assert_eq!(fragment.html.trim(), "<p>It was a dark and stormy night.</p>");
//! # Ok::<(), seirei_epub::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Locate**: [`PatternLocator`] tries each [`Strategy`] in priority
//!   order and keeps the first match.
//! - **Normalize**: [`Normalizer`] removes widgets, attribution lines and
//!   navigation banners, promotes "Part N" markers, embeds images and
//!   strips inline presentation.
//! - **Assemble**: [`ChapterAssembler`] merges consecutive pages with the
//!   same title into one chapter.
//! - **Package**: an [`EpubPackager`] writes the book.

mod error;
mod options;
mod patterns;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Selector rules for recognizing containers.
pub mod selector;

/// Ordered content-location strategies.
pub mod locator;

/// Cleanup passes and image conversion for located fragments.
pub mod normalizer;

/// Image fetching and the run-scoped asset registry.
pub mod images;

/// Merging of same-title pages into chapters.
pub mod assembler;

/// `Title::URL` entry lists.
pub mod entries;

/// Byte retrieval over HTTP with a debug cache.
pub mod fetch;

/// Character encoding detection and transcoding.
pub mod encoding;

/// URL utilities for resolution, extensions and file names.
pub mod url_utils;

/// EPUB packaging.
pub mod epub;

/// Debug snapshots of intermediate HTML.
pub mod debug;

/// The sequential conversion run.
pub mod pipeline;

// Public API - re-exports
pub use assembler::{Chapter, ChapterAssembler};
pub use debug::DebugDump;
pub use entries::{parse_entries, read_entries, SourceEntry};
pub use epub::{EpubPackager, Packager, StylesheetRef};
pub use error::{Error, Result};
pub use fetch::{Fetch, Fetched, HttpFetcher};
pub use images::{ImageAsset, ImageResolver};
pub use locator::{Extraction, PageContext, PatternLocator, Strategy};
pub use normalizer::{NormalizedFragment, Normalizer};
pub use options::{Options, DEFAULT_SITE_DOMAIN};
pub use pipeline::{BookSpec, Pipeline, RunReport, SkippedEntry};

/// Locate and normalize the article body of one page.
///
/// Images are embedded through `images`; drain them with
/// [`ImageResolver::take_new_assets`].
///
/// # Errors
///
/// Returns [`Error::ContentNotFound`] when no strategy locates a body.
pub fn extract_fragment<F: Fetch>(
    html: &str,
    page_url: &str,
    options: &Options,
    images: &mut ImageResolver<F>,
) -> Result<NormalizedFragment> {
    let dump = DebugDump::from_options(options);
    let doc = dom::parse(html);
    let page = PageContext { url: page_url, line: 0 };

    let extraction = PatternLocator::new(dump.clone()).locate(&doc, page);
    if !extraction.found {
        return Err(Error::ContentNotFound {
            url: page_url.to_string(),
        });
    }

    Ok(Normalizer::new(options, dump).normalize(&extraction.fragment, page, images))
}

/// Like [`extract_fragment`], but from raw bytes with encoding detection.
///
/// # Errors
///
/// Returns [`Error::ContentNotFound`] when no strategy locates a body.
pub fn extract_fragment_bytes<F: Fetch>(
    bytes: &[u8],
    content_type: Option<&str>,
    page_url: &str,
    options: &Options,
    images: &mut ImageResolver<F>,
) -> Result<NormalizedFragment> {
    let html = encoding::decode_page(bytes, content_type);
    extract_fragment(&html, page_url, options, images)
}
