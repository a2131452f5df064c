//! Content Normalizer
//!
//! Turns a located fragment into e-reader-safe markup. The passes run in a
//! fixed order because later passes depend on earlier ones:
//!
//! 1. non-content widgets
//! 2. the in-body chapter title
//! 3. attribution lines naming the site
//! 4. "Part N" markers promoted to `<h3>`
//! 5. elements with neither text nor images
//! 6. centered Patreon plugs and prev/next banners
//! 7. the last three centered paragraphs (heuristic)
//! 8. image conversion to local assets
//! 9. presentation attributes (images excepted)
//! 10. whitespace collapsing
//!
//! Images must still be in place during pass 5 so image-only paragraphs
//! survive, and centered styling must still be present for passes 6 and 7.

use tracing::debug;

use crate::debug::DebugDump;
use crate::dom;
use crate::fetch::Fetch;
use crate::images::ImageResolver;
use crate::locator::PageContext;
use crate::options::Options;

pub mod images;
pub mod passes;

pub use images::ImageStats;

/// Cleaned markup for one page, plus anything worth reporting about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFragment {
    pub html: String,
    /// Non-fatal problems, such as images that could not be embedded.
    pub warnings: Vec<String>,
    pub images: ImageStats,
}

impl NormalizedFragment {
    /// Whether the fragment carries any markup at all.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.html.trim().is_empty()
    }
}

/// Runs the cleanup passes over located fragments.
#[derive(Debug, Clone)]
pub struct Normalizer {
    site_domain: String,
    dump: DebugDump,
}

impl Normalizer {
    #[must_use]
    pub fn new(options: &Options, dump: DebugDump) -> Self {
        Self {
            site_domain: options.site_domain.clone(),
            dump,
        }
    }

    /// Normalize `fragment`, embedding its images through `resolver`.
    ///
    /// Blank input is returned unchanged. Image failures end up in
    /// [`NormalizedFragment::warnings`] and never abort normalization.
    pub fn normalize<F: Fetch>(
        &self,
        fragment: &str,
        page: PageContext<'_>,
        resolver: &mut ImageResolver<F>,
    ) -> NormalizedFragment {
        if fragment.trim().is_empty() {
            return NormalizedFragment {
                html: fragment.to_string(),
                ..NormalizedFragment::default()
            };
        }

        let doc = dom::parse(fragment);

        let widgets = passes::remove_widgets(&doc);
        let titles = passes::remove_chapter_title(&doc);
        let attributions = passes::remove_attribution_lines(&doc, &self.site_domain);
        let parts = passes::promote_part_markers(&doc);
        let empties = passes::remove_empty_elements(&doc);
        let banners = passes::remove_navigation_banners(&doc);
        let trailing = passes::remove_trailing_centered(&doc);
        debug!(
            url = %page.url,
            widgets, titles, attributions, parts, empties, banners, trailing,
            "boilerplate removed"
        );
        self.dump.save(page.line, "cleaned", &dom::fragment_html(&doc), page.url);

        let mut warnings = Vec::new();
        let images = images::convert_images(&doc, page.url, resolver, &mut warnings);
        debug!(url = %page.url, embedded = images.embedded, dropped = images.dropped, "images converted");

        passes::strip_presentation_attributes(&doc);
        let html = passes::collapse_whitespace(&dom::fragment_html(&doc));
        self.dump.save(page.line, "normalized", &html, page.url);

        NormalizedFragment { html, warnings, images }
    }
}
