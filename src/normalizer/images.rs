//! Pass 8: image conversion.
//!
//! Remote image references are fetched through the [`ImageResolver`] and
//! rewritten to local asset hrefs. An image that cannot be embedded is
//! dropped from the fragment, together with any link that wraps it.

use dom_query::{Document, Selection};

use crate::dom;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::images::{is_local_href, ImageResolver};
use crate::patterns::{IMAGE_SIZING_ATTRIBUTES, RESPONSIVE_IMAGE_STYLE};
use crate::url_utils::{is_image_link, resolve_url};

/// Counters for one conversion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageStats {
    pub embedded: usize,
    pub dropped: usize,
}

/// Convert every image in `doc`, linked images first.
///
/// Failures are described in `warnings` and never abort the pass.
pub fn convert_images<F: Fetch>(
    doc: &Document,
    page_url: &str,
    resolver: &mut ImageResolver<F>,
    warnings: &mut Vec<String>,
) -> ImageStats {
    let mut stats = ImageStats::default();

    for link in doc.select("a").iter() {
        if !dom::is_attached(&link) || !link.select("img").exists() {
            continue;
        }
        let href = dom::get_attribute(&link, "href").unwrap_or_default();
        if !is_image_link(&href) {
            // Not a link to a larger version; the bare image pass handles it.
            continue;
        }

        let img = link.select("img").first();
        match embed(&href, page_url, resolver) {
            Ok(local) => {
                apply_local_source(&img, &local);
                dom::replace_with_html(&link, &dom::inner_html(&link));
                stats.embedded += 1;
            }
            Err(reason) => {
                warnings.push(format!("dropped linked image {href}: {reason}"));
                dom::remove(&link);
                stats.dropped += 1;
            }
        }
    }

    for img in doc.select("img").iter() {
        if !dom::is_attached(&img) {
            continue;
        }
        let src = dom::get_attribute(&img, "src").unwrap_or_default();
        if is_local_href(&src) {
            continue;
        }

        match embed(&src, page_url, resolver) {
            Ok(local) => {
                apply_local_source(&img, &local);
                stats.embedded += 1;
            }
            Err(reason) => {
                warnings.push(format!("dropped image {src:?}: {reason}"));
                drop_image(&img);
                stats.dropped += 1;
            }
        }
    }

    stats
}

fn embed<F: Fetch>(reference: &str, page_url: &str, resolver: &mut ImageResolver<F>) -> Result<String> {
    let url = resolve_url(reference, page_url)?;
    resolver.resolve(&url).inspect_err(|err| {
        tracing::warn!(url = %url, error = %err, "error downloading image");
    })
}

fn apply_local_source(img: &Selection, local: &str) {
    dom::set_attribute(img, "src", local);
    for attr in IMAGE_SIZING_ATTRIBUTES {
        dom::remove_attribute(img, attr);
    }
    dom::set_attribute(img, "style", RESPONSIVE_IMAGE_STYLE);
}

/// Remove an image, and its link when the link holds nothing else.
fn drop_image(img: &Selection) {
    let parent = dom::parent(img);
    dom::remove(img);
    if dom::is_tag(&parent, "a") && dom::text_content(&parent).trim().is_empty() && !parent.select("img").exists() {
        dom::remove(&parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fetch::Fetched;

    struct StubFetcher;

    impl Fetch for StubFetcher {
        fn fetch(&self, url: &str, _cache_key: Option<&str>) -> Result<Fetched> {
            if url.contains("broken") {
                return Err(Error::HttpStatus {
                    url: url.to_string(),
                    status: 500,
                });
            }
            Ok(Fetched {
                bytes: vec![0xFF, 0xD8],
                content_type: None,
            })
        }
    }

    fn convert(html: &str) -> (String, ImageStats, Vec<String>) {
        let doc = dom::parse(html);
        let mut resolver = ImageResolver::new(StubFetcher);
        let mut warnings = Vec::new();
        let stats = convert_images(&doc, "https://site.example/2020/01/ch1.html", &mut resolver, &mut warnings);
        (dom::fragment_html(&doc), stats, warnings)
    }

    #[test]
    fn test_linked_image_prefers_link_target_and_unwraps() {
        let (html, stats, _) = convert(
            r#"<a href="https://cdn.example/full.png"><img src="https://cdn.example/thumb.png" width="200" height="100" data-original-width="800"></a>"#,
        );
        assert_eq!(stats.embedded, 1);
        assert!(!html.contains("<a"));
        assert!(!html.contains(r#"width="200""#));
        assert!(!html.contains("data-original-width"));
        assert!(html.contains(r#"src="../images/image_0001.png""#));
        assert!(html.contains("max-width: 100%; height: auto;"));
    }

    #[test]
    fn test_relative_source_is_resolved() {
        let (html, stats, warnings) = convert(r#"<p><img src="/img/a.gif" border="0"></p>"#);
        assert_eq!(stats, ImageStats { embedded: 1, dropped: 0 });
        assert!(warnings.is_empty());
        assert!(html.contains("../images/image_0001.gif"));
        assert!(!html.contains("border"));
    }

    #[test]
    fn test_non_image_link_is_kept() {
        let (html, _, _) = convert(r#"<a href="https://site.example/next"><img src="b.jpg"></a>"#);
        assert!(html.contains(r#"href="https://site.example/next""#));
        assert!(html.contains("../images/image_0001.jpg"));
    }

    #[test]
    fn test_failed_image_is_dropped_with_warning() {
        let (html, stats, warnings) = convert(
            r#"<p>text<img src="https://cdn.example/broken.png"></p><a href="https://cdn.example/broken.jpg"><img src="x.jpg"></a>"#,
        );
        assert_eq!(stats.dropped, 2);
        assert_eq!(warnings.len(), 2);
        assert!(!html.contains("<img"));
        assert!(!html.contains("<a"));
        assert!(html.contains("text"));
    }

    #[test]
    fn test_missing_source_is_dropped() {
        let (html, stats, _) = convert(r#"<p><img alt="nothing"></p>"#);
        assert_eq!(stats.dropped, 1);
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_local_images_are_left_alone() {
        let (html, stats, _) = convert(r#"<img src="../images/image_0009.png" style="max-width: 100%; height: auto;">"#);
        assert_eq!(stats, ImageStats::default());
        assert!(html.contains("image_0009.png"));
    }
}
