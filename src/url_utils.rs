//! URL Utility Functions
//!
//! Resolution of relative references against a page URL, image extension
//! detection, and file-name sanitizing for cache and snapshot files.

use std::path::Path;

use url::Url;

use crate::error::{Error, Result};
use crate::patterns::UNSAFE_FILENAME_CHAR;

/// Image extensions recognized in links and image sources.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Check if a string is a valid absolute http(s) URL.
#[must_use]
pub fn is_absolute_url(s: &str) -> bool {
    let s = s.trim();
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return false;
    }
    Url::parse(s).is_ok_and(|url| url.host().is_some())
}

/// Resolve a possibly relative reference against the page URL.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if the reference is empty or either
/// side fails to parse.
pub fn resolve_url(reference: &str, page_url: &str) -> Result<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(Error::InvalidUrl("empty URL".to_string()));
    }

    if is_absolute_url(reference) {
        return Url::parse(reference).map_err(|e| Error::InvalidUrl(format!("{reference}: {e}")));
    }

    let base = Url::parse(page_url).map_err(|e| Error::InvalidUrl(format!("{page_url}: {e}")))?;
    base.join(reference)
        .map_err(|e| Error::InvalidUrl(format!("{reference}: {e}")))
}

/// Lowercased image extension of a URL path, if it names an image file.
#[must_use]
pub fn image_extension(url: &Url) -> Option<String> {
    let ext = Path::new(url.path()).extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Whether a raw link target points at an image file.
///
/// Query strings and fragments are ignored. Relative targets are checked
/// on their path alone.
#[must_use]
pub fn is_image_link(href: &str) -> bool {
    let path = href
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e))
}

/// Extension (with leading dot) of the last path segment, or `""`.
#[must_use]
pub fn path_extension(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default();
    Path::new(last)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Safe file name: everything outside `[A-Za-z0-9_]` becomes `_`,
/// truncated to 50 characters.
#[must_use]
pub fn sanitize_filename(s: &str) -> String {
    let mut safe = UNSAFE_FILENAME_CHAR.replace_all(s, "_").into_owned();
    safe.truncate(50);
    safe
}
