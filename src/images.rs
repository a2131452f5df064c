//! Image resolution and the run-scoped asset registry.
//!
//! Each distinct absolute image URL is fetched once per run and given a
//! local name from a monotonic counter. Later references to the same URL
//! reuse the registered name. Names are unique within a run only; they are
//! not derived from content.

use std::collections::HashMap;

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::url_utils::image_extension;

/// Path prefix under which chapter documents see embedded images.
pub const ASSET_HREF_PREFIX: &str = "../images/";

/// An image fetched for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Absolute URL the bytes came from.
    pub source_url: String,
    /// File name inside the package, e.g. `image_0003.png`.
    pub local_name: String,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    /// Reference to this asset from a chapter document.
    #[must_use]
    pub fn href(&self) -> String {
        asset_href(&self.local_name)
    }
}

/// Reference to a local asset name from a chapter document.
#[must_use]
pub fn asset_href(local_name: &str) -> String {
    format!("{ASSET_HREF_PREFIX}{local_name}")
}

/// Whether an image source already points at a local asset.
#[must_use]
pub fn is_local_href(src: &str) -> bool {
    src.starts_with(ASSET_HREF_PREFIX)
}

/// Resolves image URLs to local asset names, fetching each URL once.
#[derive(Debug)]
pub struct ImageResolver<F> {
    fetcher: F,
    registry: HashMap<String, String>,
    pending: Vec<ImageAsset>,
    counter: usize,
}

impl<F: Fetch> ImageResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            registry: HashMap::new(),
            pending: Vec::new(),
            counter: 0,
        }
    }

    /// Local href for an absolute image URL.
    ///
    /// The first call for a URL fetches it and registers a new asset;
    /// later calls return the registered href without fetching.
    ///
    /// # Errors
    ///
    /// Fetch failures and empty bodies are returned to the caller, who
    /// decides what to do with the image. Nothing is registered then.
    pub fn resolve(&mut self, url: &Url) -> Result<String> {
        let key = registry_key(url);
        if let Some(local_name) = self.registry.get(&key) {
            debug!(url = %url, local_name = %local_name, "image already registered");
            return Ok(asset_href(local_name));
        }

        let ext = image_extension(url).unwrap_or_else(|| "jpg".to_string());
        let cache_key = format!("img_{}.{ext}", sha1_smol::Sha1::from(key.as_bytes()).hexdigest());

        let fetched = self.fetcher.fetch(url.as_str(), Some(&cache_key))?;
        if fetched.bytes.is_empty() {
            return Err(Error::EmptyBody {
                url: url.to_string(),
            });
        }

        self.counter += 1;
        let local_name = format!("image_{:04}.{ext}", self.counter);
        self.registry.insert(key, local_name.clone());

        let asset = ImageAsset {
            source_url: url.to_string(),
            local_name,
            bytes: fetched.bytes,
        };
        let href = asset.href();
        self.pending.push(asset);
        Ok(href)
    }

    /// Assets registered since the last call, in registration order.
    pub fn take_new_assets(&mut self) -> Vec<ImageAsset> {
        std::mem::take(&mut self.pending)
    }

    /// Number of distinct images registered in this run.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.registry.len()
    }
}

fn registry_key(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized.to_string()
}
