//! Retrieval of raw bytes for pages, images and the cover.
//!
//! [`Fetch`] is the capability the rest of the crate depends on.
//! [`HttpFetcher`] implements it over a blocking `reqwest` client with an
//! optional on-disk cache used in debug mode.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::options::Options;

/// Bytes of a fetched resource plus the declared content type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Byte retrieval capability.
pub trait Fetch {
    /// Fetch `url`. With a `cache_key`, implementations may serve and store
    /// the bytes in a local cache.
    fn fetch(&self, url: &str, cache_key: Option<&str>) -> Result<Fetched>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str, cache_key: Option<&str>) -> Result<Fetched> {
        (**self).fetch(url, cache_key)
    }
}

/// HTTP fetcher with a fixed timeout and a debug-mode file cache.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    cache_dir: Option<PathBuf>,
}

impl HttpFetcher {
    /// Build a fetcher from run options.
    ///
    /// The cache is active only when `options.debug` is set.
    pub fn new(options: &Options) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(options.request_timeout)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            cache_dir: options.debug.then(|| options.work_dir.clone()),
        })
    }

    fn cache_path(&self, cache_key: Option<&str>) -> Option<PathBuf> {
        let key = cache_key.filter(|k| !k.is_empty())?;
        self.cache_dir.as_ref().map(|dir| dir.join(key))
    }

    fn download(&self, url: &str) -> Result<Fetched> {
        info!(url = %url, "downloading");
        let response = self.client.get(url).send().map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if bytes.is_empty() {
            return Err(Error::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(Fetched {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, cache_key: Option<&str>) -> Result<Fetched> {
        if url.trim().is_empty() {
            return Err(Error::InvalidUrl("empty URL provided".to_string()));
        }

        let cache_path = self.cache_path(cache_key);
        if let Some(path) = &cache_path {
            if let Ok(bytes) = std::fs::read(path) {
                debug!(path = %path.display(), "using cached file");
                return Ok(Fetched {
                    bytes,
                    content_type: None,
                });
            }
        }

        let fetched = self.download(url)?;

        if let Some(path) = &cache_path {
            match std::fs::write(path, &fetched.bytes) {
                Ok(()) => debug!(path = %path.display(), "cached file"),
                Err(err) => warn!(path = %path.display(), error = %err, "could not cache file"),
            }
        }

        Ok(fetched)
    }
}
