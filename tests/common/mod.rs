//! In-memory doubles for the fetch and packaging capabilities.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use seirei_epub::{Error, Fetch, Fetched, Options, Packager, Result, StylesheetRef};

/// Serves registered URLs from memory; everything else is a 404.
#[derive(Default)]
pub struct MemoryFetcher {
    resources: HashMap<String, Vec<u8>>,
    pub calls: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.resources.insert(url.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|u| *u == url).count()
    }
}

impl Fetch for MemoryFetcher {
    fn fetch(&self, url: &str, _cache_key: Option<&str>) -> Result<Fetched> {
        self.calls.borrow_mut().push(url.to_string());
        match self.resources.get(url) {
            Some(bytes) => Ok(Fetched {
                bytes: bytes.clone(),
                content_type: None,
            }),
            None => Err(Error::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Records everything handed to it.
#[derive(Default, Debug)]
pub struct RecordingPackager {
    pub cover: Option<(Vec<u8>, String)>,
    pub stylesheets: usize,
    pub images: Vec<String>,
    pub chapters: Vec<(String, String)>,
    pub written: Option<PathBuf>,
    /// Chapter titles whose addition fails.
    pub reject: Vec<String>,
}

impl RecordingPackager {
    pub fn titles(&self) -> Vec<&str> {
        self.chapters.iter().map(|(t, _)| t.as_str()).collect()
    }

    pub fn body(&self, title: &str) -> &str {
        self.chapters
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, b)| b.as_str())
            .unwrap_or_default()
    }
}

impl Packager for RecordingPackager {
    fn set_cover(&mut self, bytes: Vec<u8>, source_url: &str) -> Result<()> {
        self.cover = Some((bytes, source_url.to_string()));
        Ok(())
    }

    fn add_stylesheet(&mut self, _css: &[u8]) -> Result<StylesheetRef> {
        self.stylesheets += 1;
        Ok(StylesheetRef::new("../styles/stylesheet.css"))
    }

    fn add_image(&mut self, name: &str, _bytes: Vec<u8>) -> Result<String> {
        self.images.push(name.to_string());
        Ok(format!("../images/{name}"))
    }

    fn add_chapter(&mut self, title: &str, body: &str, _stylesheet: Option<&StylesheetRef>) -> Result<()> {
        if self.reject.iter().any(|t| t == title) {
            return Err(Error::Package(format!("rejected {title}")));
        }
        self.chapters.push((title.to_string(), body.to_string()));
        Ok(())
    }

    fn write(&mut self, output: &Path) -> Result<()> {
        self.written = Some(output.to_path_buf());
        Ok(())
    }
}

/// Options with no throttling and no sources chapter.
pub fn quiet_options() -> Options {
    Options {
        request_delay: Duration::ZERO,
        include_sources: false,
        ..Options::default()
    }
}

/// A page in the shape the locator's anchor strategy expects.
pub fn chapter_page(title: &str, body: &str) -> String {
    format!(
        r#"<html><body>
<div class="sidebar">Blog archive</div>
<div class="post-body entry-content">
  <p>Translator note</p>
  <h4 style="text-align: center;">{title}</h4>
  {body}
  <p style="text-align: center">Previous | Table of Contents | Next</p>
</div>
</body></html>"#
    )
}
