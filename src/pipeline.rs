//! The sequential conversion run.
//!
//! For each entry, in input order: fetch, decode, parse, locate, normalize,
//! then feed the assembler, which hands closed chapters to the packager.
//! Entries are never fetched concurrently. A fixed delay follows every page
//! fetch.

use std::path::Path;

use tracing::{info, warn};

use crate::assembler::{Chapter, ChapterAssembler};
use crate::debug::DebugDump;
use crate::dom;
use crate::encoding::decode_page;
use crate::entries::SourceEntry;
use crate::epub::{sources_body, Packager, StylesheetRef, DEFAULT_STYLESHEET, SOURCES_TITLE};
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::images::ImageResolver;
use crate::locator::{PageContext, PatternLocator};
use crate::normalizer::{NormalizedFragment, Normalizer};
use crate::options::Options;
use crate::url_utils::{path_extension, sanitize_filename};

/// An entry that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// 1-based position in the entry list.
    pub position: usize,
    pub entry: SourceEntry,
    pub reason: String,
}

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub entries: usize,
    /// Entries whose content made it into a chapter.
    pub processed: usize,
    pub skipped: Vec<SkippedEntry>,
    /// Chapters handed to the packager, excluding the sources chapter.
    pub chapters: usize,
    pub images: usize,
    /// Non-fatal warnings from normalization and packaging.
    pub warnings: usize,
}

/// The book-level inputs of a run.
#[derive(Debug, Clone, Copy)]
pub struct BookSpec<'a> {
    pub cover_url: &'a str,
    pub output: &'a Path,
}

/// Drives one conversion run over a fetcher.
#[derive(Debug)]
pub struct Pipeline<F> {
    options: Options,
    fetcher: F,
    locator: PatternLocator,
    normalizer: Normalizer,
}

impl<F: Fetch> Pipeline<F> {
    #[must_use]
    pub fn new(options: Options, fetcher: F) -> Self {
        let dump = DebugDump::from_options(&options);
        Self {
            locator: PatternLocator::new(dump.clone()),
            normalizer: Normalizer::new(&options, dump),
            options,
            fetcher,
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Convert `entries` into a book and write it to `book.output`.
    ///
    /// # Errors
    ///
    /// Only setup and output failures are returned: the cover cannot be
    /// fetched or set, or the book cannot be written. Per-entry failures
    /// are logged and recorded in the report.
    pub fn run<P: Packager>(&self, book: BookSpec<'_>, entries: &[SourceEntry], packager: &mut P) -> Result<RunReport> {
        let mut report = RunReport {
            entries: entries.len(),
            ..RunReport::default()
        };

        self.add_cover(book.cover_url, packager)?;
        let stylesheet = packager.add_stylesheet(DEFAULT_STYLESHEET.as_bytes())?;

        if self.options.include_sources && !entries.is_empty() {
            if let Err(err) = packager.add_chapter(SOURCES_TITLE, &sources_body(entries), Some(&stylesheet)) {
                warn!(error = %err, "error adding sources chapter");
                report.warnings += 1;
            }
        }

        let mut resolver = ImageResolver::new(&self.fetcher);
        let mut assembler = ChapterAssembler::new();

        for (index, entry) in entries.iter().enumerate() {
            let position = index + 1;
            info!(
                "processing ({position}/{}): {} - {}",
                entries.len(),
                entry.title,
                entry.url
            );

            let normalized = match self.process_entry(position, entry, &mut resolver) {
                Ok(normalized) => normalized,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(url = %entry.url, title = %entry.title, error = %err, "skipping entry");
                    report.skipped.push(SkippedEntry {
                        position,
                        entry: entry.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            for warning in &normalized.warnings {
                warn!(url = %entry.url, "{warning}");
            }
            report.warnings += normalized.warnings.len();
            Self::flush_images(&mut resolver, packager, &mut report);

            if assembler.open_title() == Some(entry.title.as_str()) {
                info!(title = %entry.title, "continuing chapter");
            }
            if let Some(chapter) = assembler.push(&entry.title, normalized.html) {
                Self::emit(chapter, &stylesheet, packager, &mut report);
            }
            report.processed += 1;
        }

        if let Some(chapter) = assembler.finish() {
            Self::emit(chapter, &stylesheet, packager, &mut report);
        }

        packager.write(book.output)?;
        info!(
            chapters = report.chapters,
            skipped = report.skipped.len(),
            images = report.images,
            "run complete"
        );
        Ok(report)
    }

    /// Fetch, locate and normalize one entry.
    ///
    /// # Errors
    ///
    /// Fetch failures, and [`Error::ContentNotFound`] when no strategy
    /// locates an article body.
    pub fn process_entry<R: Fetch>(
        &self,
        position: usize,
        entry: &SourceEntry,
        resolver: &mut ImageResolver<R>,
    ) -> Result<NormalizedFragment> {
        let cache_key = format!("page_{position}_{}.html", sanitize_filename(&entry.url));
        let fetched = self.fetcher.fetch(&entry.url, Some(&cache_key));
        if !self.options.request_delay.is_zero() {
            std::thread::sleep(self.options.request_delay);
        }
        let fetched = fetched?;

        let html = decode_page(&fetched.bytes, fetched.content_type.as_deref());
        let doc = dom::parse(&html);
        let page = PageContext {
            url: &entry.url,
            line: position,
        };

        let extraction = self.locator.locate(&doc, page);
        if !extraction.found {
            return Err(Error::ContentNotFound {
                url: entry.url.clone(),
            });
        }

        Ok(self.normalizer.normalize(&extraction.fragment, page, resolver))
    }

    fn add_cover<P: Packager>(&self, cover_url: &str, packager: &mut P) -> Result<()> {
        let ext = match path_extension(cover_url) {
            ext if ext.is_empty() => ".jpg".to_string(),
            ext => ext,
        };
        let cover = self.fetcher.fetch(cover_url, Some(&format!("cover{ext}")))?;
        packager.set_cover(cover.bytes, cover_url)
    }

    fn flush_images<R: Fetch, P: Packager>(resolver: &mut ImageResolver<R>, packager: &mut P, report: &mut RunReport) {
        for asset in resolver.take_new_assets() {
            match packager.add_image(&asset.local_name, asset.bytes) {
                Ok(_) => report.images += 1,
                Err(err) => {
                    warn!(url = %asset.source_url, error = %err, "error adding image to book");
                    report.warnings += 1;
                }
            }
        }
    }

    fn emit<P: Packager>(chapter: Chapter, stylesheet: &StylesheetRef, packager: &mut P, report: &mut RunReport) {
        match packager.add_chapter(&chapter.title, &chapter.body(), Some(stylesheet)) {
            Ok(()) => {
                info!(title = %chapter.title, fragments = chapter.fragments.len(), "chapter added");
                report.chapters += 1;
            }
            Err(err) => {
                warn!(title = %chapter.title, error = %err, "error adding chapter to book");
                report.warnings += 1;
            }
        }
    }
}
