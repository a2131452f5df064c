//! Run-wide configuration.
//!
//! One `Options` value is built per run and handed to each component's
//! constructor. Nothing here is global.

use std::path::PathBuf;
use std::time::Duration;

/// Domain string the source site stamps into posts as an attribution line.
pub const DEFAULT_SITE_DOMAIN: &str = "seireitranslations.blogspot.com";

/// Configuration options for a conversion run.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use seirei_epub::Options;
/// use std::time::Duration;
///
/// let options = Options {
///     request_delay: Duration::ZERO,
///     debug: true,
///     ..Options::default()
/// };
/// assert!(options.include_sources);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Canonical domain of the source site. Paragraphs whose decorated
    /// text equals this string are removed during normalization.
    ///
    /// Default: `seireitranslations.blogspot.com`
    pub site_domain: String,

    /// Upper bound on any single blocking request.
    ///
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Pause imposed after each page fetch.
    ///
    /// Default: 500 ms
    pub request_delay: Duration,

    /// Debug mode: cache downloads in `work_dir`, write HTML snapshots of
    /// each extraction stage, and keep `work_dir` after the run.
    ///
    /// Default: `false`
    pub debug: bool,

    /// Working storage for cached downloads and debug snapshots.
    ///
    /// Default: the system temp directory
    pub work_dir: PathBuf,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Prepend a chapter listing every source entry.
    ///
    /// Default: `true`
    pub include_sources: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            site_domain: DEFAULT_SITE_DOMAIN.to_string(),
            request_timeout: Duration::from_secs(30),
            request_delay: Duration::from_millis(500),
            debug: false,
            work_dir: std::env::temp_dir(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            include_sources: true,
        }
    }
}

impl Options {
    /// Working directory to use for an output file.
    ///
    /// Debug runs keep their files next to the output as `<output>.tmp`.
    /// Other runs get a fresh directory under the system temp dir.
    #[must_use]
    pub fn work_dir_for(output: &std::path::Path, debug: bool) -> PathBuf {
        if debug {
            let mut name = output.as_os_str().to_owned();
            name.push(".tmp");
            PathBuf::from(name)
        } else {
            let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
            std::env::temp_dir().join(format!("epub_files_{stamp}"))
        }
    }
}
