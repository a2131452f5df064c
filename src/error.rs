//! Error types for seirei-epub.
//!
//! Errors fall into three groups. Fatal errors abort the run. Per-entry
//! errors skip one input entry. Per-asset errors drop one image.

/// Error type for fetching, extraction and packaging operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or the body could not be read.
    #[error("error fetching {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The server answered with a non-success status code.
    #[error("HTTP status code {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The server answered successfully but sent no bytes.
    #[error("zero bytes received from {url}")]
    EmptyBody { url: String },

    /// A URL could not be parsed or resolved.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No extraction strategy located the article body.
    #[error("could not find content in the blog post at {url}")]
    ContentNotFound { url: String },

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output container could not be assembled or written.
    #[error("packaging failed: {0}")]
    Package(String),

    /// Missing or invalid run configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error must abort the whole run.
    ///
    /// Fetch, status, extraction and URL errors only affect the entry or
    /// image that produced them.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Package(_) | Self::Config(_))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Package(err.to_string())
    }
}

/// Result type alias for seirei-epub operations.
pub type Result<T> = std::result::Result<T, Error>;
