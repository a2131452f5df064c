//! Debug snapshots of intermediate HTML.
//!
//! In debug mode each extraction and cleanup stage can be written to the
//! working directory for inspection. Failures are logged and ignored.

use std::path::{Path, PathBuf};

use crate::url_utils::sanitize_filename;

/// Writes stage snapshots when enabled; a no-op otherwise.
#[derive(Debug, Clone, Default)]
pub struct DebugDump {
    dir: Option<PathBuf>,
}

impl DebugDump {
    /// Snapshot writer rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Snapshot writer that writes nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Writer for the given run settings.
    #[must_use]
    pub fn from_options(options: &crate::Options) -> Self {
        if options.debug {
            Self::new(&options.work_dir)
        } else {
            Self::disabled()
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Save `content` as `debug_<line>_<id>_<stage>.html`.
    ///
    /// Returns the written path, if any.
    pub fn save(&self, line: usize, stage: &str, content: &str, id: &str) -> Option<PathBuf> {
        let dir = self.dir.as_deref()?;
        let path = snapshot_path(dir, line, stage, id);

        match std::fs::write(&path, content) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "saved debug HTML");
                Some(path)
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "error saving debug HTML");
                None
            }
        }
    }
}

fn snapshot_path(dir: &Path, line: usize, stage: &str, id: &str) -> PathBuf {
    let mut ident = sanitize_filename(id);
    ident.truncate(30);
    dir.join(format!("debug_{line}_{ident}_{stage}.html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_writes_nothing() {
        let dump = DebugDump::disabled();
        assert!(!dump.is_enabled());
        assert!(dump.save(1, "original", "<p>x</p>", "http://x/a").is_none());
    }

    #[test]
    fn test_snapshot_name_is_sanitized_and_truncated() {
        let path = snapshot_path(
            Path::new("/tmp/w"),
            3,
            "final",
            "https://example.blogspot.com/2020/01/very-long-post-name.html",
        );
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert_eq!(name, "debug_3_https___example_blogspot_com_2_final.html");
    }

    #[test]
    fn test_enabled_writes_file() {
        let dir = std::env::temp_dir().join(format!("seirei_debug_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let dump = DebugDump::new(&dir);
        let written = dump.save(7, "title", "<h4>t</h4>", "post").unwrap();
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "<h4>t</h4>");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
