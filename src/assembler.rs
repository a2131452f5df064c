//! Chapter Assembler
//!
//! Merges consecutive fragments that share a declared title into one
//! chapter. A chapter closes when a different title arrives or when the
//! entry stream ends; chapters without any content are never emitted.

/// A closed chapter, ready for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    /// Normalized fragments in arrival order.
    pub fragments: Vec<String>,
}

impl Chapter {
    fn open(title: &str) -> Self {
        Self {
            title: title.to_string(),
            fragments: Vec::new(),
        }
    }

    /// Whether any fragment carries markup.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.fragments.iter().any(|f| !f.trim().is_empty())
    }

    /// Fragments joined into one chapter body.
    #[must_use]
    pub fn body(&self) -> String {
        self.fragments.concat()
    }
}

/// State machine over `(title, fragment)` events.
///
/// # Example
///
/// ```rust
/// use seirei_epub::ChapterAssembler;
///
/// let mut assembler = ChapterAssembler::new();
/// assert!(assembler.push("Ch1", "<p>a</p>".into()).is_none());
/// assert!(assembler.push("Ch1", "<p>b</p>".into()).is_none());
///
/// let ch1 = assembler.push("Ch2", "<p>c</p>".into()).unwrap();
/// assert_eq!(ch1.fragments.len(), 2);
///
/// let ch2 = assembler.finish().unwrap();
/// assert_eq!(ch2.title, "Ch2");
/// ```
#[derive(Debug, Default)]
pub struct ChapterAssembler {
    current: Option<Chapter>,
}

impl ChapterAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Title of the open chapter, if any.
    #[must_use]
    pub fn open_title(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.title.as_str())
    }

    /// Feed one processed entry.
    ///
    /// Returns the previous chapter when `title` closes it and it has
    /// content.
    pub fn push(&mut self, title: &str, fragment: String) -> Option<Chapter> {
        let closed = match &self.current {
            Some(open) if open.title == title => None,
            _ => self.current.replace(Chapter::open(title)),
        };

        if let Some(open) = self.current.as_mut() {
            open.fragments.push(fragment);
        }

        closed.filter(Chapter::has_content)
    }

    /// End of the entry stream: the open chapter, if it has content.
    pub fn finish(&mut self) -> Option<Chapter> {
        self.current.take().filter(Chapter::has_content)
    }
}
