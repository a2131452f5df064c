//! Pattern Locator
//!
//! Finds the human-written article body inside a fetched page. The locator
//! holds an ordered list of [`Strategy`] values and returns the first one
//! that reports a match. Strategies are never merged or scored.
//!
//! Default order, most precise first:
//!
//! 1. [`Strategy::AnchorDescent`]: chapter-title anchor inside a
//!    `post-body`/`post-content` wrapper.
//! 2. [`Strategy::LooseContainer`]: any anchor rule, nearest `div` or the
//!    body as container.
//! 3. [`Strategy::WholeBody`]: the main content container verbatim, minus
//!    navigation blocks. Catch-all, so it must stay last.

use dom_query::Document;
use tracing::debug;

use crate::debug::DebugDump;

mod anchor;
mod fallback;

/// Outcome of one extraction attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Serialized article-body markup. Empty when nothing was found.
    pub fragment: String,
    pub found: bool,
    /// Name of the strategy that produced the fragment.
    pub strategy: Option<&'static str>,
}

impl Extraction {
    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn found(fragment: String) -> Self {
        Self {
            fragment,
            found: true,
            strategy: None,
        }
    }
}

/// Identifies the page being processed, for logs and debug snapshots.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub url: &'a str,
    /// Position of the entry in the input list.
    pub line: usize,
}

/// One extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    AnchorDescent,
    LooseContainer,
    WholeBody,
}

impl Strategy {
    /// All strategies in priority order.
    pub const DEFAULT_ORDER: [Strategy; 3] = [
        Strategy::AnchorDescent,
        Strategy::LooseContainer,
        Strategy::WholeBody,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AnchorDescent => "AnchorDescent",
            Self::LooseContainer => "LooseContainer",
            Self::WholeBody => "WholeBody",
        }
    }

    /// Run this strategy against a parsed page.
    #[must_use]
    pub fn extract(self, doc: &Document, page: PageContext<'_>, dump: &DebugDump) -> Extraction {
        match self {
            Self::AnchorDescent => anchor::anchor_descent(doc, page, dump),
            Self::LooseContainer => anchor::loose_container(doc, page, dump),
            Self::WholeBody => fallback::whole_body(doc),
        }
    }
}

/// Ordered, first-match-wins strategy list.
#[derive(Debug, Clone)]
pub struct PatternLocator {
    strategies: Vec<Strategy>,
    dump: DebugDump,
}

impl Default for PatternLocator {
    fn default() -> Self {
        Self::new(DebugDump::disabled())
    }
}

impl PatternLocator {
    /// Locator with the default strategy order.
    #[must_use]
    pub fn new(dump: DebugDump) -> Self {
        Self::with_strategies(Strategy::DEFAULT_ORDER.to_vec(), dump)
    }

    /// Locator with a custom strategy order.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Strategy>, dump: DebugDump) -> Self {
        Self { strategies, dump }
    }

    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Return the first successful extraction, or a not-found result.
    #[must_use]
    pub fn locate(&self, doc: &Document, page: PageContext<'_>) -> Extraction {
        if self.dump.is_enabled() {
            self.dump.save(page.line, "original", &doc.html(), page.url);
        }

        for strategy in &self.strategies {
            let mut result = strategy.extract(doc, page, &self.dump);
            if result.found {
                debug!(url = %page.url, strategy = strategy.name(), "content located");
                self.dump.save(page.line, "final", &result.fragment, page.url);
                result.strategy = Some(strategy.name());
                return result;
            }
            debug!(url = %page.url, strategy = strategy.name(), "strategy found nothing");
        }

        Extraction::not_found()
    }
}
