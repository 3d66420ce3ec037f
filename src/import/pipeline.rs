//! Sequential import pipeline.
//!
//! Terms are generated strictly one at a time: call `i + 1` is only made
//! after call `i` resolved, and a failed call yields fallback content
//! without stopping the run.

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::parse::parse_terms;
use crate::content::FallbackProvider;
use crate::core::Word;

/// Progress events reported while an import runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportProgress<'a> {
    /// Terms were parsed; `batch` of `found` will be generated.
    Parsed { found: usize, batch: usize },
    /// Content for `term` (1-based `index` of `total`) is being generated.
    Generating {
        index: usize,
        total: usize,
        term: &'a str,
    },
    /// Generation is complete.
    Finished { added: usize },
}

/// Result of an import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// New words, in input order.
    pub words: Vec<Word>,
    /// Terms beyond the batch cap, not processed.
    pub skipped: Vec<String>,
}

impl ImportReport {
    pub fn added(&self) -> usize {
        self.words.len()
    }
}

/// Turns raw text into new words through a content provider.
pub struct ImportPipeline<'a> {
    provider: &'a FallbackProvider,
    batch_size: usize,
}

impl<'a> ImportPipeline<'a> {
    /// A `batch_size` of zero processes every term.
    pub fn new(provider: &'a FallbackProvider, batch_size: usize) -> Self {
        Self {
            provider,
            batch_size,
        }
    }

    fn cap(&self, found: usize) -> usize {
        if self.batch_size == 0 {
            found
        } else {
            found.min(self.batch_size)
        }
    }

    /// Parse `text` and generate a word for each term in the batch.
    ///
    /// Text with no terms returns an empty report without reporting progress.
    pub async fn run<F>(&self, text: &str, mut progress: F) -> ImportReport
    where
        F: FnMut(ImportProgress<'_>),
    {
        let mut terms = parse_terms(text);
        if terms.is_empty() {
            debug!("import text contained no terms");
            return ImportReport::default();
        }

        let found = terms.len();
        let skipped = terms.split_off(self.cap(found));
        let total = terms.len();
        progress(ImportProgress::Parsed {
            found,
            batch: total,
        });

        let mut words = Vec::with_capacity(total);
        for (i, term) in terms.into_iter().enumerate() {
            progress(ImportProgress::Generating {
                index: i + 1,
                total,
                term: &term,
            });
            let content = self.provider.generate(&term).await;
            words.push(Word::new(Uuid::new_v4().to_string(), term, content));
        }

        info!(
            provider = self.provider.name(),
            added = words.len(),
            skipped = skipped.len(),
            "import finished"
        );
        progress(ImportProgress::Finished { added: words.len() });

        ImportReport { words, skipped }
    }
}
