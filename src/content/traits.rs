//! Content provider trait.
//!
//! A content provider turns a bare term into the generated fields of a word:
//! definition, confusers, hooks and the corrective comparison. Providers are
//! allowed to fail; callers go through [`FallbackProvider`] so a failure
//! never reaches the user.
//!
//! [`FallbackProvider`]: super::fallback::FallbackProvider

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::WordContent;
use crate::error::Result;

/// Generative content source.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Generate content for `term`.
    async fn generate(&self, term: &str) -> Result<WordContent>;

    /// Generate content for `term`, keeping only the fields the source
    /// actually returned. Providers that always fill every field can rely on
    /// the default.
    async fn generate_partial(&self, term: &str) -> Result<PartialContent> {
        self.generate(term).await.map(PartialContent::from)
    }

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl ContentProvider for Box<dyn ContentProvider> {
    async fn generate(&self, term: &str) -> Result<WordContent> {
        (**self).generate(term).await
    }

    async fn generate_partial(&self, term: &str) -> Result<PartialContent> {
        (**self).generate_partial(term).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Placeholders for fields a provider reply left out.
pub mod placeholders {
    pub const DEFINITION: &str = "Definition pending...";
    pub const CONFUSERS: [&str; 3] = ["Option A", "Option B", "Option C"];
    pub const HOOK_L1: &str = "Generating hook...";
    pub const HOOK_L2: &str = "Content pending...";
    pub const COMPARISON: &str = "Check definition.";
}

/// A provider reply where every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialContent {
    pub definition: Option<String>,
    pub confusers: Option<Vec<String>>,
    pub hook_l1: Option<String>,
    pub hook_l2: Option<String>,
    pub comparison: Option<String>,
}

impl PartialContent {
    /// Fill missing or blank fields with placeholders.
    pub fn complete(self) -> WordContent {
        fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| placeholder.to_string())
        }

        WordContent {
            definition: or_placeholder(self.definition, placeholders::DEFINITION),
            confusers: self
                .confusers
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| {
                    placeholders::CONFUSERS
                        .iter()
                        .map(|c| c.to_string())
                        .collect()
                }),
            hook_l1: or_placeholder(self.hook_l1, placeholders::HOOK_L1),
            hook_l2: or_placeholder(self.hook_l2, placeholders::HOOK_L2),
            comparison: Some(or_placeholder(self.comparison, placeholders::COMPARISON)),
        }
    }

    /// Overlay the present, non-blank fields on `base`. Everything else keeps
    /// its current value.
    pub fn merge_onto(self, base: WordContent) -> WordContent {
        fn or_current(value: Option<String>, current: String) -> String {
            value.filter(|v| !v.trim().is_empty()).unwrap_or(current)
        }

        WordContent {
            definition: or_current(self.definition, base.definition),
            confusers: self
                .confusers
                .filter(|c| !c.is_empty())
                .unwrap_or(base.confusers),
            hook_l1: or_current(self.hook_l1, base.hook_l1),
            hook_l2: or_current(self.hook_l2, base.hook_l2),
            comparison: self
                .comparison
                .filter(|c| !c.trim().is_empty())
                .or(base.comparison),
        }
    }
}

impl From<WordContent> for PartialContent {
    fn from(content: WordContent) -> Self {
        Self {
            definition: Some(content.definition),
            confusers: Some(content.confusers),
            hook_l1: Some(content.hook_l1),
            hook_l2: Some(content.hook_l2),
            comparison: content.comparison,
        }
    }
}
