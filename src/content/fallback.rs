//! Fallback wrapper for content providers.
//!
//! Wraps a provider so that any failure is logged and replaced by the fixed
//! fallback record. Callers of [`FallbackProvider::generate`] always get
//! content back.

use tracing::warn;

use super::traits::{ContentProvider, PartialContent};
use crate::core::WordContent;
use crate::error::MnemoError;

pub const FALLBACK_DEFINITION: &str = "未知定义";
pub const FALLBACK_CONFUSERS: [&str; 3] = ["错误选项A", "错误选项B", "错误选项C"];
pub const FALLBACK_HOOK_L1: &str = "词义如雾中风景，需静心凝视方见真容。";
pub const FALLBACK_HOOK_L2: &str = "暂时无法获取深度解析，请稍后重试。";
pub const FALLBACK_COMPARISON: &str = "定义暂时缺席";

/// The fixed record substituted when generation fails.
pub fn fallback_content() -> WordContent {
    WordContent {
        definition: FALLBACK_DEFINITION.to_string(),
        confusers: FALLBACK_CONFUSERS.iter().map(|c| c.to_string()).collect(),
        hook_l1: FALLBACK_HOOK_L1.to_string(),
        hook_l2: FALLBACK_HOOK_L2.to_string(),
        comparison: Some(FALLBACK_COMPARISON.to_string()),
    }
}

/// A provider wrapper that never fails.
pub struct FallbackProvider {
    inner: Box<dyn ContentProvider>,
}

impl FallbackProvider {
    pub fn new(inner: Box<dyn ContentProvider>) -> Self {
        Self { inner }
    }

    /// Name of the wrapped provider.
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    /// Generate content for `term`, substituting the fallback record on failure.
    pub async fn generate(&self, term: &str) -> WordContent {
        match self.inner.generate(term).await {
            Ok(content) => content,
            Err(err) => {
                self.warn_fallback(term, &err);
                fallback_content()
            }
        }
    }

    /// Like [`generate`](Self::generate), but only the fields the provider
    /// returned are present. A failure yields the whole fallback record.
    pub async fn generate_partial(&self, term: &str) -> PartialContent {
        match self.inner.generate_partial(term).await {
            Ok(partial) => partial,
            Err(err) => {
                self.warn_fallback(term, &err);
                fallback_content().into()
            }
        }
    }

    fn warn_fallback(&self, term: &str, err: &MnemoError) {
        warn!(
            provider = self.inner.name(),
            term,
            error = %err,
            "content generation failed, using fallback content"
        );
    }
}
