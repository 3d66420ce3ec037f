//! Vocabulary word records.

use serde::{Deserialize, Serialize};

use crate::content::fallback::FALLBACK_CONFUSERS;

/// Learning status of a word.
///
/// Set when the word is created. Study sessions record review timestamps
/// and error counts but leave the status alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    #[default]
    New,
    Learning,
    Mastered,
    Error,
}

impl WordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordStatus::New => "new",
            WordStatus::Learning => "learning",
            WordStatus::Mastered => "mastered",
            WordStatus::Error => "error",
        }
    }
}

/// Generated content for a term: the answer, its distractors and the hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordContent {
    pub definition: String,
    pub confusers: Vec<String>,
    pub hook_l1: String,
    pub hook_l2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
}

/// A vocabulary entry.
///
/// Serialized in camelCase so persisted libraries keep the
/// `hookL1`/`lastReview`/`errorCount` field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Unique, stable identifier.
    pub id: String,
    /// Display key.
    pub term: String,
    /// The single correct meaning.
    pub definition: String,
    /// Incorrect candidates offered next to the definition.
    pub confusers: Vec<String>,
    /// Short mnemonic hook.
    pub hook_l1: String,
    /// Longer explanation behind the hook.
    pub hook_l2: String,
    /// Corrective sentence shown after a wrong answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    pub status: WordStatus,
    /// Epoch seconds of the last study exposure, 0 if never reviewed.
    pub last_review: i64,
    /// Incorrect answers across all sessions.
    pub error_count: u32,
}

impl Word {
    /// Create a fresh word from generated content.
    pub fn new(id: impl Into<String>, term: impl Into<String>, content: WordContent) -> Self {
        let mut word = Self {
            id: id.into(),
            term: term.into(),
            definition: String::new(),
            confusers: Vec::new(),
            hook_l1: String::new(),
            hook_l2: String::new(),
            comparison: None,
            status: WordStatus::New,
            last_review: 0,
            error_count: 0,
        };
        word.apply_content(content);
        word
    }

    /// Replace the generated fields, keeping identity and progress.
    pub fn apply_content(&mut self, content: WordContent) {
        self.confusers = sanitize_confusers(&content.definition, content.confusers);
        self.definition = content.definition;
        self.hook_l1 = content.hook_l1;
        self.hook_l2 = content.hook_l2;
        self.comparison = content.comparison.filter(|c| !c.trim().is_empty());
    }

    /// Re-apply the confuser rules, for words read back from storage.
    pub fn sanitize(&mut self) {
        let confusers = std::mem::take(&mut self.confusers);
        self.confusers = sanitize_confusers(&self.definition, confusers);
    }

    /// The generated fields of this word.
    pub fn content(&self) -> WordContent {
        WordContent {
            definition: self.definition.clone(),
            confusers: self.confusers.clone(),
            hook_l1: self.hook_l1.clone(),
            hook_l2: self.hook_l2.clone(),
            comparison: self.comparison.clone(),
        }
    }

    /// Whether `option` is the correct answer.
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.definition
    }

    /// The unshuffled option set: distinct confusers followed by the definition.
    pub fn options(&self) -> Vec<String> {
        let mut options: Vec<String> = Vec::with_capacity(self.confusers.len() + 1);
        for confuser in &self.confusers {
            if *confuser != self.definition && !options.contains(confuser) {
                options.push(confuser.clone());
            }
        }
        options.push(self.definition.clone());
        options
    }

    /// Feedback shown for a missed word.
    pub fn correction(&self) -> String {
        match &self.comparison {
            Some(comparison) => comparison.clone(),
            None => format!("You missed: {}", self.definition),
        }
    }
}

/// Drop empty, duplicate and definition-equal confusers.
///
/// Falls back to the fixed placeholder confusers when nothing usable is left.
fn sanitize_confusers(definition: &str, confusers: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(confusers.len());
    for confuser in confusers {
        let trimmed = confuser.trim();
        if trimmed.is_empty() || trimmed == definition || kept.iter().any(|k| k == trimmed) {
            continue;
        }
        kept.push(trimmed.to_string());
    }

    if kept.is_empty() {
        kept = FALLBACK_CONFUSERS
            .iter()
            .filter(|c| **c != definition)
            .map(|c| c.to_string())
            .collect();
    }
    kept
}
