//! Gemini-backed content provider.
//!
//! Calls the `generateContent` endpoint with a JSON response schema and
//! parses the first candidate's text as the word content.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::traits::{ContentProvider, PartialContent};
use crate::config::ProviderConfig;
use crate::core::WordContent;
use crate::error::{MnemoError, Result};

/// Instructions sent ahead of every term.
const HOOK_PROMPT: &str = r#"
You are a poetic philologist. Generate memory aids for the following vocabulary word.
Strict Rules:
1. "hookL1": A memory hook short sentence. MUST be between 10 and 18 Chinese characters. Abstract, artistic, theoretical context. NO jokes, NO puns, NO daily life slang.
2. "hookL2": A deeper philosophical or etymological connection.
3. "comparison": A short sentence correcting a common misconception in the format "并不是[Common Mistake]，而是[Correct Nuance]".
4. "confusers": Generate 3 plausible but incorrect definitions (Chinese).
5. "definition": The concise, correct definition (Chinese).

Output in JSON.
"#;

/// Content provider for the Gemini generative language API.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Request body for `term`.
    pub fn request_body(term: &str) -> Value {
        json!({
            "contents": [{
                "parts": [{ "text": format!("{HOOK_PROMPT} Word: \"{term}\"") }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "hookL1": { "type": "STRING" },
                        "hookL2": { "type": "STRING" },
                        "comparison": { "type": "STRING" },
                        "definition": { "type": "STRING" },
                        "confusers": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        }
                    }
                }
            }
        })
    }

    /// Extract word content from a `generateContent` reply.
    ///
    /// A reply without text is treated as an empty object, so every field
    /// gets its placeholder. Text that is not a JSON object is an error.
    pub fn parse_reply(reply: &Value) -> Result<WordContent> {
        Self::parse_reply_partial(reply).map(PartialContent::complete)
    }

    /// Extract only the fields the reply carries.
    pub fn parse_reply_partial(reply: &Value) -> Result<PartialContent> {
        let text = reply["candidates"]
            .get(0)
            .and_then(|c| c["content"]["parts"].get(0))
            .and_then(|p| p["text"].as_str())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("{}");

        serde_json::from_str(text)
            .map_err(|e| MnemoError::provider(format!("malformed content JSON: {e}")))
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    async fn generate(&self, term: &str) -> Result<WordContent> {
        self.generate_partial(term).await.map(PartialContent::complete)
    }

    async fn generate_partial(&self, term: &str) -> Result<PartialContent> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MnemoError::provider("no API key configured"))?;

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(term))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MnemoError::provider(format!("HTTP {}", response.status())));
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|e| MnemoError::provider(format!("failed to parse response: {e}")))?;

        Self::parse_reply_partial(&reply)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_with_text(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[test]
    fn test_request_body_mentions_term() {
        let body = GeminiProvider::request_body("Labyrinth");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.ends_with("Word: \"Labyrinth\""));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_parse_reply() {
        let reply = reply_with_text(
            r#"{"definition":"迷宫","confusers":["平原","公路","地下室"],"hookL1":"h1","hookL2":"h2","comparison":"c"}"#,
        );
        let content = GeminiProvider::parse_reply(&reply).unwrap();
        assert_eq!(content.definition, "迷宫");
        assert_eq!(content.confusers.len(), 3);
    }

    #[test]
    fn test_parse_reply_without_candidates_uses_placeholders() {
        let content = GeminiProvider::parse_reply(&json!({})).unwrap();
        assert_eq!(content.definition, "Definition pending...");
    }

    #[test]
    fn test_parse_reply_partial_keeps_absent_fields_absent() {
        let reply = reply_with_text(r#"{"hookL1":"new hook"}"#);
        let partial = GeminiProvider::parse_reply_partial(&reply).unwrap();
        assert_eq!(partial.hook_l1.as_deref(), Some("new hook"));
        assert_eq!(partial.definition, None);
        assert_eq!(partial.confusers, None);
    }

    #[test]
    fn test_parse_reply_rejects_non_json_text() {
        let reply = reply_with_text("Sorry, I can't help with that.");
        assert!(GeminiProvider::parse_reply(&reply).is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let provider = GeminiProvider {
            client: reqwest::Client::new(),
            endpoint: "http://127.0.0.1:9".to_string(),
            model: "test".to_string(),
            api_key: None,
        };
        let result = provider.generate("cat").await;
        assert!(matches!(result, Err(MnemoError::Provider { .. })));
    }

    #[test]
    fn test_url() {
        let provider = GeminiProvider::new(&ProviderConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            model: "m".to_string(),
            api_key_env: "MNEMOSYNE_UNSET_KEY_FOR_TEST".to_string(),
        });
        assert_eq!(
            provider.url(),
            "https://example.test/v1beta/models/m:generateContent"
        );
    }
}
