//! Generated word content.
//!
//! - **traits**: the `ContentProvider` trait and partial-reply completion
//! - **fallback**: the never-failing wrapper and the fixed fallback record
//! - **gemini**: HTTP provider for the Gemini generative language API

pub mod fallback;
pub mod gemini;
pub mod traits;

pub use fallback::{fallback_content, FallbackProvider};
pub use gemini::GeminiProvider;
pub use traits::{ContentProvider, PartialContent};
