//! AI service integration: prompt, client and response parsing

pub mod analyzer;
pub mod gemini;
pub mod parser;
pub mod prompts;

pub use analyzer::{FeedbackAnalyzer, FeedbackProvider};
pub use gemini::GeminiClient;
