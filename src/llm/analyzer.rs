//! Feedback generation on top of an AI text provider

use crate::error::Result;
use crate::feedback::{Feedback, FeedbackSource};
use crate::llm::parser::parse_feedback;
use crate::llm::prompts::{FeedbackPrompt, PromptParams};
use log::{info, warn};
use std::future::Future;
use std::time::Instant;

/// Anything that turns a prompt into model text
pub trait FeedbackProvider {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone)]
pub struct AnalyzedFeedback {
    pub feedback: Feedback,
    pub source: FeedbackSource,
    pub response_chars: usize,
    pub processing_time_ms: u64,
}

pub struct FeedbackAnalyzer<P> {
    provider: P,
    prompt: FeedbackPrompt,
}

impl<P: FeedbackProvider> FeedbackAnalyzer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            prompt: FeedbackPrompt::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: FeedbackPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Ask the provider for feedback.
    ///
    /// An answer that is not the expected JSON degrades to
    /// [`Feedback::fallback`]; transport and service errors are returned.
    pub async fn analyze(&self, params: &PromptParams) -> Result<AnalyzedFeedback> {
        let start_time = Instant::now();
        let prompt = self.prompt.render(params);

        let text = self.provider.generate(&prompt).await?;

        let (feedback, source) = match parse_feedback(&text) {
            Ok(feedback) => (feedback, FeedbackSource::Model),
            Err(e) if e.is_response_format() => {
                warn!("{}; creating fallback response", e);
                (
                    Feedback::fallback(&params.job_title, &params.company_name),
                    FeedbackSource::Fallback,
                )
            }
            Err(e) => return Err(e),
        };

        info!("AI analysis completed (overall score {})", feedback.overall_score);

        Ok(AnalyzedFeedback {
            feedback,
            source,
            response_chars: text.len(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
