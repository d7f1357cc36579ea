//! Error handling for the resume feedback application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("{0}")]
    Validation(String),

    /// The PDF parsed, but carries too little text to analyse
    #[error("{0}")]
    InsufficientText(String),

    #[error("AI API key not found. Please set the {0} environment variable.")]
    MissingApiKey(String),

    #[error("AI API error ({status}): {body}")]
    AiService { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid AI response: {0}")]
    InvalidAiResponse(String),

    /// The model answered, but not with the JSON document it was asked for
    #[error("Malformed feedback JSON: {0}")]
    MalformedFeedback(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis not found: {0}")]
    NotFound(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;

impl FeedbackError {
    /// Message shown to the user when an analysis aborts.
    pub fn user_message(&self) -> String {
        match self {
            FeedbackError::MissingApiKey(_) => {
                "AI service configuration error. Please check your API key setup.".to_string()
            }
            FeedbackError::PdfExtraction(_) => {
                "Could not read your PDF. Please ensure it contains text (not just images) and try again."
                    .to_string()
            }
            FeedbackError::AiService { .. }
            | FeedbackError::Network(_)
            | FeedbackError::InvalidAiResponse(_) => {
                "AI analysis service is temporarily unavailable. Please try again in a few minutes."
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    /// True for failures caused by the model answer rather than the transport.
    pub fn is_response_format(&self) -> bool {
        matches!(self, FeedbackError::MalformedFeedback(_))
    }
}

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        FeedbackError::AnalysisFailed(err.to_string())
    }
}

impl From<reqwest::Error> for FeedbackError {
    fn from(err: reqwest::Error) -> Self {
        FeedbackError::Network(err.to_string())
    }
}
