//! Resume feedback library

pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod input;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod storage;
pub mod submission;

pub use config::Config;
pub use error::{FeedbackError, Result};
pub use feedback::Feedback;
pub use record::AnalysisRecord;
