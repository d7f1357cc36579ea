//! Persisted analysis record

use crate::feedback::{Feedback, FeedbackSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Completed,
}

/// Everything kept about one analysis run, serialised with camelCase keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub resume_path: String,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub feedback: Feedback,
    #[serde(default)]
    pub feedback_source: FeedbackSource,
    pub file_name: String,
    pub file_size: u64,
    pub upload_date: DateTime<Utc>,
    pub status: AnalysisStatus,
    /// First characters of the extracted resume text
    pub extracted_text: String,
}

pub fn record_key(id: &Uuid) -> String {
    format!("resume:{}", id)
}

/// First 500 characters followed by an ellipsis
pub fn text_preview(text: &str) -> String {
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", preview)
}

impl AnalysisRecord {
    pub fn key(&self) -> String {
        record_key(&self.id)
    }
}
