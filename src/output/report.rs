//! Report structure handed to the formatters

use crate::feedback::{FeedbackSource, ScoreBand};
use crate::record::AnalysisRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An analysis record plus the summary and metadata shown around it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub summary: ReportSummary,
    pub metadata: ReportMetadata,
    pub analysis: AnalysisRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub overall_score: u8,
    pub band: String,
    pub verdict: String,
    pub ats_score: u8,
    pub formatting_score: u8,
    pub relevance_score: u8,
    /// True when the scores are the canned fallback, not a model answer
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub saved: bool,
    pub processing_time_ms: Option<u64>,
}

impl FeedbackReport {
    pub fn new(analysis: AnalysisRecord, saved: bool, processing_time_ms: Option<u64>) -> Self {
        let feedback = &analysis.feedback;
        let band = ScoreBand::from_score(feedback.overall_score);

        let summary = ReportSummary {
            overall_score: feedback.overall_score,
            band: band.to_string(),
            verdict: verdict(band, &analysis.job_title),
            ats_score: feedback.ats.score,
            formatting_score: feedback.formatting.score,
            relevance_score: feedback.job_match_analysis.relevance_score,
            is_fallback: analysis.feedback_source == FeedbackSource::Fallback,
        };

        Self {
            summary,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                saved,
                processing_time_ms,
            },
            analysis,
        }
    }
}

fn verdict(band: ScoreBand, job_title: &str) -> String {
    match band {
        ScoreBand::Strong => format!("Strong match for the {} role", job_title),
        ScoreBand::GoodStart => format!("Good start for the {} role, with clear room to improve", job_title),
        ScoreBand::NeedsWork => format!("Needs significant work before applying for the {} role", job_title),
    }
}
