//! Feedback document returned by the AI service

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Structured feedback for one resume against one job.
///
/// Field names follow the JSON the model is asked to produce. Every field
/// defaults when missing so a partially filled answer still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feedback {
    #[serde(deserialize_with = "lenient_score")]
    pub overall_score: u8,

    #[serde(rename = "ATS", alias = "ats")]
    pub ats: AtsFeedback,

    pub content_analysis: ContentAnalysis,

    pub formatting: FormattingFeedback,

    pub job_match_analysis: JobMatchAnalysis,

    #[serde(deserialize_with = "lenient_strings")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtsFeedback {
    #[serde(deserialize_with = "lenient_score")]
    pub score: u8,
    #[serde(deserialize_with = "lenient_strings")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentAnalysis {
    #[serde(deserialize_with = "lenient_strings")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingFeedback {
    #[serde(deserialize_with = "lenient_score")]
    pub score: u8,
    #[serde(deserialize_with = "lenient_strings")]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobMatchAnalysis {
    #[serde(deserialize_with = "lenient_strings")]
    pub matching_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub missing_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_score")]
    pub relevance_score: u8,
}

/// Where a feedback document came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    #[default]
    Model,
    /// The model answered but not with parseable JSON
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    GoodStart,
    NeedsWork,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            71..=u8::MAX => ScoreBand::Strong,
            50..=70 => ScoreBand::GoodStart,
            _ => ScoreBand::NeedsWork,
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreBand::Strong => "Strong",
            ScoreBand::GoodStart => "Good Start",
            ScoreBand::NeedsWork => "Needs Work",
        };
        f.write_str(label)
    }
}

impl Feedback {
    /// Canned feedback used when the model's answer cannot be parsed
    pub fn fallback(job_title: &str, company_name: &str) -> Self {
        Self {
            overall_score: 78,
            ats: AtsFeedback {
                score: 75,
                tips: vec![
                    format!("Optimize for {} keywords", job_title),
                    "Include quantifiable achievements".to_string(),
                    "Use ATS-friendly formatting".to_string(),
                ],
            },
            content_analysis: ContentAnalysis {
                strengths: vec![
                    "Resume processed successfully".to_string(),
                    "Professional format detected".to_string(),
                ],
                improvements: vec![
                    "Add more specific details".to_string(),
                    "Include relevant metrics".to_string(),
                ],
            },
            formatting: FormattingFeedback {
                score: 80,
                suggestions: vec![
                    "Maintain consistent formatting".to_string(),
                    "Use clear section headers".to_string(),
                ],
            },
            job_match_analysis: JobMatchAnalysis {
                matching_skills: vec!["General experience".to_string()],
                missing_skills: vec!["Specific technical skills".to_string()],
                relevance_score: 75,
            },
            recommendations: vec![
                format!("Tailor resume for {} role", job_title),
                format!("Research {}'s requirements", company_name),
                "Add relevant certifications".to_string(),
            ],
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }
}

/// Accept integers, floats, numeric strings ("85", "85%") or null; clamp to 0..=100
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

/// Accept a list of strings, a single string, or null; numbers are stringified
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    };
    Ok(items)
}
