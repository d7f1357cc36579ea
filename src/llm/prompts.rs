//! Prompt for the resume feedback request

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Prompt template with `{job_title}`, `{company_name}`, `{job_description}`
/// and `{resume}` placeholders
#[derive(Debug, Clone)]
pub struct FeedbackPrompt {
    pub template: String,
}

impl Default for FeedbackPrompt {
    fn default() -> Self {
        Self {
            template: FEEDBACK_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    pub resume_content: String,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{(job_title|company_name|job_description|resume)\}")
            .expect("Invalid placeholder regex")
    })
}

impl FeedbackPrompt {
    /// Substitute all placeholders in one pass so user text is never re-expanded
    pub fn render(&self, params: &PromptParams) -> String {
        placeholder_regex()
            .replace_all(&self.template, |caps: &Captures| match &caps[1] {
                "job_title" => params.job_title.trim().to_string(),
                "company_name" => params.company_name.trim().to_string(),
                "job_description" => params.job_description.trim().to_string(),
                _ => params.resume_content.trim().to_string(),
            })
            .into_owned()
    }
}

const FEEDBACK_TEMPLATE: &str = r#"Please analyze this resume for a {job_title} position at {company_name}. Provide detailed, actionable feedback.

Job Description:
{job_description}

Resume Content:
{resume}

Please respond with ONLY valid JSON in this exact format:
{
    "overall_score": 85,
    "ATS": {
        "score": 78,
        "tips": [
            "Include keywords like 'JavaScript', 'React', 'Node.js'",
            "Add quantifiable achievements with numbers",
            "Use action verbs to start bullet points"
        ]
    },
    "content_analysis": {
        "strengths": [
            "Strong technical background",
            "Relevant work experience",
            "Clear project descriptions"
        ],
        "improvements": [
            "Add more quantifiable metrics",
            "Include soft skills examples",
            "Strengthen the professional summary"
        ]
    },
    "formatting": {
        "score": 82,
        "suggestions": [
            "Use consistent formatting throughout",
            "Ensure clear section headings",
            "Maintain adequate white space"
        ]
    },
    "job_match_analysis": {
        "matching_skills": ["JavaScript", "React", "Problem-solving"],
        "missing_skills": ["Node.js", "AWS", "Docker"],
        "relevance_score": 80
    },
    "recommendations": [
        "Tailor your summary for this specific role",
        "Add relevant certifications",
        "Include portfolio links if applicable"
    ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PromptParams {
        PromptParams {
            job_title: "Platform Engineer".to_string(),
            company_name: "Initech".to_string(),
            job_description: "  Operate Kubernetes clusters and write Rust tooling.  ".to_string(),
            resume_content: "Jane Doe\nSRE at Globex".to_string(),
        }
    }

    #[test]
    fn test_render_substitutes_everything() {
        let prompt = FeedbackPrompt::default().render(&params());

        assert!(prompt.starts_with("Please analyze this resume for a Platform Engineer position at Initech."));
        assert!(prompt.contains("Job Description:\nOperate Kubernetes clusters and write Rust tooling.\n"));
        assert!(prompt.contains("Resume Content:\nJane Doe\nSRE at Globex\n"));
        assert!(prompt.contains("\"job_match_analysis\""));
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{job_title}"));
    }

    #[test]
    fn test_user_text_is_not_reexpanded() {
        let mut p = params();
        p.job_description = "Mention {resume} and {job_title} literally.".to_string();
        let prompt = FeedbackPrompt::default().render(&p);

        assert!(prompt.contains("Mention {resume} and {job_title} literally."));
        assert_eq!(prompt.matches("Jane Doe").count(), 1);
    }

    #[test]
    fn test_custom_template() {
        let prompt = FeedbackPrompt {
            template: "{company_name}/{job_title}".to_string(),
        };
        assert_eq!(prompt.render(&params()), "Initech/Platform Engineer");
    }
}
