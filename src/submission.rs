//! Analysis request and its validation rules

use crate::config::ValidationConfig;
use crate::error::{FeedbackError, Result};
use crate::input::file_detector::FileType;
use log::debug;
use std::path::{Path, PathBuf};

pub const DEFAULT_COMPANY_NAME: &str = "Target Company";

/// The resume file the user selected
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub file_type: FileType,
}

impl ResumeFile {
    /// Inspect a file on disk: size, name and type (extension or PDF header)
    pub async fn inspect(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            FeedbackError::InvalidInput(format!("Cannot read resume '{}': {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(FeedbackError::InvalidInput(format!(
                "Resume path is not a file: {}",
                path.display()
            )));
        }

        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension)
            .unwrap_or(FileType::Unknown);

        let file_type = if by_extension == FileType::Unknown {
            FileType::sniff_path(path).await?
        } else {
            by_extension
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "resume.pdf".to_string());

        debug!(
            "File selected: {} ({} bytes, {})",
            file_name,
            metadata.len(),
            file_type.mime_type()
        );

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size: metadata.len(),
            file_type,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub resume: ResumeFile,
}

impl Submission {
    pub fn new(
        company_name: Option<String>,
        job_title: impl Into<String>,
        job_description: impl Into<String>,
        resume: ResumeFile,
    ) -> Self {
        let company_name = company_name
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string());

        Self {
            company_name,
            job_title: job_title.into(),
            job_description: job_description.into(),
            resume,
        }
    }

    /// Check the request, reporting the first rule it breaks
    pub fn validate(&self, rules: &ValidationConfig) -> Result<()> {
        let fail = |msg: String| Err(FeedbackError::Validation(msg));

        if self.resume.file_type != FileType::Pdf {
            return fail("Please upload a PDF file".to_string());
        }
        if self.resume.size > rules.max_file_bytes {
            return fail(format!(
                "File size must be less than {}MB",
                rules.max_file_bytes / (1024 * 1024)
            ));
        }
        if self.resume.size < rules.min_file_bytes {
            return fail("File appears to be too small or corrupted".to_string());
        }
        if self.job_title.trim().is_empty() {
            return fail("Job title is required".to_string());
        }

        let description = self.job_description.trim();
        if description.is_empty() {
            return fail("Job description is required".to_string());
        }
        if description.chars().count() < rules.min_job_description_chars {
            return fail(format!(
                "Job description should be more detailed (at least {} characters)",
                rules.min_job_description_chars
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str =
        "We are hiring a backend engineer to build Rust services on Kubernetes and Postgres.";

    fn resume(size: u64, file_type: FileType) -> ResumeFile {
        ResumeFile {
            path: PathBuf::from("resume.pdf"),
            file_name: "resume.pdf".to_string(),
            size,
            file_type,
        }
    }

    fn message(submission: &Submission) -> String {
        match submission.validate(&ValidationConfig::default()) {
            Err(FeedbackError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_submission() {
        let submission = Submission::new(None, "Backend Engineer", DESCRIPTION, resume(50_000, FileType::Pdf));
        assert!(submission.validate(&ValidationConfig::default()).is_ok());
        assert_eq!(submission.company_name, DEFAULT_COMPANY_NAME);
    }

    #[test]
    fn test_company_name_trimmed_and_defaulted() {
        let s = Submission::new(Some("  ".to_string()), "Engineer", DESCRIPTION, resume(5000, FileType::Pdf));
        assert_eq!(s.company_name, "Target Company");

        let s = Submission::new(Some(" Acme ".to_string()), "Engineer", DESCRIPTION, resume(5000, FileType::Pdf));
        assert_eq!(s.company_name, "Acme");
    }

    #[test]
    fn test_rule_order() {
        // Non-PDF wins over every other problem
        let s = Submission::new(None, "", "", resume(10, FileType::Text));
        assert_eq!(message(&s), "Please upload a PDF file");

        let s = Submission::new(None, "Engineer", DESCRIPTION, resume(11 * 1024 * 1024, FileType::Pdf));
        assert_eq!(message(&s), "File size must be less than 10MB");

        let s = Submission::new(None, "", "", resume(999, FileType::Pdf));
        assert_eq!(message(&s), "File appears to be too small or corrupted");

        let s = Submission::new(None, "   ", DESCRIPTION, resume(5000, FileType::Pdf));
        assert_eq!(message(&s), "Job title is required");

        let s = Submission::new(None, "Engineer", "  \n ", resume(5000, FileType::Pdf));
        assert_eq!(message(&s), "Job description is required");

        let s = Submission::new(None, "Engineer", "Write Rust.", resume(5000, FileType::Pdf));
        assert_eq!(
            message(&s),
            "Job description should be more detailed (at least 50 characters)"
        );
    }

    #[test]
    fn test_size_boundaries_are_inclusive() {
        let rules = ValidationConfig::default();
        let s = Submission::new(None, "Engineer", DESCRIPTION, resume(rules.min_file_bytes, FileType::Pdf));
        assert!(s.validate(&rules).is_ok());
        let s = Submission::new(None, "Engineer", DESCRIPTION, resume(rules.max_file_bytes, FileType::Pdf));
        assert!(s.validate(&rules).is_ok());
    }

    #[tokio::test]
    async fn test_inspect_sniffs_extensionless_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume_upload");
        std::fs::write(&path, b"%PDF-1.4\n%fake body").unwrap();

        let file = ResumeFile::inspect(&path).await.unwrap();
        assert_eq!(file.file_type, FileType::Pdf);
        assert_eq!(file.file_name, "resume_upload");
        assert_eq!(file.size, 19);
    }

    #[tokio::test]
    async fn test_inspect_missing_file() {
        let err = ResumeFile::inspect(Path::new("does/not/exist.pdf")).await.unwrap_err();
        assert!(matches!(err, FeedbackError::InvalidInput(_)));
    }
}
