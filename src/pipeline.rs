//! End-to-end analysis: validate, upload, extract, score, persist

use crate::config::ValidationConfig;
use crate::error::{FeedbackError, Result};
use crate::feedback::FeedbackSource;
use crate::input::text_extractor::{PdfExtractor, TextExtractor};
use crate::llm::analyzer::{FeedbackAnalyzer, FeedbackProvider};
use crate::llm::prompts::PromptParams;
use crate::record::{text_preview, AnalysisRecord, AnalysisStatus};
use crate::storage::{FileStore, KvStore, RecordStore};
use crate::submission::Submission;
use chrono::Utc;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::time::Instant;
use uuid::Uuid;

/// Receives progress milestones as a percentage and a status line
pub trait ProgressSink {
    fn update(&self, percent: u8, message: &str);
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _percent: u8, _message: &str) {}
}

impl ProgressSink for ProgressBar {
    fn update(&self, percent: u8, message: &str) {
        self.set_position(percent as u64);
        self.set_message(message.to_string());
        if percent >= 100 {
            self.finish_with_message(message.to_string());
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub record: AnalysisRecord,
    /// False when results were not persisted (disabled or the save failed)
    pub saved: bool,
    pub processing_time_ms: u64,
}

pub struct AnalysisPipeline<P, K> {
    analyzer: FeedbackAnalyzer<P>,
    files: FileStore,
    records: RecordStore<K>,
    validation: ValidationConfig,
    store_results: bool,
}

impl<P: FeedbackProvider, K: KvStore> AnalysisPipeline<P, K> {
    pub fn new(
        analyzer: FeedbackAnalyzer<P>,
        files: FileStore,
        records: RecordStore<K>,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            analyzer,
            files,
            records,
            validation,
            store_results: true,
        }
    }

    pub fn with_storage(mut self, enabled: bool) -> Self {
        self.store_results = enabled;
        self
    }

    pub fn records(&self) -> &RecordStore<K> {
        &self.records
    }

    fn step(&self, progress: &dyn ProgressSink, percent: u8, message: &str) {
        debug!("Progress: {}% - {}", percent, message);
        progress.update(percent, message);
    }

    pub async fn run(&self, submission: &Submission, progress: &dyn ProgressSink) -> Result<PipelineOutcome> {
        let start_time = Instant::now();
        submission.validate(&self.validation)?;
        info!("Starting AI resume analysis for {}", submission.resume.file_name);

        self.step(progress, 5, "Checking services...");
        if self.store_results {
            self.files.ensure_ready().await?;
        }

        self.step(progress, 15, "Uploading resume...");
        let resume_path = if self.store_results {
            self.files.upload(&submission.resume.path).await?.path
        } else {
            submission.resume.path.clone()
        };

        self.step(progress, 35, "Extracting resume content...");
        let resume_text = PdfExtractor.extract(&submission.resume.path).await?;
        if resume_text.chars().count() < self.validation.min_resume_text_chars {
            return Err(FeedbackError::InsufficientText(
                "Could not extract sufficient text from PDF. Please ensure it contains readable text and is not just images."
                    .to_string(),
            ));
        }
        debug!("Successfully extracted {} characters from resume", resume_text.len());

        self.step(progress, 60, "AI is analyzing your resume content...");
        let params = PromptParams {
            job_title: submission.job_title.clone(),
            company_name: submission.company_name.clone(),
            job_description: submission.job_description.clone(),
            resume_content: resume_text.clone(),
        };
        let analyzed = self.analyzer.analyze(&params).await?;
        if analyzed.source == FeedbackSource::Fallback {
            warn!("AI response could not be parsed; using fallback feedback");
        }

        self.step(progress, 85, "Processing analysis results...");
        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            resume_path: resume_path.to_string_lossy().to_string(),
            company_name: submission.company_name.clone(),
            job_title: submission.job_title.trim().to_string(),
            job_description: submission.job_description.trim().to_string(),
            feedback: analyzed.feedback,
            feedback_source: analyzed.source,
            file_name: submission.resume.file_name.clone(),
            file_size: submission.resume.size,
            upload_date: Utc::now(),
            status: AnalysisStatus::Completed,
            extracted_text: text_preview(&resume_text),
        };

        let saved = if self.store_results {
            self.step(progress, 95, "Saving analysis results...");
            match self.records.save(&record).await {
                Ok(()) => {
                    debug!("Analysis results saved under {}", record.key());
                    true
                }
                Err(e) => {
                    // The analysis itself succeeded; keep going without persistence
                    warn!("KV save failed: {}", e);
                    false
                }
            }
        } else {
            false
        };

        self.step(progress, 100, "Analysis complete!");
        info!("Analysis {} completed", record.id);

        Ok(PipelineOutcome {
            record,
            saved,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::file_detector::FileType;
    use crate::storage::FileKvStore;
    use crate::submission::ResumeFile;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<(u8, String)>>);

    impl ProgressSink for Recorder {
        fn update(&self, percent: u8, message: &str) {
            self.0.lock().unwrap().push((percent, message.to_string()));
        }
    }

    struct Unreachable;

    impl FeedbackProvider for Unreachable {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            panic!("provider must not be called");
        }
    }

    fn pipeline(root: &std::path::Path) -> AnalysisPipeline<Unreachable, FileKvStore> {
        AnalysisPipeline::new(
            FeedbackAnalyzer::new(Unreachable),
            FileStore::new(root.join("uploads")),
            RecordStore::new(FileKvStore::new(root.join("kv"))),
            ValidationConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_validation_runs_before_any_stage() {
        let dir = tempfile::tempdir().unwrap();
        let submission = Submission::new(
            None,
            "",
            "A description that is certainly longer than fifty characters in total.",
            ResumeFile {
                path: PathBuf::from("cv.pdf"),
                file_name: "cv.pdf".to_string(),
                size: 5000,
                file_type: FileType::Pdf,
            },
        );

        let recorder = Recorder(Mutex::new(Vec::new()));
        let err = pipeline(dir.path()).run(&submission, &recorder).await.unwrap_err();

        assert!(matches!(err, FeedbackError::Validation(ref m) if m == "Job title is required"));
        assert!(recorder.0.lock().unwrap().is_empty());
        assert!(!dir.path().join("uploads").exists());
    }

    #[tokio::test]
    async fn test_short_pdf_text_stops_before_ai() {
        let dir = tempfile::tempdir().unwrap();
        let submission = Submission::new(
            Some("Acme".to_string()),
            "Engineer",
            "A description that is certainly longer than fifty characters in total.",
            ResumeFile::inspect(std::path::Path::new("tests/fixtures/short_resume.pdf"))
                .await
                .unwrap(),
        );

        let recorder = Recorder(Mutex::new(Vec::new()));
        let err = pipeline(dir.path()).run(&submission, &recorder).await.unwrap_err();

        assert!(matches!(err, FeedbackError::InsufficientText(_)));
        assert!(err.user_message().starts_with("Could not extract sufficient text from PDF."));
        let steps: Vec<u8> = recorder.0.lock().unwrap().iter().map(|(p, _)| *p).collect();
        assert_eq!(steps, vec![5, 15, 35]);
        assert!(!dir.path().join("kv").exists());
    }

    #[tokio::test]
    async fn test_unreadable_pdf_stops_before_ai() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("cv.pdf");
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.resize(2048, b'x');
        std::fs::write(&resume, &bytes).unwrap();

        let submission = Submission::new(
            Some("Acme".to_string()),
            "Engineer",
            "A description that is certainly longer than fifty characters in total.",
            ResumeFile::inspect(&resume).await.unwrap(),
        );

        let recorder = Recorder(Mutex::new(Vec::new()));
        let err = pipeline(dir.path()).run(&submission, &recorder).await.unwrap_err();

        assert!(matches!(err, FeedbackError::PdfExtraction(_)));
        let steps: Vec<u8> = recorder.0.lock().unwrap().iter().map(|(p, _)| *p).collect();
        assert_eq!(steps, vec![5, 15, 35]);
        assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 1);
    }
}
