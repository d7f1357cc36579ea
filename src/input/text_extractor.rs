//! Text extraction from various file formats

use crate::error::{FeedbackError, Result};
use log::debug;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

fn html_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"))
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(FeedbackError::Io)?;
        Self::extract_blocking(bytes).await.map_err(|e| match e {
            FeedbackError::PdfExtraction(msg) => FeedbackError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }
}

impl PdfExtractor {
    /// Extract on the blocking pool; a parser panic becomes `PdfExtraction`
    pub async fn extract_blocking(bytes: Vec<u8>) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::extract_from_bytes(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    FeedbackError::PdfExtraction(
                        "Could not extract text from PDF. Please ensure it's not password-protected or corrupted."
                            .to_string(),
                    )
                } else {
                    FeedbackError::PdfExtraction(format!("Extraction task failed: {}", e))
                }
            })?
    }

    /// Extract and normalise text from an in-memory PDF
    pub fn extract_from_bytes(bytes: &[u8]) -> Result<String> {
        let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            FeedbackError::PdfExtraction(format!(
                "{}. Please ensure it's not password-protected or corrupted.",
                e
            ))
        })?;
        let text = normalize_whitespace(&raw);
        debug!("Extracted {} characters from PDF", text.len());
        Ok(text)
    }
}

/// Collapse runs of spaces inside each line and drop empty lines
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(FeedbackError::Io)?;
        Ok(content.trim().to_string())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await.map_err(FeedbackError::Io)?;
        Ok(self.markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(&self, markdown: &str) -> String {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        self.html_to_text(&html_output)
    }

    fn html_to_text(&self, html: &str) -> String {
        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let clean_text = html_tag_regex().replace_all(&text, "");

        let lines: Vec<String> = clean_text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        let raw = "  Jane   Doe \n\n\n Senior\tEngineer  \n   \n";
        assert_eq!(normalize_whitespace(raw), "Jane Doe\nSenior Engineer");
    }

    #[test]
    fn test_markdown_to_text_strips_formatting() {
        let text = MarkdownExtractor.markdown_to_text(
            "## Requirements\n\n- **Rust** &amp; Tokio\n- 5+ years <experience>\n",
        );
        assert!(text.contains("Requirements"));
        assert!(text.contains("Rust & Tokio"));
        assert!(!text.contains("##"));
        assert!(!text.contains("**"));
    }

    #[tokio::test]
    async fn test_damaged_pdf_never_panics() {
        let original = std::fs::read("tests/fixtures/sample_resume.pdf").unwrap();
        let len = original.len();

        let mut variants: Vec<Vec<u8>> = (1..=50).map(|k| original[..len * k / 51].to_vec()).collect();
        for k in 1..=52 {
            let mut flipped = original.clone();
            flipped[len * k / 53] ^= 0xFF;
            variants.push(flipped);
        }

        let mut failures = 0;
        for bytes in variants {
            match PdfExtractor::extract_blocking(bytes).await {
                Ok(_) => {}
                Err(FeedbackError::PdfExtraction(_)) => failures += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        assert!(failures > 0);
    }

    #[tokio::test]
    async fn test_extract_blocking_reads_fixture() {
        let bytes = std::fs::read("tests/fixtures/sample_resume.pdf").unwrap();
        let text = PdfExtractor::extract_blocking(bytes).await.unwrap();
        assert!(text.contains("Jane Doe"));
    }

    #[test]
    fn test_invalid_pdf_bytes() {
        let err = PdfExtractor::extract_from_bytes(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, FeedbackError::PdfExtraction(_)));
    }
}
