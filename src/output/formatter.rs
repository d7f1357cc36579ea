//! Output formatters: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{FeedbackError, Result};
use crate::output::report::FeedbackReport;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting feedback reports
pub trait OutputFormatter {
    fn format_report(&self, report: &FeedbackReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and API integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter with embedded styling
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Feedback: {{ job_title }} at {{ company_name }}</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 860px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .header { text-align: center; border-bottom: 3px solid #667eea; padding-bottom: 20px; }
        .score-badge { display: inline-block; padding: 6px 14px; border-radius: 20px; font-weight: bold; color: white; }
        .band-strong { background: #28a745; }
        .band-good-start { background: #ffc107; color: #000; }
        .band-needs-work { background: #dc3545; }
        .scores { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 15px; margin: 20px 0; }
        .score-item { background: #f8f9fa; padding: 15px; border-radius: 6px; border-left: 4px solid #764ba2; }
        .notice { background: #fff3cd; border: 1px solid #ffe69c; padding: 10px 15px; border-radius: 6px; }
        h2 { color: #667eea; border-bottom: 2px solid #e9ecef; padding-bottom: 8px; }
        .skills span { display: inline-block; margin: 2px 4px; padding: 2px 10px; border-radius: 12px; background: #e9ecef; }
        .footer { margin-top: 30px; font-size: 0.85em; color: #6c757d; text-align: center; }
    </style>
    {% endif %}
</head>
<body>
<div class="container">
    <div class="header">
        <h1>Resume Feedback</h1>
        <p>{{ job_title }} at {{ company_name }} &middot; {{ file_name }}</p>
        <p><strong>{{ overall_score }}/100</strong> <span class="score-badge {{ band_class }}">{{ band }}</span></p>
        <p>{{ verdict }}</p>
    </div>
    {% if is_fallback %}
    <p class="notice">The AI answer could not be parsed, so these are general recommendations.</p>
    {% endif %}
    <div class="scores">
        <div class="score-item">ATS<br><strong>{{ ats_score }}</strong></div>
        <div class="score-item">Formatting<br><strong>{{ formatting_score }}</strong></div>
        <div class="score-item">Job relevance<br><strong>{{ relevance_score }}</strong></div>
    </div>
    {% for section in sections %}
    {% if !section.items.is_empty() %}
    <div class="section">
        <h2>{{ section.title }}</h2>
        <ul>
        {% for item in section.items %}
            <li>{{ item }}</li>
        {% endfor %}
        </ul>
    </div>
    {% endif %}
    {% endfor %}
    <div class="section skills">
        <h2>Skills</h2>
        <p>Matching: {% for skill in matching_skills %}<span>{{ skill }}</span>{% endfor %}</p>
        <p>Missing: {% for skill in missing_skills %}<span>{{ skill }}</span>{% endfor %}</p>
    </div>
    <div class="footer">Analysis {{ id }} &middot; Generated {{ generated_at }} by resume-feedback v{{ version }}</div>
</div>
</body>
</html>
"#
)]
struct HtmlTemplate {
    include_styles: bool,
    id: String,
    job_title: String,
    company_name: String,
    file_name: String,
    overall_score: u8,
    band: String,
    band_class: String,
    verdict: String,
    is_fallback: bool,
    ats_score: u8,
    formatting_score: u8,
    relevance_score: u8,
    sections: Vec<HtmlSection>,
    matching_skills: Vec<String>,
    missing_skills: Vec<String>,
    generated_at: String,
    version: String,
}

struct HtmlSection {
    title: &'static str,
    items: Vec<String>,
}

/// Titled lists shared by the text-based formatters
fn feedback_sections(report: &FeedbackReport) -> Vec<(&'static str, &[String])> {
    let feedback = &report.analysis.feedback;
    vec![
        ("ATS Tips", feedback.ats.tips.as_slice()),
        ("Strengths", feedback.content_analysis.strengths.as_slice()),
        ("Improvements", feedback.content_analysis.improvements.as_slice()),
        ("Formatting Suggestions", feedback.formatting.suggestions.as_slice()),
        ("Recommendations", feedback.recommendations.as_slice()),
    ]
}

fn format_timestamp(report: &FeedbackReport) -> String {
    report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score(&self, score: u8) -> String {
        let color = match score {
            71..=u8::MAX => Color::Green,
            50..=70 => Color::Yellow,
            _ => Color::Red,
        };
        if self.use_colors {
            format!("{}/100", score).color(color).bold().to_string()
        } else {
            format!("{}/100", score)
        }
    }

    fn format_badge(&self, band: &str) -> String {
        if self.use_colors {
            format!("[{}]", band.bold())
        } else {
            format!("[{}]", band)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &FeedbackReport) -> Result<String> {
        let analysis = &report.analysis;
        let feedback = &analysis.feedback;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME FEEDBACK", 1));
        output.push_str(&format!(
            "{} at {} | {} ({:.1} KB)\n",
            analysis.job_title,
            analysis.company_name,
            analysis.file_name,
            analysis.file_size as f64 / 1024.0
        ));
        output.push_str(&format!("Analysis ID: {}\n", analysis.id));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Overall Score: {} {}\n",
            self.format_score(report.summary.overall_score),
            self.format_badge(&report.summary.band)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.summary.verdict, Color::Cyan)));
        if report.summary.is_fallback {
            output.push_str(&self.colorize(
                "Note: the AI answer could not be parsed; showing general recommendations.\n",
                Color::Yellow,
            ));
        }

        output.push_str(&self.format_header("Scores", 3));
        output.push_str(&format!("  • ATS: {}\n", self.format_score(report.summary.ats_score)));
        output.push_str(&format!("  • Formatting: {}\n", self.format_score(report.summary.formatting_score)));
        output.push_str(&format!("  • Job relevance: {}\n", self.format_score(report.summary.relevance_score)));

        for (title, items) in feedback_sections(report) {
            if items.is_empty() {
                continue;
            }
            output.push_str(&self.format_header(title, 3));
            for (i, item) in items.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, item));
            }
        }

        let skills = &feedback.job_match_analysis;
        if !skills.matching_skills.is_empty() || !skills.missing_skills.is_empty() {
            output.push_str(&self.format_header("Skills", 3));
            if !skills.matching_skills.is_empty() {
                output.push_str(&format!(
                    "  ✓ Matching: {}\n",
                    self.colorize(&skills.matching_skills.join(", "), Color::Green)
                ));
            }
            if !skills.missing_skills.is_empty() {
                output.push_str(&format!(
                    "  ✗ Missing: {}\n",
                    self.colorize(&skills.missing_skills.join(", "), Color::Red)
                ));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Job Description", 3));
            output.push_str(&analysis.job_description);
            output.push('\n');
            output.push_str(&self.format_header("Extracted Resume Text (preview)", 3));
            output.push_str(&analysis.extracted_text);
            output.push('\n');
            output.push_str(&format!("\nStored resume: {}\n", analysis.resume_path));
        }

        output.push_str(&format!("\nGenerated: {}", format_timestamp(report)));
        if let Some(ms) = report.metadata.processing_time_ms {
            output.push_str(&format!(" | Processing time: {}ms", ms));
        }
        output.push('\n');
        if !report.metadata.saved {
            output.push_str(&self.colorize("Results were not saved.\n", Color::Yellow));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &FeedbackReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_badge(score: u8) -> &'static str {
        match score {
            71..=u8::MAX => "🟢",
            50..=70 => "🟡",
            _ => "🔴",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &FeedbackReport) -> Result<String> {
        let analysis = &report.analysis;
        let summary = &report.summary;
        let mut output = String::new();

        output.push_str(&format!(
            "# Resume Feedback: {} at {}\n\n",
            analysis.job_title, analysis.company_name
        ));
        output.push_str(&format!(
            "**Overall Score:** {} {}/100 ({})\n\n",
            Self::markdown_badge(summary.overall_score),
            summary.overall_score,
            summary.band
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", summary.verdict));
        if summary.is_fallback {
            output.push_str("> The AI answer could not be parsed; these are general recommendations.\n\n");
        }

        output.push_str("| Category | Score |\n");
        output.push_str("|----------|-------|\n");
        output.push_str(&format!("| ATS | {} |\n", summary.ats_score));
        output.push_str(&format!("| Formatting | {} |\n", summary.formatting_score));
        output.push_str(&format!("| Job relevance | {} |\n\n", summary.relevance_score));

        for (title, items) in feedback_sections(report) {
            if items.is_empty() {
                continue;
            }
            output.push_str(&format!("## {}\n\n", title));
            for item in items {
                output.push_str(&format!("- {}\n", item));
            }
            output.push('\n');
        }

        let skills = &analysis.feedback.job_match_analysis;
        output.push_str("## Skills\n\n");
        output.push_str(&format!("- **Matching:** {}\n", join_or_none(&skills.matching_skills)));
        output.push_str(&format!("- **Missing:** {}\n", join_or_none(&skills.missing_skills)));

        if self.include_metadata {
            output.push_str("\n---\n\n");
            output.push_str(&format!("- Analysis ID: `{}`\n", analysis.id));
            output.push_str(&format!("- Resume: {} ({} bytes)\n", analysis.file_name, analysis.file_size));
            output.push_str(&format!("- Analyzed: {}\n", analysis.upload_date.format("%Y-%m-%d %H:%M UTC")));
            output.push_str(&format!(
                "- Generated: {} by resume-feedback v{}\n",
                format_timestamp(report),
                report.metadata.tool_version
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &FeedbackReport) -> HtmlTemplate {
        let analysis = &report.analysis;
        let skills = &analysis.feedback.job_match_analysis;

        let band_class = format!("band-{}", report.summary.band.to_lowercase().replace(' ', "-"));

        HtmlTemplate {
            include_styles: self.include_styles,
            id: analysis.id.to_string(),
            job_title: analysis.job_title.clone(),
            company_name: analysis.company_name.clone(),
            file_name: analysis.file_name.clone(),
            overall_score: report.summary.overall_score,
            band: report.summary.band.clone(),
            band_class,
            verdict: report.summary.verdict.clone(),
            is_fallback: report.summary.is_fallback,
            ats_score: report.summary.ats_score,
            formatting_score: report.summary.formatting_score,
            relevance_score: report.summary.relevance_score,
            sections: feedback_sections(report)
                .into_iter()
                .map(|(title, items)| HtmlSection {
                    title,
                    items: items.to_vec(),
                })
                .collect(),
            matching_skills: skills.matching_skills.clone(),
            missing_skills: skills.missing_skills.clone(),
            generated_at: format_timestamp(report),
            version: report.metadata.tool_version.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &FeedbackReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| FeedbackError::OutputFormatting(format!("HTML template error: {}", e)))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &FeedbackReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("{}_feedback{}.{}", base_name, timestamp_suffix, extension)
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> std::result::Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Feedback, FeedbackSource};
    use crate::record::{AnalysisRecord, AnalysisStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn report(source: FeedbackSource) -> FeedbackReport {
        let mut feedback = Feedback::fallback("Site Reliability Engineer", "Globex");
        feedback.overall_score = 64;
        feedback.job_match_analysis.missing_skills = vec!["Terraform".to_string(), "<script>".to_string()];
        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            resume_path: "/tmp/uploads/cv.pdf".to_string(),
            company_name: "Globex".to_string(),
            job_title: "Site Reliability Engineer".to_string(),
            job_description: "Keep production healthy.".to_string(),
            feedback,
            feedback_source: source,
            file_name: "jane_doe.pdf".to_string(),
            file_size: 20480,
            upload_date: Utc::now(),
            status: AnalysisStatus::Completed,
            extracted_text: "Jane Doe, SRE...".to_string(),
        };
        FeedbackReport::new(record, false, Some(850))
    }

    #[test]
    fn test_console_plain() {
        let text = ConsoleFormatter::new(false, true)
            .format_report(&report(FeedbackSource::Model))
            .unwrap();
        assert!(text.contains("Site Reliability Engineer at Globex | jane_doe.pdf (20.0 KB)"));
        assert!(text.contains("Overall Score: 64/100 [Good Start]"));
        assert!(text.contains("  • ATS: 75/100"));
        assert!(text.contains("  1. Optimize for Site Reliability Engineer keywords"));
        assert!(text.contains("✗ Missing: Terraform, <script>"));
        assert!(text.contains("Extracted Resume Text (preview)"));
        assert!(text.contains("Processing time: 850ms"));
        assert!(text.contains("Results were not saved."));
        assert!(!text.contains("could not be parsed"));
    }

    #[test]
    fn test_console_fallback_notice() {
        let text = ConsoleFormatter::new(false, false)
            .format_report(&report(FeedbackSource::Fallback))
            .unwrap();
        assert!(text.contains("could not be parsed"));
        assert!(!text.contains("Extracted Resume Text"));
    }

    #[test]
    fn test_json_output() {
        let text = JsonFormatter::new(false).format_report(&report(FeedbackSource::Model)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["overall_score"], 64);
        assert_eq!(value["analysis"]["feedback"]["ATS"]["score"], 75);
        assert_eq!(value["analysis"]["jobTitle"], "Site Reliability Engineer");
    }

    #[test]
    fn test_markdown_output() {
        let text = MarkdownFormatter::new(true).format_report(&report(FeedbackSource::Model)).unwrap();
        assert!(text.starts_with("# Resume Feedback: Site Reliability Engineer at Globex"));
        assert!(text.contains("**Overall Score:** 🟡 64/100 (Good Start)"));
        assert!(text.contains("| ATS | 75 |"));
        assert!(text.contains("## Recommendations\n\n- Tailor resume for Site Reliability Engineer role"));
        assert!(text.contains("- **Missing:** Terraform, <script>"));
        assert!(text.contains("- Resume: jane_doe.pdf (20480 bytes)"));
    }

    #[test]
    fn test_html_output_is_escaped() {
        let html = HtmlFormatter::new(true).format_report(&report(FeedbackSource::Model)).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Resume Feedback: Site Reliability Engineer at Globex</title>"));
        assert!(html.contains("band-good-start"));
        assert!(html.contains("<li>Use ATS-friendly formatting</li>"));
        // askama may emit named or numeric references
        assert!(html.contains("&#60;script&#62;") || html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<style>"));

        let bare = HtmlFormatter::new(false).format_report(&report(FeedbackSource::Model)).unwrap();
        assert!(!bare.contains("<style>"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, false, false);
        let report = report(FeedbackSource::Model);
        let md = generator.generate_report(&report, &OutputFormat::Markdown).unwrap();
        assert!(!md.contains("Analysis ID"));
        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.contains("\n  \"summary\""));
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert_eq!(parse_output_format("html").unwrap(), OutputFormat::Html);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "/home/jane/cv.pdf", false),
            "cv_feedback.md"
        );
        let stamped = suggest_filename(&OutputFormat::Html, "cv.pdf", true);
        assert!(stamped.starts_with("cv_feedback_"));
        assert!(stamped.ends_with(".html"));
    }

    #[test]
    fn test_save_report_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("cv_feedback.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi");
    }
}
