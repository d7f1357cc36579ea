//! CLI interface for resume feedback

use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-feedback")]
#[command(about = "AI-powered resume feedback and ATS scoring")]
#[command(long_about = "Upload a PDF resume with a target job description and get an ATS score, content and formatting feedback, and tailored recommendations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    #[command(group(
        ArgGroup::new("job_source")
            .required(true)
            .args(["job_description", "job_file"]),
    ))]
    Analyze {
        /// Path to the resume PDF
        #[arg(short, long)]
        resume: PathBuf,

        /// Target job title
        #[arg(short = 't', long)]
        job_title: String,

        /// Company name (defaults to "Target Company")
        #[arg(long)]
        company: Option<String>,

        /// Job description text
        #[arg(short = 'd', long)]
        job_description: Option<String>,

        /// Read the job description from a file (TXT, MD)
        #[arg(short = 'j', long)]
        job_file: Option<PathBuf>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show job description and extracted text preview
        #[arg(long)]
        detailed: bool,

        /// Do not keep the uploaded resume or the results
        #[arg(long)]
        no_store: bool,
    },

    /// Show a stored analysis
    Show {
        /// Analysis id (a unique prefix is enough)
        id: String,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show job description and extracted text preview
        #[arg(long)]
        detailed: bool,
    },

    /// List stored analyses, newest first
    List,

    /// Delete a stored analysis and its uploaded resume
    Delete {
        /// Analysis id (a unique prefix is enough)
        id: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
