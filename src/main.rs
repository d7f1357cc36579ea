//! resume-feedback: AI-powered resume feedback and ATS scoring

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_feedback::cli::{self, Cli, Commands, ConfigAction};
use resume_feedback::config::{Config, OutputFormat};
use resume_feedback::error::{FeedbackError, Result};
use resume_feedback::input::InputManager;
use resume_feedback::llm::{FeedbackAnalyzer, GeminiClient};
use resume_feedback::output::formatter::{parse_output_format, save_report_to_file, suggest_filename};
use resume_feedback::output::{FeedbackReport, ReportGenerator};
use resume_feedback::pipeline::AnalysisPipeline;
use resume_feedback::storage::{resolve_id, FileKvStore, FileStore, RecordStore};
use resume_feedback::submission::{ResumeFile, Submission};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("{}", e);
        eprintln!("{} {}", "Error:".red().bold(), e.user_message());
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job_title,
            company,
            job_description,
            job_file,
            output,
            save,
            detailed,
            no_store,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;

            let job_description = match (job_description, job_file) {
                (Some(text), _) => text,
                (None, Some(path)) => {
                    cli::validate_file_extension(&path, &["txt", "md", "markdown"])
                        .map_err(|e| FeedbackError::InvalidInput(format!("Job description file: {}", e)))?;
                    InputManager::new().extract_text(&path).await?
                }
                (None, None) => {
                    return Err(FeedbackError::InvalidInput("Job description is required".to_string()));
                }
            };

            let resume_file = ResumeFile::inspect(&resume).await?;
            let submission = Submission::new(company, job_title, job_description, resume_file);
            submission.validate(&config.validation)?;

            let api_key = config.api_key()?;
            let client = GeminiClient::new(&config.ai, api_key)?;
            info!("Using model {}", client.model());

            let pipeline = AnalysisPipeline::new(
                FeedbackAnalyzer::new(client),
                FileStore::new(config.uploads_dir()),
                RecordStore::new(FileKvStore::new(config.kv_dir())),
                config.validation.clone(),
            )
            .with_storage(!no_store);

            let progress = ProgressBar::new(100);
            progress.set_style(
                ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );

            let outcome = match pipeline.run(&submission, &progress).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    progress.abandon_with_message("Analysis failed");
                    return Err(e);
                }
            };

            let report = FeedbackReport::new(outcome.record, outcome.saved, Some(outcome.processing_time_ms));
            emit_report(&report, &format, &config, detailed, save.as_deref())?;

            if outcome.saved {
                println!("\nSaved as {} (view again with: resume-feedback show {})", report.analysis.key(), report.analysis.id);
            }
        }

        Commands::Show { id, output, save, detailed } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let records = RecordStore::new(FileKvStore::new(config.kv_dir()));
            let id = resolve_id(&records, &id).await?;
            let record = records.load(&id).await?;

            let report = FeedbackReport::new(record, true, None);
            emit_report(&report, &format, &config, detailed, save.as_deref())?;
        }

        Commands::List => {
            let records = RecordStore::new(FileKvStore::new(config.kv_dir()));
            let all = records.list().await?;

            if all.is_empty() {
                println!("No stored analyses yet.");
                println!("Get started with: resume-feedback analyze --resume cv.pdf --job-title \"...\" --job-file job.md");
                return Ok(());
            }

            println!("{}", format!("{} stored analyses\n", all.len()).bold());
            for record in &all {
                let id = record.id.to_string();
                println!(
                    "{}  {}  {:>3}/100  {} at {} ({})",
                    id[..8].cyan(),
                    record.upload_date.format("%Y-%m-%d %H:%M"),
                    record.feedback.overall_score,
                    record.job_title,
                    record.company_name,
                    record.file_name
                );
            }
        }

        Commands::Delete { id } => {
            let records = RecordStore::new(FileKvStore::new(config.kv_dir()));
            let id = resolve_id(&records, &id).await?;
            match records.take(&id).await? {
                Some(record) => {
                    let files = FileStore::new(config.uploads_dir());
                    if files.remove(Path::new(&record.resume_path)).await? {
                        info!("Removed uploaded resume {}", record.resume_path);
                    }
                }
                None => warn!("Analysis {} was unreadable; its uploaded resume was left in place", id),
            }
            println!("✅ Deleted analysis {}", id);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("AI endpoint: {}", config.ai.endpoint);
                println!("Model: {}", config.ai.model);
                println!(
                    "API key variable: {} ({})",
                    config.ai.api_key_env,
                    if config.api_key().is_ok() { "set" } else { "not set" }
                );
                println!(
                    "Generation: temperature {}, topK {}, topP {}, max tokens {}",
                    config.ai.temperature, config.ai.top_k, config.ai.top_p, config.ai.max_output_tokens
                );
                println!("\nValidation:");
                println!("  Resume size: {} - {} bytes", config.validation.min_file_bytes, config.validation.max_file_bytes);
                println!("  Minimum job description: {} characters", config.validation.min_job_description_chars);
                println!("  Minimum resume text: {} characters", config.validation.min_resume_text_chars);
                println!("\nData directory: {}", config.storage.data_dir.display());
                println!("Output format: {:?}", config.output.format);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => parse_output_format(format).map_err(FeedbackError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn emit_report(
    report: &FeedbackReport,
    format: &OutputFormat,
    config: &Config,
    detailed: bool,
    save: Option<&Path>,
) -> Result<()> {
    // Colors only make sense when printing to the terminal
    let use_colors = config.output.color_output && save.is_none();
    let generator = ReportGenerator::with_options(
        use_colors,
        detailed || config.output.detailed,
        true,
        true,
        true,
    );
    let content = generator.generate_report(report, format)?;

    match save {
        Some(path) => {
            let path: PathBuf = if path.is_dir() {
                path.join(suggest_filename(format, &report.analysis.file_name, true))
            } else {
                path.to_path_buf()
            };
            save_report_to_file(&content, &path)?;
            println!("📄 Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
