use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docuclip::analysis::{analyze_entries, AnalysisOptions};
use docuclip::enrich::AiEnrichment;
use docuclip::export::{self, VideoMeta};
use docuclip::project::{Project, ProjectStore};
use docuclip::transcript::{self, TranscriptInput};

#[derive(Parser)]
#[command(
    name = "docuclip",
    about = "Segment interview transcripts into documentary clips with cutting metadata"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a transcript file (SRT, structured JSON or plain text)
    Analyze {
        /// Path to the transcript file
        transcript: PathBuf,
        /// Editorial direction forwarded to the optional AI enrichment
        #[arg(long)]
        direction: Option<String>,
        /// Seed for the emotional-beat jitter, for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Write the full processing document to this path
        #[arg(long)]
        export: Option<PathBuf>,
        /// Treat plain text as untimed prose with fixed word-rate timing
        #[arg(long)]
        word_rate: bool,
        /// Project title (defaults to the transcript file name)
        #[arg(long)]
        title: Option<String>,
        /// Save the result to the project store
        #[arg(long)]
        save: bool,
        /// Refine titles via the Anthropic API when ANTHROPIC_API_KEY is set
        #[arg(long)]
        ai: bool,
    },
    /// List saved projects
    Projects,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze {
            transcript,
            direction,
            seed,
            export,
            word_rate,
            title,
            save,
            ai,
        } => {
            run_analyze(transcript, direction, seed, export, word_rate, title, save, ai).await
        }
        Command::Projects => run_projects(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_analyze(
    transcript_path: PathBuf,
    direction: Option<String>,
    seed: Option<u64>,
    export_path: Option<PathBuf>,
    word_rate: bool,
    title: Option<String>,
    save: bool,
    ai: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(&transcript_path)
        .with_context(|| format!("failed to read {}", transcript_path.display()))?;

    let options = AnalysisOptions {
        custom_direction: direction,
        jitter_seed: seed,
    };

    // Structured JSON first, then SRT/plain-text detection on the raw text.
    let entries = if let Ok(raw) = serde_json::from_str::<Vec<transcript::RawEntry>>(&text) {
        transcript::normalize(&TranscriptInput::Structured(raw))
    } else if word_rate && !text.contains("-->") {
        transcript::word_rate_entries(&text)
    } else {
        transcript::normalize(&TranscriptInput::from_text(text))
    };

    let mut segments = analyze_entries(entries, &options)
        .context("transcript analysis failed")?;

    if ai {
        match AiEnrichment::from_env() {
            Some(client) => {
                client
                    .enrich(&mut segments, options.custom_direction.as_deref())
                    .await;
            }
            None => eprintln!("ANTHROPIC_API_KEY not set, keeping heuristic titles"),
        }
    }

    for segment in &segments {
        println!(
            "[{}] {}-{}  {:<10} intensity {:>2}  {}",
            segment.id,
            segment.display_start,
            segment.display_end,
            segment.category.as_str(),
            segment.intensity,
            segment.title,
        );
    }
    println!("{} clips", segments.len());

    let project_title = title.unwrap_or_else(|| {
        transcript_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Documentary Project")
            .to_string()
    });

    if let Some(path) = export_path {
        let meta = VideoMeta {
            title: project_title.clone(),
            ..Default::default()
        };
        let document = export::processing_document(&segments, &meta);
        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;

        let summary = export::summary(&document)?;
        println!(
            "Exported {} ({} overlays, {} transitions, complexity {}, ~{})",
            path.display(),
            summary.total_overlays,
            summary.total_transitions,
            summary.processing_complexity,
            summary.file_size_estimate,
        );
    }

    if save {
        let store = ProjectStore::open_default()?;
        let id = store.save(&Project::new(project_title, segments))?;
        println!("Saved project {id}");
    }

    Ok(())
}

fn run_projects() -> Result<()> {
    let store = ProjectStore::open_default()?;
    let projects = store.list()?;

    if projects.is_empty() {
        println!("No saved projects");
        return Ok(());
    }

    for project in projects {
        println!(
            "{}  {}  {} ({} clips)",
            project.created_at.format("%Y-%m-%d %H:%M"),
            project.id.as_deref().unwrap_or("-"),
            project.title,
            project.clip_count,
        );
    }

    Ok(())
}
