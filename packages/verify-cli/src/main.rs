//! Command-line driver for the verification pipeline.
//!
//! Reads the main and reference documents from disk, runs one analysis,
//! and prints (or writes) the exported text report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use verification::ai::OpenAI;
use verification::{
    render_text, AnalysisConfig, AnalysisPipeline, DocumentRef, FsDocumentSource, TracingProgress,
};

/// Cross-check a document against reference documents.
#[derive(Parser)]
#[command(name = "verify", version, about)]
struct Args {
    /// Path to the main document (plain text)
    main_document: PathBuf,

    /// Paths to one or more reference documents
    #[arg(required = true)]
    references: Vec<PathBuf>,

    /// Write the text report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chat model used for extraction and verification
    #[arg(long, default_value = "gpt-4o")]
    model: String,

    /// Entities per verification segment
    #[arg(long, default_value_t = 20)]
    segment_size: usize,

    /// Minimum cosine similarity (exclusive) for a reference match
    #[arg(long, default_value_t = 0.7)]
    similarity_threshold: f32,
}

fn document_ref(path: &PathBuf) -> DocumentRef {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    DocumentRef::new(name, path.display().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let ai = OpenAI::from_env()
        .context("OPENAI_API_KEY must be set (environment or .env)")?
        .with_model(&args.model);

    let config = AnalysisConfig::new()
        .with_segment_size(args.segment_size)
        .with_similarity_threshold(args.similarity_threshold);

    let pipeline = AnalysisPipeline::new(FsDocumentSource::new(), ai)
        .with_config(config)
        .with_progress(Arc::new(TracingProgress));

    let main = document_ref(&args.main_document);
    let references: Vec<DocumentRef> = args.references.iter().map(document_ref).collect();

    let report = pipeline
        .run(&main, &references)
        .await
        .context("analysis run failed")?;

    let text = render_text(&report);
    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("report written to {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}
