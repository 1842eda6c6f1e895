use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use code_ingest::ingest::SourceIngestor;
use llm_service::config::default_config::config_openrouter;
use llm_service::services::openrouter_service::OpenRouterService;
use review_core::cache::AnalysisCache;
use review_core::capability::NullCapability;
use review_core::dispatch::CodeAnalyzer;
use review_core::report::summarize;
use review_core::types::AnalysisKind;

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` is optional for local runs; deployments pass real env directly.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let source = match args.next() {
        Some(s) => s,
        None => bail!("usage: code-review-ai <project-dir | archive.zip> [kind,kind,...]"),
    };
    let kinds = match args.next() {
        Some(spec) => parse_kinds(&spec)?,
        None => vec![
            AnalysisKind::Security,
            AnalysisKind::Performance,
            AnalysisKind::Architecture,
            AnalysisKind::Style,
        ],
    };

    let ingestor = SourceIngestor::default();
    let files = if source.ends_with(".zip") {
        let bytes =
            std::fs::read(&source).with_context(|| format!("reading archive {source}"))?;
        ingestor
            .ingest_archive(&bytes)
            .with_context(|| format!("extracting archive {source}"))?
    } else {
        ingestor.ingest_directory(Path::new(&source))
    };
    tracing::info!(files = files.len(), source = %source, "ingestion finished");

    let cache_dir = std::env::var("REVIEW_CACHE_DIR")
        .unwrap_or_else(|_| "code_data/review_cache".to_string());
    let cache = AnalysisCache::new(cache_dir);

    let aggregate = match config_openrouter() {
        Ok(cfg) => {
            let client = OpenRouterService::new(cfg)?;
            CodeAnalyzer::new(client, cache)
                .analyze_codebase(&files, &kinds)
                .await?
        }
        Err(err) => {
            tracing::warn!(%err, "analysis capability not configured; per-kind results will be empty");
            CodeAnalyzer::new(NullCapability, cache)
                .analyze_codebase(&files, &kinds)
                .await?
        }
    };

    let report = summarize(aggregate);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn parse_kinds(spec: &str) -> Result<Vec<AnalysisKind>> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| AnalysisKind::from_tag(s).with_context(|| format!("unknown analysis kind: {s}")))
        .collect()
}
