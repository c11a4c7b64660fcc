//! Subcommand handlers; each returns the process exit code

use super::commands::{FormatArgs, RunArgs};
use super::output::{OutputFormatter, ProviderStatus};
use crate::config::AppConfig;
use crate::llm::{build_gateway, ProviderSelection};
use crate::pipeline::PipelineOrchestrator;
use crate::progress::LoggingHandler;
use crate::store::JsonFileStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

fn report(result: Result<String>, quiet: bool) -> i32 {
    match result {
        Ok(output) => {
            if !quiet {
                print!("{}", output);
                if !output.ends_with('\n') {
                    println!();
                }
            }
            0
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

pub async fn handle_run(args: &RunArgs, config: &AppConfig, quiet: bool) -> i32 {
    report(run(args, config).await, quiet)
}

async fn run(args: &RunArgs, config: &AppConfig) -> Result<String> {
    let selection = args
        .providers
        .as_deref()
        .map(ProviderSelection::from_list)
        .unwrap_or_default();

    let gateway = build_gateway(config, &selection).context("Failed to initialize providers")?;

    let data_file = args.data_file.clone().unwrap_or_else(|| config.data_file());
    info!("Dataset: {}", data_file.display());

    let orchestrator = PipelineOrchestrator::new(
        Arc::new(JsonFileStore::new(data_file)),
        Arc::new(gateway),
        config.crawler.max_content_length,
    )
    .with_progress(Arc::new(LoggingHandler));

    let summary = orchestrator
        .run(&args.content, !args.single)
        .await
        .context("Harvest failed")?;

    OutputFormatter::new(args.format.into()).format_summary(&summary)
}

pub fn handle_providers(args: &FormatArgs, config: &AppConfig) -> i32 {
    let statuses = ProviderStatus::collect(config);
    report(
        OutputFormatter::new(args.format.into()).format_providers(&statuses),
        false,
    )
}

pub fn handle_config(args: &FormatArgs, config: &AppConfig) -> i32 {
    report(
        OutputFormatter::new(args.format.into()).format_config(config),
        false,
    )
}
