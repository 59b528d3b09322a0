mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use pdf_splitter::{parse_page_list, parse_ranges, split_pdf, SplitRequest, SplitResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let request = build_request(&cli)?;
    let result = split_pdf(request);

    report(&result, cli.json)?;

    if !result.is_success() {
        error!("Operation failed: {}", result.message);
        std::process::exit(1);
    }

    Ok(())
}

fn build_request(cli: &Cli) -> anyhow::Result<SplitRequest> {
    let ranges = cli
        .ranges
        .as_deref()
        .map(parse_ranges)
        .transpose()
        .context("Failed to parse --ranges")?;

    let pages = cli
        .pages
        .as_deref()
        .map(parse_page_list)
        .transpose()
        .context("Failed to parse --pages")?;

    Ok(SplitRequest {
        input_path: cli.input.clone(),
        output_dir: Some(cli.output.clone()),
        mode: cli.mode,
        prefix: cli.prefix.clone(),
        ranges,
        pages,
        num_parts: cli.num_parts,
        verbose: cli.verbose,
    })
}

fn report(result: &SplitResult, json: bool) -> anyhow::Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(result).context("Failed to serialize split result")?;
        println!("{}", rendered);
        return Ok(());
    }

    if result.is_success() {
        info!("{}", result);
        for output_file in &result.output_files {
            println!("{}", output_file.display());
        }
    }

    Ok(())
}
