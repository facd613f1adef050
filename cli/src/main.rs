use anyhow::{Context, Result};
use clap::Parser;

use image_converter::cli::Cli;
use image_converter::progress::BarObserver;
use image_converter_core::{convert_with_progress, plan, ConversionRequest};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    for dir in &cli.dirs {
        let request = cli.request_for(dir);
        if cli.dry_run {
            handle_dry_run(&request)?;
        } else {
            handle_convert(&request)?;
        }
    }

    if !cli.dry_run {
        println!("Image conversion complete");
    }
    Ok(())
}

fn handle_convert(request: &ConversionRequest) -> Result<()> {
    let observer = BarObserver::new();
    let result = convert_with_progress(request, &observer);
    observer.finish();

    let report = result.context("failed converting image")?;
    log::info!(
        "{}: converted {} file(s)",
        request.root_dir,
        report.success_count()
    );
    Ok(())
}

fn handle_dry_run(request: &ConversionRequest) -> Result<()> {
    let planned = plan(request).context("failed converting image")?;

    if planned.is_empty() {
        println!("No {} files found in {}.", request.input_format, request.root_dir);
        return Ok(());
    }

    println!("[dry-run] Would convert:");
    for (source, destination) in &planned {
        println!("  {} → {}", source.display(), destination.display());
    }
    Ok(())
}
