//! Cough Analyzer - command line entry point

use anyhow::Context;
use clap::Parser;
use std::process;
use cough_analyzer::{init_logging, Args, Config, FeaturePipeline, InputSource};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        println!("{}", cough_analyzer::get_library_info());
        println!();
    }

    let config = Config::from_args_and_config(&args).context("Invalid configuration")?;
    let input = InputSource::from_options(args.input_file.as_deref(), args.input_dir.as_deref())?;

    println!("=== Cough Analyzer ===");
    match &input {
        InputSource::File(path) => println!("Input file: {}", path.display()),
        InputSource::Directory(path) => println!("Input directory: {}", path.display()),
    }
    println!("Output: {}", config.output_dir().display());
    println!("Sample rate: {} Hz", config.sample_rate());
    println!("======================\n");

    let pipeline = FeaturePipeline::new(config)?;
    let report = pipeline
        .run(&input)
        .context("Feature extraction failed")?;

    println!("=== Processing Complete ===");
    println!("Files: {}", report.files_processed);
    println!("Segments: {}", report.segment_count());
    println!("Features: {}", report.csv_path.display());
    if pipeline.config().verbose() {
        println!("Time: {:.2}s", report.processing_time.as_secs_f64());
    }

    Ok(())
}
