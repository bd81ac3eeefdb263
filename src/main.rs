//! cred-extract - streaming credential extraction for combo lists
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::fs;
use std::process;

use bytesize::ByteSize;
use cred_extract::cli::Args;
use cred_extract::output::{ensure_output_dir, generate_output_name};
use cred_extract::processor::{Pipeline, PipelineConfig};
use cred_extract::progress::{
    create_bytes_progress_bar, print_banner, print_error, print_header, print_info,
    print_success, print_summary, print_warning,
};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.quiet {
        print_banner();
    }

    let input_size = validate_args(&args)?;
    let config = PipelineConfig::from_args(&args, input_size)?;

    let output_dir = args.get_output_dir();
    ensure_output_dir(&output_dir)?;
    let output_name = args
        .output_name
        .clone()
        .unwrap_or_else(|| generate_output_name(&args.input, config.options.output_format));
    let output_path = output_dir.join(output_name);

    if output_path == args.input {
        anyhow::bail!("Output file would overwrite the input: {:?}", output_path);
    }

    if !args.quiet && args.verbose {
        print_config(&args, &config, input_size);
    }

    if !args.quiet {
        print_header("Extracting credentials...");
        print_info(&format!("Input:  {:?} ({})", args.input, ByteSize(input_size)));
        print_info(&format!("Output: {:?}", output_path));
    }

    let progress = if args.quiet {
        indicatif::ProgressBar::hidden()
    } else {
        create_bytes_progress_bar(input_size, "Processing...")
    };

    let pipeline = Pipeline::new(config).with_progress(progress.clone());

    match pipeline.process_file(&args.input, output_path) {
        Ok(outcome) => {
            progress.finish_and_clear();
            if !args.quiet {
                print_summary(&outcome.stats, "EXTRACTION COMPLETE");
                if outcome.matched_count == 0 {
                    print_warning("No credentials matched the requested format");
                }
                print_success(&format!(
                    "{} credentials written to: {}",
                    outcome.matched_count, outcome.output
                ));
            }
            Ok(())
        }
        Err(failure) => {
            progress.abandon();
            if !args.quiet && failure.stats.total_lines > 0 {
                print_summary(&failure.stats, "EXTRACTION ABORTED");
            }
            Err(failure.into())
        }
    }
}

/// Validate command-line arguments, returning the input size
fn validate_args(args: &Args) -> anyhow::Result<u64> {
    if !args.input.exists() {
        anyhow::bail!("Input path does not exist: {:?}", args.input);
    }

    if !args.input.is_file() {
        anyhow::bail!("Input must be a file: {:?}", args.input);
    }

    if !args.has_allowed_extension() {
        anyhow::bail!(
            "File type not allowed: {:?} (allowed: {})",
            args.input,
            args.get_extensions().join(", ")
        );
    }

    args.parse_flush_size()?;

    Ok(fs::metadata(&args.input)?.len())
}

/// Print configuration summary
fn print_config(args: &Args, config: &PipelineConfig, input_size: u64) {
    print_header("Configuration");

    print_info(&format!("Input:        {:?} ({})", args.input, ByteSize(input_size)));
    print_info(&format!("Output dir:   {:?}", args.get_output_dir()));
    print_info(&format!("Format:       {}", config.options.output_format));
    print_info(&format!("Strict email: {}", config.options.validate_email));
    print_info(&format!("Dedup:        {}", config.options.remove_duplicates));
    print_info(&format!("Strategy:     {:?}", config.dedup_strategy));
    print_info(&format!("Flush size:   {}", ByteSize(config.flush_threshold as u64)));
}
