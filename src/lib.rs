//! # cred-extract
//!
//! Streaming credential extraction for combo lists.
//!
//! ## Features
//!
//! - **Mixed formats**: `http(s)://host:user:pass`, `user:pass`, `user|pass`, `user<TAB>pass`
//! - **Email / username split**: keep only email combos or only username combos
//! - **Deduplication**: exact in-memory, or bounded-memory bloom filter
//! - **Large file support**: single streaming pass with buffered output flushing
//! - **Encoding detection**: BOM and charset sniffing, damaged bytes never abort a run
//!
//! ## Usage
//!
//! ```bash
//! # Email combos, deduplicated
//! cred-extract -i combo.txt
//!
//! # Username combos, keep duplicates
//! cred-extract -i combo.txt -f user --no-dedup
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use cred_extract::filter::OutputFormat;
//! use cred_extract::processor::{Pipeline, PipelineConfig, ProcessingOptions};
//! use std::path::{Path, PathBuf};
//!
//! let config = PipelineConfig {
//!     options: ProcessingOptions {
//!         remove_duplicates: true,
//!         validate_email: true,
//!         output_format: OutputFormat::Email,
//!     },
//!     ..PipelineConfig::default()
//! };
//!
//! let pipeline = Pipeline::new(config);
//! match pipeline.process_file(Path::new("combo.txt"), PathBuf::from("result_combo_email.txt")) {
//!     Ok(outcome) => println!("{} credentials written", outcome.matched_count),
//!     Err(failure) => eprintln!("{} ({} lines read)", failure.error, failure.stats.total_lines),
//! }
//! ```

pub mod cli;
pub mod dedup;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod output;
pub mod processor;
pub mod progress;

pub use cli::Args;
pub use error::{ExtractError, RunFailure};
pub use filter::OutputFormat;
pub use processor::{ExtractionOutcome, Pipeline, PipelineConfig, ProcessingOptions, RunStats};
