//! Command-line interface definition for cred-extract
//!
//! Provides argument parsing and validation for the credential extractor.

use crate::filter::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Streaming credential extractor for combo lists
///
/// Pull identifier/password pairs out of mixed-format credential dumps,
/// keep only email or only username combos, and remove duplicates.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cred-extract",
    author = "m0h1nd4",
    version,
    about = "Streaming credential extractor for combo lists",
    long_about = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                           CRED-EXTRACT v1.0.0                                ║
║                     Streaming Credential Line Extraction                      ║
║                         For Penetration Testing                               ║
╚══════════════════════════════════════════════════════════════════════════════╝

Extract identifier:password pairs from mixed-format credential dumps.
Files are streamed line by line, so inputs far larger than RAM are fine.

RECOGNIZED LINE FORMATS (first match wins):
    http(s)://host:identifier:secret
    identifier:secret
    identifier|secret
    identifier<TAB>secret

EXAMPLES:
    # Email combos, deduplicated (writes result_combo_email.txt)
    cred-extract -i combo.txt

    # Username combos only
    cred-extract -i combo.txt -f user

    # Keep duplicates, loose email detection
    cred-extract -i combo.txt --no-dedup --no-validate-email

    # Huge input with bounded dedup memory
    cred-extract -i dump.txt --dedup-strategy bloom -o ./results
"#,
    after_help = "For more information, visit: https://github.com/m0h1nd4/cred-extract"
)]
pub struct Args {
    /// Input credential file
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output directory (default: directory of the input file)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output filename (default: result_<input>_<format>.txt)
    #[arg(long, value_name = "NAME")]
    pub output_name: Option<String>,

    /// Which identifiers to keep
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Email)]
    pub format: OutputFormat,

    /// Keep duplicate lines
    #[arg(long, default_value_t = false)]
    pub no_dedup: bool,

    /// Use the loose email heuristic ('@' followed by a '.') instead of strict validation
    #[arg(long, default_value_t = false)]
    pub no_validate_email: bool,

    /// Deduplication strategy
    #[arg(long, value_enum, default_value_t = DedupStrategy::Memory)]
    pub dedup_strategy: DedupStrategy,

    /// Output buffer size before flushing to disk (e.g., "10MB", "512KB")
    #[arg(long, value_name = "SIZE", default_value = "10MB")]
    pub flush_size: String,

    /// Allowed input file extensions
    #[arg(long, value_name = "EXT", default_value = "txt,log,csv")]
    pub extensions: String,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Deduplication strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DedupStrategy {
    /// In-memory HashSet (exact, memory grows with unique lines)
    #[default]
    Memory,
    /// Bloom filter (fixed memory, may drop ~0.1% of unique lines)
    Bloom,
}

impl Args {
    /// Parse the flush threshold to bytes
    pub fn parse_flush_size(&self) -> anyhow::Result<usize> {
        let size = parse_size(&self.flush_size)?;
        if size == 0 {
            anyhow::bail!("Flush size must be greater than zero");
        }
        Ok(size)
    }

    /// Output directory, defaulting to the input's directory
    pub fn get_output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// Parse allowed input extensions
    pub fn get_extensions(&self) -> Vec<String> {
        self.extensions
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Whether the input file has an allowed extension
    pub fn has_allowed_extension(&self) -> bool {
        let allowed = self.get_extensions();
        self.input
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |ext| allowed.contains(&ext.to_lowercase()))
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size_str: &str) -> anyhow::Result<usize> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = size_str.strip_suffix('B') {
        (n, 1)
    } else {
        (size_str.as_str(), 1)
    };

    let num: usize = num_str.trim().parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Size too large: '{}'", size_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["cred-extract"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["-i", "/data/combo.txt"]);

        assert_eq!(args.format, OutputFormat::Email);
        assert!(!args.no_dedup);
        assert!(!args.no_validate_email);
        assert_eq!(args.dedup_strategy, DedupStrategy::Memory);
        assert_eq!(args.parse_flush_size().unwrap(), 10 * 1024 * 1024);
        assert_eq!(args.get_output_dir(), PathBuf::from("/data"));
        assert_eq!(args.output_name, None);
    }

    #[test]
    fn test_user_format_and_flags() {
        let args = parse(&[
            "-i", "combo.txt", "-f", "user", "--no-dedup", "--no-validate-email",
            "--dedup-strategy", "bloom", "-o", "out",
        ]);

        assert_eq!(args.format, OutputFormat::User);
        assert!(args.no_dedup);
        assert!(args.no_validate_email);
        assert_eq!(args.dedup_strategy, DedupStrategy::Bloom);
        assert_eq!(args.get_output_dir(), PathBuf::from("out"));
    }

    #[test]
    fn test_output_dir_for_bare_filename() {
        let args = parse(&["-i", "combo.txt"]);
        assert_eq!(args.get_output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["cred-extract", "-i", "a.txt", "-f", "xml"]).is_err());
    }

    #[test]
    fn test_extensions() {
        let args = parse(&["-i", "dump.LOG", "--extensions", "txt, .log ,"]);

        assert_eq!(args.get_extensions(), vec!["txt", "log"]);
        assert!(args.has_allowed_extension());

        let args = parse(&["-i", "dump.zip"]);
        assert!(!args.has_allowed_extension());
    }

    #[test]
    fn test_zero_flush_size_rejected() {
        let args = parse(&["-i", "a.txt", "--flush-size", "0"]);
        assert!(args.parse_flush_size().is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64MB").unwrap(), 64 * 1024 * 1024);
        assert_eq!(parse_size("1GB").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("512kb").unwrap(), 512 * 1024);
        assert_eq!(parse_size("100").unwrap(), 100);
        assert!(parse_size("lots").is_err());
    }
}
