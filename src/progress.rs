//! Progress display module
//!
//! Styled console output, progress bars and the end-of-run summary.

use crate::processor::RunStats;
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║    ██████╗██████╗ ███████╗██████╗                                            ║
║   ██╔════╝██╔══██╗██╔════╝██╔══██╗                                           ║
║   ██║     ██████╔╝█████╗  ██║  ██║                                           ║
║   ██║     ██╔══██╗██╔══╝  ██║  ██║                                           ║
║   ╚██████╗██║  ██║███████╗██████╔╝                                           ║
║    ╚═════╝╚═╝  ╚═╝╚══════╝╚═════╝                                            ║
║                                                                              ║
║   ███████╗██╗  ██╗████████╗██████╗  █████╗  ██████╗████████╗                 ║
║   ██╔════╝╚██╗██╔╝╚══██╔══╝██╔══██╗██╔══██╗██╔════╝╚══██╔══╝                 ║
║   █████╗   ╚███╔╝    ██║   ██████╔╝███████║██║        ██║                    ║
║   ██╔══╝   ██╔██╗    ██║   ██╔══██╗██╔══██║██║        ██║                    ║
║   ███████╗██╔╝ ██╗   ██║   ██║  ██║██║  ██║╚██████╗   ██║                    ║
║   ╚══════╝╚═╝  ╚═╝   ╚═╝   ╚═╝  ╚═╝╚═╝  ╚═╝ ╚═════╝   ╚═╝                    ║
║                                                                              ║
║                   Streaming Credential Line Extraction                       ║
║                         For Penetration Testing                               ║
║                                                              v1.0.0          ║
╚══════════════════════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Create a bytes-based progress bar
pub fn create_bytes_progress_bar(total_bytes: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);

    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Print final statistics for a run
pub fn print_summary(stats: &RunStats, title: &str) {
    println!();
    println!("{}", "═".repeat(60).green());
    println!("{}", format!("                    {}", title).green().bold());
    println!("{}", "═".repeat(60).green());
    println!();

    println!("  {} {}", "Data processed: ".green(), ByteSize(stats.bytes_read));
    println!();

    println!("  {} {}", "Total lines:    ".green(), format_number(stats.total_lines));
    println!("  {} {}", "Matches found:  ".green().bold(),
        format_number(stats.matches_found).green().bold());
    println!("  {} {}", "Duplicates:     ".yellow(), format_number(stats.duplicates_removed));
    println!("  {} {}", "Invalid lines:  ".green(), format_number(stats.invalid_lines));

    if stats.filtered_lines > 0 {
        println!("  {} {}", "  wrong kind:   ".bright_black(),
            format_number(stats.filtered_lines).bright_black());
    }

    println!();
    println!("  {} {}", "Duration:       ".green(), format_duration(stats.processing_time));
    println!("  {} {:.2} lines/sec", "Throughput:     ".green(), stats.lines_per_second());
    println!();
    println!("{}", "═".repeat(60).green());
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
