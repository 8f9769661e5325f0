use archive_core::ArchiveSummary;
use colored::Colorize;
use std::path::Path;

pub fn output_error(err: &anyhow::Error) {
    eprintln!("{}: {:#}", "error".red().bold(), err);
}

pub fn output_usage() {
    eprintln!("usage: issue-archive owner repo");
}

pub fn output_summary(summary: &ArchiveSummary, out_dir: &Path) {
    println!(
        "{} {} issues to {}",
        "Archived".green().bold(),
        summary.issues,
        out_dir.display().to_string().cyan()
    );
    println!("  {}: {}", "Assets".dimmed(), summary.assets_written);
    if summary.assets_skipped > 0 || summary.issues_skipped > 0 {
        println!(
            "  {}: {} assets, {} issues",
            "Skipped".yellow(),
            summary.assets_skipped,
            summary.issues_skipped
        );
    }
}
