use std::path::Path;

use colored::Colorize;

use crate::driver::{IterationFailure, RunSummary};

pub fn print_report_written(iteration: u32, path: &Path) {
    println!(
        "{} {}",
        format!("[{iteration}]").dimmed(),
        path.display().to_string().cyan()
    );
}

pub fn print_iteration_failure(failure: &IterationFailure) {
    eprintln!(
        "{} {}",
        format!("[{}]", failure.iteration).dimmed(),
        failure.error.to_string().red()
    );
}

pub fn print_run_summary(summary: &RunSummary) {
    let text = summary_text(summary);
    if summary.is_success() {
        println!("{}", text.green().bold());
    } else {
        println!("{}", text.red().bold());
    }
}

fn summary_text(summary: &RunSummary) -> String {
    let reports = format!("{} report(s) written", summary.reports.len());
    if summary.failures.is_empty() {
        reports
    } else {
        format!("{reports}, {} iteration(s) failed", summary.failures.len())
    }
}
