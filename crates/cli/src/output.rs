//! Terminal output formatting.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use questpack_core::HostCall;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", style("ℹ").blue().bold(), message);
}

/// Prints an entry point header.
pub fn entry_header(entry: &str) {
    println!("\n{} {}", style("▶").cyan().bold(), style(entry).cyan().bold());
}

/// Prints one recorded host call.
pub fn host_call(call: &HostCall) {
    println!("  {} {}", style("→").dim(), call);
}

/// Prints an entry point that made no host calls.
pub fn no_calls() {
    println!("  {}", style("(no host calls)").dim());
}

/// Prints an entry point that trapped.
pub fn entry_failed(error: &str) {
    eprintln!("  {} {}", style("✗").red(), style(error).red());
}

/// Prints a summary of the transcript.
pub fn summary(entries: usize, calls: usize, failed: bool) {
    println!();

    if failed {
        println!(
            "{}: {} entry points, {} host calls before the fault",
            style("FAULTED").red().bold(),
            entries,
            calls
        );
    } else {
        println!(
            "{}: {} entry points, {} host calls",
            style("SUCCESS").green().bold(),
            entries,
            calls
        );
    }
}

/// Creates a spinner for long-running operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Finishes a spinner with success.
pub fn spinner_success(spinner: &ProgressBar, message: &str) {
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{msg}")
            .expect("Invalid spinner template"),
    );
    spinner.finish_with_message(format!("{} {}", style("✓").green(), message));
}

/// Finishes a spinner with failure.
pub fn spinner_failure(spinner: &ProgressBar, message: &str) {
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{msg}")
            .expect("Invalid spinner template"),
    );
    spinner.finish_with_message(format!("{} {}", style("✗").red(), message));
}

/// Prints a key-value pair.
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}
