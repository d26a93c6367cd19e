// UI module for consistent terminal output with progress bars and styling
//
// Everything the user sees goes through here; the rest of the crate logs.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Check if stderr is a TTY (for interactive output)
pub fn is_tty() -> bool {
    Term::stderr().is_term()
}

fn template(spinner: bool, template: &str) -> ProgressStyle {
    let base = if spinner {
        ProgressStyle::default_spinner()
    } else {
        ProgressStyle::default_bar()
    };
    base.template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS)
}

/// Create a styled spinner for blocking work
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if !is_tty() {
        // Non-TTY output only shows the final line
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb.set_style(template(true, "{spinner:.cyan} {msg}"));
    pb.set_message(message.to_string());

    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }

    pb
}

/// Create a progress bar for installer downloads; size may be unknown
pub fn download_bar(total_size: Option<u64>, name: &str) -> ProgressBar {
    let pb = match total_size {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                template(
                    false,
                    "{spinner:.cyan} {msg} [{bar:25.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec})",
                )
                .progress_chars("━━╺"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(template(true, "{spinner:.cyan} {msg} {bytes} ({bytes_per_sec})"));
            pb
        }
    };
    if !is_tty() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_message(name.to_string());
    pb
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print an info/action message with arrow
pub fn action(message: &str) {
    println!("{} {}", style("→").cyan(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Print an error with an optional hint line underneath
pub fn error_with_hint(message: &str, hint: Option<&str>) {
    error(message);
    if let Some(hint) = hint {
        eprintln!("  {} {}", style("help:").dim(), hint);
    }
}

/// Print a header/section message
pub fn header(message: &str) {
    println!("{}", style(message).bold());
}

/// Print a dimmed/secondary message
pub fn dim(message: &str) {
    println!("{}", style(message).dim());
}

/// Print a status message (for dry-run, etc.)
pub fn status(prefix: &str, message: &str) {
    println!("{} {}", style(prefix).cyan().bold(), message);
}

/// Print a key/value line, e.g. `  Required   TouchDesigner.2023.1`
pub fn field(label: &str, value: &str) {
    println!("  {:<10} {}", style(label).dim(), value);
}

/// Print one numbered list line with a tag and optional detail lines
pub fn list_item(index: usize, tag: &str, label: &str, details: &[String]) {
    println!(
        "{:>3}. {} {}",
        index,
        style(format!("[{}]", tag)).dim(),
        label
    );
    for detail in details {
        println!("       {}", style(detail).dim());
    }
}

/// Print a bare line, for machine-friendly output
pub fn plain(message: &str) {
    println!("{}", message);
}

fn finish(pb: &ProgressBar, msg: String, to_stderr: bool) {
    if is_tty() {
        pb.set_style(template(true, "{msg}"));
        pb.finish_with_message(msg);
    } else {
        pb.finish_and_clear();
        if to_stderr {
            eprintln!("{}", msg);
        } else {
            println!("{}", msg);
        }
    }
}

/// Finish a spinner with success
pub fn finish_spinner_success(pb: &ProgressBar, message: &str) {
    finish(pb, format!("{} {}", style("✓").green(), message), false);
}

/// Finish a spinner with the resolved version info
pub fn finish_spinner_resolved(pb: &ProgressBar, name: &str, version: &str) {
    finish(
        pb,
        format!("{} {} {}", style("✓").green(), name, style(version).dim()),
        false,
    );
}

/// Finish a spinner with error
pub fn finish_spinner_error(pb: &ProgressBar, message: &str) {
    finish(pb, format!("{} {}", style("✗").red(), message), true);
}

/// Finish a download bar with success
pub fn finish_download_success(pb: &ProgressBar, name: &str) {
    finish(
        pb,
        format!("{} {} {}", style("✓").green(), name, style("downloaded").dim()),
        false,
    );
}

/// Clear a progress bar without leaving a message
pub fn clear_bar(pb: &ProgressBar) {
    pb.finish_and_clear();
}
