use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

/// Shown instead of secret values.
pub const MASK: &str = "********";

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress every status line except errors.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a success message.
pub fn success(msg: &str) {
    if !quiet() {
        eprintln!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if !quiet() {
        eprintln!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if !quiet() {
        eprintln!("\n{}", msg.bold());
    }
}

/// Print an indented `name → detail` line.
pub fn item(name: &str, detail: &str) {
    if !quiet() {
        eprintln!("    {} {} {}", name.cyan(), "→".dimmed(), detail);
    }
}

/// Format one `KEY=value` line, quoting when a dotenv reader would need it.
pub fn dotenv_line(key: &str, value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if !needs_quotes {
        return format!("{key}={value}");
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '$' => quoted.push_str("\\$"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    format!("{key}={quoted}")
}
