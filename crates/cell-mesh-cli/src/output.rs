//! Output formatting utilities for the CLI.

use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable value as JSON. Text output is left to the caller.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Json {
        return;
    }

    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

/// Print a success message.
pub fn success(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Text {
        return;
    }

    use colored::Colorize;
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an info message.
pub fn info(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Text {
        return;
    }

    println!("{}", msg.trim_end());
}

/// Print a warning message.
pub fn warning(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Text {
        return;
    }

    use colored::Colorize;
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}
