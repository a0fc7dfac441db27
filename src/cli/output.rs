//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Delve CLI.

use owo_colors::OwoColorize;

use crate::jobs::JobStatus;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the Delve banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n",
                "delve".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("\n   delve v{}\n", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print one polled job status line
    pub fn progress(&self, status: JobStatus, progress: u8, message: &str) {
        let percent = format!("{:>3}%", progress);
        if !self.colored {
            println!("  [{}] {:<20} {}", percent, status.as_str(), message);
            return;
        }

        let status = format!("{:<20}", status.as_str());
        let status = if status.contains("error") {
            status.red().to_string()
        } else if status.contains("completed") {
            status.green().to_string()
        } else {
            status.cyan().to_string()
        };
        println!("  {} {} {}", percent.bright_white().bold(), status, message.dimmed());
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a numbered trend with its description
    pub fn trend(&self, index: usize, title: &str, description: &str) {
        if self.colored {
            println!("\n  {} {}", format!("{:>2}.", index).dimmed(), title.bright_white().bold());
        } else {
            println!("\n  {:>2}. {}", index, title);
        }
        println!("      {}", description);
    }

    /// Print a block of text as-is, indented
    pub fn body(&self, text: &str) {
        for line in text.lines() {
            println!("    {}", line);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_new() {
        assert!(Output::new().colored);
        assert!(Output::default().colored);
        assert!(!Output::no_color().colored);
    }

    #[test]
    fn test_output_methods_no_panic() {
        for output in [Output::no_color(), Output::new()] {
            output.banner();
            output.success("test success");
            output.info("test info");
            output.warning("test warning");
            output.error("test error");
            output.progress(JobStatus::Searching, 36, "Searching... 1/3 completed");
            output.progress(JobStatus::WritingError, 95, "Error writing report: timeout");
            output.progress(JobStatus::Completed, 100, "Research completed");
            output.header("Report");
            output.kv("key", "value");
            output.list_item("item");
            output.trend(10, "Trend 10", "description");
            output.body("# Title\n\nParagraph");
            output.hint("hint message");
        }
    }
}
