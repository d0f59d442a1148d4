// ABOUTME: User-facing stderr/stdout messages for the gspreview binary
// ABOUTME: Formats errors with hints, warnings, and the detect command's report

use crate::image_protocols::Detection;
use owo_colors::OwoColorize;

pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Create CLI output utility with explicit color setting
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Display an error message, followed by a hint when there is one
    pub fn error(&self, message: &str, help: Option<&str>) {
        if self.use_color {
            eprintln!("{} {}", "error:".red().bold(), message);
        } else {
            eprintln!("error: {}", message);
        }

        if let Some(help) = help {
            if self.use_color {
                eprintln!("  {} {}", "hint:".cyan(), help);
            } else {
                eprintln!("  hint: {}", help);
            }
        }
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.format_warning(message));
    }

    fn format_warning(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "warning:".yellow().bold(), message)
        } else {
            format!("warning: {}", message)
        }
    }

    /// Report the rendering tier `detect` resolved to
    pub fn detection(&self, detection: &Detection) {
        println!("{}", self.format_detection(detection));
    }

    fn format_detection(&self, detection: &Detection) -> String {
        if self.use_color {
            format!(
                "{} {}\n{} {}",
                "protocol:".bold(),
                detection.protocol.green(),
                "reason:".bold(),
                detection.reason.dimmed()
            )
        } else {
            format!(
                "protocol: {}\nreason: {}",
                detection.protocol, detection.reason
            )
        }
    }
}
