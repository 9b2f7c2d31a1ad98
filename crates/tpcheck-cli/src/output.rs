//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for validation reports and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::report::{ProjectReport, ProjectStatus, Summary, ValidationReport};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::trace;

/// Trait for formatting output with specialized support for reports
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a whole validation report
    fn format_report(&self, report: &ValidationReport, show_violations: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // No dedicated human rendering for arbitrary data
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_report(&self, report: &ValidationReport, show_violations: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report, show_violations)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && format == OutputFormat::Human && io::stderr().is_terminal(),
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            verbose,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write a validation report
    ///
    /// Human output colors each project line by status and ends with a
    /// summary line. Machine formats get the serialized report.
    pub fn report(&mut self, report: &ValidationReport) -> Result<()> {
        if self.format != OutputFormat::Human {
            let formatted = self.format.format_report(report, false)?;
            trace!(bytes = formatted.len(), "Writing report");
            return self.writeln(formatted.trim_end());
        }

        let show_violations = self.verbose > 0;
        for project in &report.projects {
            if self.quiet && project.is_valid() {
                continue;
            }
            let (headline, details) = format_project_human(project, show_violations);
            let headline = if self.use_color {
                match project.status {
                    ProjectStatus::Valid => headline.green().to_string(),
                    ProjectStatus::Invalid { .. } => headline.red().to_string(),
                    ProjectStatus::Error { .. } => headline.yellow().to_string(),
                }
            } else {
                headline
            };
            self.writeln(&headline)?;
            if !details.is_empty() {
                self.write(&details)?;
            }
        }

        self.section("Summary")?;
        let summary = format_summary_human(&report.summary);
        if report.all_valid() {
            self.success(&summary)
        } else {
            self.info(&summary)
        }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Format one project result as a headline and indented details
fn format_project_human(project: &ProjectReport, show_violations: bool) -> (String, String) {
    let name = project.project.display();
    match &project.status {
        ProjectStatus::Valid => (format!("✓ {}", name), String::new()),
        ProjectStatus::Invalid {
            message,
            path,
            violations,
        } => {
            let mut details = String::new();
            if let Some(path) = path {
                details.push_str(&format!("    📍 Path: {}\n", path));
            }
            details.push_str(&format!("    💬 Message: {}\n", message));

            if show_violations && !violations.is_empty() {
                details.push_str("    🔍 Violations:\n");
                for violation in violations {
                    details.push_str(&format!("      • Rule: {}\n", violation.rule));
                    details.push_str(&format!("        Expected: {}\n", violation.expected));
                    details.push_str(&format!("        Actual: {}\n", violation.actual));
                }
            }
            (format!("✗ {}", name), details)
        }
        ProjectStatus::Error { message } => (format!("! {}: {}", name, message), String::new()),
    }
}

fn format_summary_human(summary: &Summary) -> String {
    let mut line = format!(
        "Checked {} project(s): {} valid, {} invalid, {} error(s)",
        summary.total, summary.valid, summary.invalid, summary.errors
    );
    if summary.skipped > 0 {
        line.push_str(&format!(", {} skipped", summary.skipped));
    }
    line
}

/// Format a validation report for human reading, without colors
fn format_report_human(report: &ValidationReport, show_violations: bool) -> String {
    let mut output = String::new();

    for project in &report.projects {
        let (headline, details) = format_project_human(project, show_violations);
        output.push_str(&headline);
        output.push('\n');
        output.push_str(&details);
    }

    output.push('\n');
    output.push_str(&format_summary_human(&report.summary));
    output.push('\n');
    output
}

/// In-memory writer for capturing output in tests
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
