//! Per-project validation results
//!
//! These types are what the `validate` command prints, in every output
//! format.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tpcheck_schemas::validation::{ValidationError, Violation};

/// Outcome of validating one project directory
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Every configuration is valid
    Valid,
    /// A configuration was rejected
    Invalid {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        violations: Vec<Violation>,
    },
    /// The project could not be loaded
    Error { message: String },
}

/// Result for one project directory
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectReport {
    /// The project directory as given on the command line
    pub project: PathBuf,
    #[serde(flatten)]
    pub status: ProjectStatus,
}

impl ProjectReport {
    /// Report a project whose configuration set was accepted
    pub fn valid(project: &Path) -> Self {
        Self {
            project: project.to_path_buf(),
            status: ProjectStatus::Valid,
        }
    }

    /// Report a rejected configuration, keeping its JSON path and violations
    pub fn invalid(project: &Path, error: &ValidationError) -> Self {
        Self {
            project: project.to_path_buf(),
            status: ProjectStatus::Invalid {
                message: error.message().to_string(),
                path: error.path().map(str::to_string),
                violations: error.violations().to_vec(),
            },
        }
    }

    /// Report a project that could not be loaded or checked
    pub fn error(project: &Path, message: impl Into<String>) -> Self {
        Self {
            project: project.to_path_buf(),
            status: ProjectStatus::Error {
                message: message.into(),
            },
        }
    }

    /// Whether the project passed validation
    pub fn is_valid(&self) -> bool {
        matches!(self.status, ProjectStatus::Valid)
    }
}

/// Counts over all checked projects
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: usize,
    /// Projects not checked because validation stopped early
    pub skipped: usize,
}

/// Everything the `validate` command reports
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ValidationReport {
    pub projects: Vec<ProjectReport>,
    pub summary: Summary,
}

impl ValidationReport {
    /// Start a report for `requested` projects, all counted as skipped until pushed
    pub fn new(requested: usize) -> Self {
        Self {
            projects: Vec::with_capacity(requested),
            summary: Summary {
                skipped: requested,
                ..Summary::default()
            },
        }
    }

    /// Record one project's result and update the summary
    pub fn push(&mut self, report: ProjectReport) {
        self.summary.total += 1;
        self.summary.skipped = self.summary.skipped.saturating_sub(1);
        match report.status {
            ProjectStatus::Valid => self.summary.valid += 1,
            ProjectStatus::Invalid { .. } => self.summary.invalid += 1,
            ProjectStatus::Error { .. } => self.summary.errors += 1,
        }
        self.projects.push(report);
    }

    /// Whether every requested project was checked and found valid
    pub fn all_valid(&self) -> bool {
        self.summary.invalid == 0 && self.summary.errors == 0 && self.summary.skipped == 0
    }
}
