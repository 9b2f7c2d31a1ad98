//! Validation command handler

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::loader::ProjectLoader;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use crate::report::{ProjectReport, ValidationReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tpcheck_schemas::{ConfigurationSetValidator, LanguageTagCache, SchemaValidator, ValidationContext};
use tracing::{debug, info, instrument, warn};

/// When to stop checking further projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StopPolicy {
    /// Number of failed projects after which the remaining ones are skipped
    limit: Option<usize>,
}

impl StopPolicy {
    fn new(args: &ValidateArgs, config: &Config) -> Result<Self> {
        let max_errors = args.max_errors.or(config.validation.max_errors);
        if max_errors == Some(0) {
            return Err(Error::config("--max-errors must be at least 1"));
        }

        let limit = if args.fail_fast || config.validation.fail_fast {
            Some(1)
        } else {
            max_errors
        };
        Ok(Self { limit })
    }

    fn should_stop(&self, failures: usize) -> bool {
        self.limit.is_some_and(|limit| failures >= limit)
    }
}

/// Handle the validate command
///
/// Projects are loaded and validated concurrently but reported in the order
/// they were given.
#[instrument(skip_all, fields(projects = args.paths.len()))]
pub async fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("validate_command", &format!("{} project(s)", args.paths.len()));
    let policy = StopPolicy::new(&args, config)?;

    let loader = Arc::new(ProjectLoader::new(config.files.clone()));
    let cache = Arc::new(LanguageTagCache::new());

    let tasks: Vec<(PathBuf, JoinHandle<Result<ProjectReport>>)> = args
        .paths
        .into_iter()
        .map(|path| {
            let loader = Arc::clone(&loader);
            let cache = Arc::clone(&cache);
            let task_path = path.clone();
            let task = tokio::spawn(async move { check_project(&loader, &task_path, cache).await });
            (path, task)
        })
        .collect();

    let spinner = output.spinner(&format!("Validating {} project(s)...", tasks.len()));
    let mut report = ValidationReport::new(tasks.len());
    let mut first_error: Option<Error> = None;
    let mut failures = 0;

    let mut pending = tasks.into_iter();
    for (path, task) in pending.by_ref() {
        let outcome = task
            .await
            .unwrap_or_else(|e| Err(Error::other(format!("Validation of {} was interrupted: {}", path.display(), e))));

        let project = match outcome {
            Ok(project) => project,
            Err(e) => {
                warn!(project = %path.display(), error = %e, "Project could not be checked");
                let project = ProjectReport::error(&path, e.to_string());
                first_error.get_or_insert(e);
                project
            }
        };

        if !project.is_valid() {
            failures += 1;
        }
        report.push(project);

        if policy.should_stop(failures) {
            info!(failures, "Stopping early");
            break;
        }
    }

    let skipped: Vec<_> = pending.collect();
    if !skipped.is_empty() {
        debug!(count = skipped.len(), "Cancelling remaining projects");
        for (_, task) in skipped {
            task.abort();
        }
    }

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    output.report(&report)?;
    info!(
        elapsed_ms = timer.elapsed().as_millis() as u64,
        checked = report.summary.total,
        "Validation finished"
    );

    if let Some(error) = first_error {
        return Err(error);
    }
    if report.summary.invalid > 0 {
        return Err(Error::Validation {
            invalid: report.summary.invalid,
            total: report.summary.total + report.summary.skipped,
        });
    }
    Ok(())
}

/// Load one project directory and validate its configuration set
///
/// A rejected configuration is a report, not an error. Errors are reserved for
/// projects that could not be loaded or validated at all.
async fn check_project(loader: &ProjectLoader, path: &Path, cache: Arc<LanguageTagCache>) -> Result<ProjectReport> {
    let set = {
        let _timer = Timer::with_details("load_project", &path.display().to_string());
        loader.load(path).await?
    };

    let context = ValidationContext::with_cache(cache);
    match ConfigurationSetValidator::new().validate_with_context(&set, &context) {
        Ok(()) => {
            info!(project = %path.display(), "Project is valid");
            Ok(ProjectReport::valid(path))
        }
        Err(e) if e.is_rejection() => {
            info!(project = %path.display(), error = %e, "Project is invalid");
            Ok(ProjectReport::invalid(path, &e))
        }
        Err(e) => Err(e.into()),
    }
}
