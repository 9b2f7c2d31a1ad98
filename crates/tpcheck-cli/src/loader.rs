//! Loading project directories into configuration sets
//!
//! A project directory holds one JSON file per configuration and an optional
//! directory of per-question help pages.

use crate::config::FilesConfig;
use crate::error::{Error, ErrorContext, Result};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use tpcheck_schemas::validation::is_question_key;
use tracing::{debug, instrument};

/// Reads project directories laid out according to a [`FilesConfig`]
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    files: FilesConfig,
}

impl ProjectLoader {
    pub fn new(files: FilesConfig) -> Self {
        Self { files }
    }

    /// Load the configuration set of the project in `dir`
    ///
    /// The project and task presenter files are required; the tutorial is
    /// only included when its file exists.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub async fn load(&self, dir: &Path) -> Result<Value> {
        match tokio::fs::metadata(dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(Error::ProjectNotFound { path: dir.to_path_buf() }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ProjectNotFound { path: dir.to_path_buf() })
            }
            Err(e) => return Err(e.into()),
        }

        let (project, mut task_presenter, tutorial) = tokio::try_join!(
            self.read_required(dir, &self.files.project),
            self.read_required(dir, &self.files.task_presenter),
            read_json(dir.join(&self.files.tutorial)),
        )?;

        let attached = self.attach_help(dir, &mut task_presenter).await?;
        debug!(attached, has_tutorial = tutorial.is_some(), "Project loaded");

        let mut set = Map::new();
        set.insert("project".to_string(), project);
        set.insert("task_presenter".to_string(), task_presenter);
        if let Some(tutorial) = tutorial {
            set.insert("tutorial".to_string(), tutorial);
        }
        Ok(Value::Object(set))
    }

    async fn read_required(&self, dir: &Path, file: &str) -> Result<Value> {
        read_json(dir.join(file))
            .await?
            .ok_or_else(|| Error::MissingConfiguration {
                project: dir.to_path_buf(),
                file: file.to_string(),
            })
    }

    /// Fill in each question's `help` from `<help_dir>/<key>.html`
    ///
    /// Questions that already declare help, or whose key is not a valid
    /// question key, are left alone. Returns the number of pages attached.
    async fn attach_help(&self, dir: &Path, task_presenter: &mut Value) -> Result<usize> {
        let help_dir = dir.join(&self.files.help_dir);
        if !tokio::fs::metadata(&help_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Ok(0);
        }

        let Some(questions) = task_presenter
            .pointer_mut("/questionnaire/questions")
            .and_then(Value::as_array_mut)
        else {
            return Ok(0);
        };

        let mut attached = 0;
        for question in questions.iter_mut().filter_map(Value::as_object_mut) {
            if question.contains_key("help") {
                continue;
            }
            let Some(key) = question.get("key").and_then(Value::as_str) else {
                continue;
            };
            if !is_question_key(key) {
                continue;
            }

            let path = help_dir.join(format!("{}.html", key));
            let help = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content.trim().to_string(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e).with_context(|| format!("Reading {}", path.display())),
            };
            if !help.is_empty() {
                question.insert("help".to_string(), Value::String(help));
                attached += 1;
            }
        }

        Ok(attached)
    }
}

/// Read and parse a JSON file, or `None` if it does not exist
async fn read_json(path: PathBuf) -> Result<Option<Value>> {
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Reading {}", path.display())),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| Error::Parse { path, source })
}
