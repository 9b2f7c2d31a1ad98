//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{Error, ErrorContext, Result};
use crate::output::OutputWriter;
use std::path::Path;
use tracing::info;

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, Path::new(DEFAULT_CONFIG_FILE), output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
    }
}

/// Write a default configuration file to `path`
fn handle_config_init(args: ConfigInitArgs, path: &Path, output: &mut OutputWriter) -> Result<()> {
    if path.exists() && !args.force {
        return Err(Error::config(format!(
            "{} already exists; use --force to overwrite it",
            path.display()
        )));
    }

    Config::default()
        .save(path)
        .context("Writing default configuration")?;
    info!(path = %path.display(), "Wrote default configuration");
    output.success(&format!("✓ Created {}", path.display()))?;
    output.info("Edit it to customize file names, validation limits and output.")?;

    Ok(())
}

/// Print the effective configuration
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = config.render(args.format == ConfigFormat::Yaml)?;
    output.writeln(content.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::SharedBuffer;
    use tempfile::TempDir;

    fn writer(buffer: &SharedBuffer) -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, false, 0, Box::new(buffer.clone()))
    }

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let buffer = SharedBuffer::default();

        handle_config_init(ConfigInitArgs { force: false }, &path, &mut writer(&buffer)).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), Config::default());
        assert!(buffer.contents().contains("Created"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "validation:\n  fail_fast: true\n").unwrap();
        let buffer = SharedBuffer::default();

        let err = handle_config_init(ConfigInitArgs { force: false }, &path, &mut writer(&buffer)).unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert!(Config::from_file(&path).unwrap().validation.fail_fast);

        handle_config_init(ConfigInitArgs { force: true }, &path, &mut writer(&buffer)).unwrap();
        assert!(!Config::from_file(&path).unwrap().validation.fail_fast);
    }

    #[test]
    fn test_show_formats() {
        let buffer = SharedBuffer::default();
        let args = ConfigShowArgs {
            format: ConfigFormat::Json,
        };
        handle_config_show(args, &Config::default(), &mut writer(&buffer)).unwrap();

        let shown: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
        assert_eq!(shown["files"]["help_dir"], "help");
        assert_eq!(shown["output"]["format"], "human");

        let buffer = SharedBuffer::default();
        let args = ConfigShowArgs {
            format: ConfigFormat::Yaml,
        };
        handle_config_show(args, &Config::default(), &mut writer(&buffer)).unwrap();
        assert!(buffer.contents().contains("task_presenter: task_presenter.json"));
    }
}
