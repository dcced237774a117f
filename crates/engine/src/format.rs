//! External formatter invocation
//!
//! The "format and replace" command runs a formatter over the document
//! before the full scan. Formatting is best-effort: any failure here is
//! reported and the replacement step proceeds regardless.

use crate::config::Config;
use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;
use tracing::debug;

/// Style shipped with the tool, used when `use_bundled_clang_format` is on
const BUNDLED_STYLE: &str = include_str!("../assets/mql.clang-format");

/// Error from the external formatter step
#[derive(Debug, Error)]
pub enum FormatError {
    /// Could not stage the bundled style file
    #[error("failed to stage bundled style: {0}")]
    Stage(std::io::Error),
    /// The formatter binary could not be launched
    #[error("failed to launch formatter '{command}': {source}")]
    Launch {
        /// Program that failed to start
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The formatter ran but reported failure
    #[error("formatter '{command}' exited with {status}: {stderr}")]
    Failed {
        /// Program that failed
        command: String,
        /// Exit status
        status: ExitStatus,
        /// Captured stderr, trimmed
        stderr: String,
    },
}

/// Format `path` in place with the configured formatter
///
/// With the bundled style, the shipped `.clang-format` is staged to a temp
/// directory and passed via `--style=file:`. Otherwise the configured argv
/// runs as-is with the file path appended; when none is configured the step
/// is skipped. Returns whether a formatter actually ran.
pub async fn format_document(path: &Path, config: &Config) -> Result<bool, FormatError> {
    if config.use_bundled_clang_format {
        let staging = tempfile::tempdir().map_err(FormatError::Stage)?;
        let style_path = staging.path().join(".clang-format");
        std::fs::write(&style_path, BUNDLED_STYLE).map_err(FormatError::Stage)?;

        let args = vec![
            "-i".to_string(),
            format!("--style=file:{}", style_path.display()),
            path.display().to_string(),
        ];
        run_formatter("clang-format", &args).await?;
        Ok(true)
    } else {
        match config.formatter.as_deref() {
            Some([program, rest @ ..]) => {
                let mut args: Vec<String> = rest.to_vec();
                args.push(path.display().to_string());
                run_formatter(program, &args).await?;
                Ok(true)
            }
            _ => {
                debug!("no formatter configured, skipping format step");
                Ok(false)
            }
        }
    }
}

async fn run_formatter(program: &str, args: &[String]) -> Result<(), FormatError> {
    debug!(%program, ?args, "running formatter");
    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| FormatError::Launch {
            command: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(FormatError::Failed {
            command: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
