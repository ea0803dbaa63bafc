//! Run outputs and user-facing messages
//!
//! On a GitHub Actions runner outputs are appended to `$GITHUB_OUTPUT`,
//! PATH additions to `$GITHUB_PATH`, and warnings/errors are printed as
//! workflow commands so they show up as annotations. Elsewhere the same
//! calls print plain styled lines.

use crate::error::{SetupError, SetupResult};
use async_trait::async_trait;
use console::style;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Destination for the run's outputs and messages
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Publish a named output value
    async fn set_output(&self, name: &str, value: &str) -> SetupResult<()>;

    /// Make `dir` part of PATH for later steps
    async fn add_path(&self, dir: &Path) -> SetupResult<()>;

    fn info(&self, message: &str);

    fn warning(&self, message: &str);

    fn error(&self, message: &str);

    /// Report the run as failed
    fn set_failed(&self, message: &str);
}

/// Escape data for a workflow command
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Sink for GitHub Actions, with a plain-terminal fallback
#[derive(Debug, Clone, Default)]
pub struct ActionsSink {
    /// Whether workflow commands should be emitted
    workflow_commands: bool,
    output_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
}

impl ActionsSink {
    /// Detect the runner environment
    pub fn from_env() -> Self {
        let file_var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            workflow_commands: std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true"),
            output_file: file_var("GITHUB_OUTPUT"),
            path_file: file_var("GITHUB_PATH"),
        }
    }

    /// Sink writing to explicit files, as a runner would provide
    pub fn with_files(output_file: PathBuf, path_file: PathBuf) -> Self {
        Self {
            workflow_commands: true,
            output_file: Some(output_file),
            path_file: Some(path_file),
        }
    }

    async fn append(path: &Path, line: &str) -> SetupResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| SetupError::io(format!("opening {}", path.display()), e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SetupError::io(format!("writing {}", path.display()), e))?;
        file.flush()
            .await
            .map_err(|e| SetupError::io(format!("writing {}", path.display()), e))?;
        Ok(())
    }
}

#[async_trait]
impl OutputSink for ActionsSink {
    async fn set_output(&self, name: &str, value: &str) -> SetupResult<()> {
        match &self.output_file {
            Some(path) => Self::append(path, &format!("{}={}\n", name, value)).await,
            None => {
                println!("{}={}", name, value);
                Ok(())
            }
        }
    }

    async fn add_path(&self, dir: &Path) -> SetupResult<()> {
        match &self.path_file {
            Some(path) => Self::append(path, &format!("{}\n", dir.display())).await,
            None => {
                self.info(&format!("Add {} to PATH to use this installation", dir.display()));
                Ok(())
            }
        }
    }

    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warning(&self, message: &str) {
        if self.workflow_commands {
            println!("::warning::{}", escape_data(message));
        } else {
            eprintln!("{} {}", style("Warning:").yellow().bold(), message);
        }
    }

    fn error(&self, message: &str) {
        if self.workflow_commands {
            println!("::error::{}", escape_data(message));
        } else {
            eprintln!("{} {}", style("Error:").red().bold(), message);
        }
    }

    fn set_failed(&self, message: &str) {
        // Outside a runner the exit status and main's error report suffice
        if self.workflow_commands {
            self.error(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn escapes_workflow_command_data() {
        assert_eq!(escape_data("100% done\nnext"), "100%25 done%0Anext");
        assert_eq!(escape_data("a\r\nb"), "a%0D%0Ab");
    }

    #[tokio::test]
    async fn appends_outputs_and_paths() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("output");
        let path = dir.path().join("path");
        let sink = ActionsSink::with_files(output.clone(), path.clone());

        sink.set_output("key", "texlive-x86_64-linux-v1-abc-NONE-2024-01-01")
            .await
            .unwrap();
        sink.set_output("other", "1").await.unwrap();
        sink.add_path(Path::new("/home/runner/texlive/bin/x86_64-linux"))
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "key=texlive-x86_64-linux-v1-abc-NONE-2024-01-01\nother=1\n"
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "/home/runner/texlive/bin/x86_64-linux\n"
        );
    }

    #[test]
    #[serial]
    fn detects_runner_files() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out");
        std::env::set_var("GITHUB_ACTIONS", "true");
        std::env::set_var("GITHUB_OUTPUT", &output);
        std::env::remove_var("GITHUB_PATH");

        let sink = ActionsSink::from_env();

        std::env::remove_var("GITHUB_ACTIONS");
        std::env::remove_var("GITHUB_OUTPUT");

        assert!(sink.workflow_commands);
        assert_eq!(sink.output_file, Some(output));
        assert_eq!(sink.path_file, None);
    }
}
