//! External process execution

use crate::error::{SetupError, SetupResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Platform-specific execution flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Pass arguments to the program without quoting (Windows batch files)
    pub verbatim_args: bool,
}

impl ExecOptions {
    pub fn verbatim() -> Self {
        Self {
            verbatim_args: true,
        }
    }
}

/// Runs external programs to completion
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Run `program` with `args` and return its exit status
    async fn exec(&self, program: &Path, args: &[String], options: ExecOptions) -> SetupResult<i32>;
}

/// Executor using `tokio::process`, output goes straight to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

#[async_trait]
impl ProcessExecutor for TokioExecutor {
    async fn exec(
        &self,
        program: &Path,
        args: &[String],
        options: ExecOptions,
    ) -> SetupResult<i32> {
        debug!("Executing: {} {:?}", program.display(), args);

        let mut command = Command::new(program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        #[cfg(windows)]
        {
            if options.verbatim_args {
                for arg in args {
                    command.raw_arg(arg);
                }
            } else {
                command.args(args);
            }
        }
        #[cfg(not(windows))]
        {
            let _ = options;
            command.args(args);
        }

        let status = command
            .status()
            .await
            .map_err(|e| SetupError::command_failed(program.display().to_string(), e))?;

        Ok(status.code().unwrap_or(-1))
    }
}
