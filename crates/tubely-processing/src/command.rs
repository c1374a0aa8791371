//! External process execution.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
}

/// Runs an external program to completion.
///
/// A non-zero exit is not an error at this level; callers inspect
/// [`CommandOutput::status`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError>;
}

/// [`CommandRunner`] backed by `tokio::process`.
///
/// Children are killed when the returned future is dropped (client disconnect)
/// or when the timeout elapses.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    #[tracing::instrument(skip(self, args), fields(process.executable.name = %program))]
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        let start = std::time::Instant::now();

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| CommandError::Wait {
                program: program.to_string(),
                source,
            })?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "External tool timed out, process killed"
                );
                return Err(CommandError::TimedOut {
                    program: program.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        tracing::debug!(
            exit_code = ?output.status.code(),
            duration_ms = start.elapsed().as_millis(),
            "External tool finished"
        );

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_exit_code_and_streams() {
        let runner = TokioCommandRunner::new(Duration::from_secs(10));
        let output = runner
            .run("sh", &sh("echo out; echo err >&2; exit 3"))
            .await
            .unwrap();

        assert_eq!(output.status, Some(3));
        assert!(!output.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "out");
        assert_eq!(output.stderr_lossy(), "err");
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = TokioCommandRunner::new(Duration::from_millis(100));
        let result = runner.run("sh", &sh("sleep 5")).await;
        assert!(matches!(result, Err(CommandError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = TokioCommandRunner::new(Duration::from_secs(1));
        let result = runner.run("tubely-no-such-tool", &[]).await;
        assert!(matches!(result, Err(CommandError::Spawn { .. })));
    }
}
