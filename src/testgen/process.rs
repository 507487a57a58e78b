//! Child process execution with captured output and a hard timeout

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::{
    constants::MAX_DIAGNOSTIC_CHARS,
    error::{AppError, AppResult},
};

/// A command line plus the directory it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

/// Captured result of a finished process
#[derive(Debug)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Standard output without trailing whitespace, as it is stored.
    ///
    /// Text columns cannot hold NUL, so output containing one is an
    /// `ExecutionError` of this run.
    pub fn stored_stdout(&self) -> AppResult<String> {
        if self.stdout.contains('\0') {
            return Err(AppError::ExecutionError(
                "Output contains a NUL byte".to_string(),
            ));
        }
        Ok(self.stdout.trim_end().to_string())
    }

    /// Describe a failed run for logs and error messages
    pub fn failure_summary(&self) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exited with code {}", code),
            None => "killed by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("Process {}", status)
        } else {
            format!(
                "Process {}: {}",
                status,
                stderr.chars().take(MAX_DIAGNOSTIC_CHARS).collect::<String>()
            )
        }
    }
}

/// Run a process to completion.
///
/// `stdin` is written to the child and then closed; without it the child gets
/// an empty standard input. If `limit` elapses first the child is killed and
/// `Timeout` is returned. A non-zero exit is not an error here.
pub async fn run(
    invocation: &Invocation,
    stdin: Option<&str>,
    limit: Duration,
) -> AppResult<ProcessOutput> {
    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &invocation.cwd {
        command.current_dir(dir);
    }

    let start = Instant::now();
    let mut child = command.spawn().map_err(|e| {
        AppError::ExecutionError(format!(
            "Failed to start {}: {}",
            invocation.program.display(),
            e
        ))
    })?;

    if let (Some(data), Some(mut pipe)) = (stdin, child.stdin.take()) {
        let data = data.as_bytes().to_vec();
        // Written concurrently so a child filling its stdout pipe cannot deadlock us.
        // A child that exits without reading yields a broken pipe, which is fine.
        tokio::spawn(async move {
            if let Err(e) = pipe.write_all(&data).await {
                tracing::trace!(error = %e, "Child closed stdin early");
            }
        });
    }

    // Dropping the future on timeout drops the child, and kill_on_drop reaps it
    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(AppError::ExecutionError(format!(
                "Failed to wait for {}: {}",
                invocation.program.display(),
                e
            )));
        }
        Err(_) => {
            tracing::debug!(
                program = %invocation.program.display(),
                limit_ms = limit.as_millis() as u64,
                "Process timed out and was killed"
            );
            return Err(AppError::Timeout(limit.as_millis() as u64));
        }
    };

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let output = run(&sh("echo '5 3'; echo oops >&2; exit 0"), None, Duration::from_secs(5))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "5 3\n");
        assert_eq!(output.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_pipes_stdin() {
        let output = run(&sh("read a b; echo $((a + b))"), Some("5 3"), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(output.stdout.trim_end(), "8");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_returned_as_data() {
        let output = run(&sh("echo broken >&2; exit 3"), None, Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.failure_summary(), "Process exited with code 3: broken");
    }

    #[tokio::test]
    async fn test_stored_stdout_trims_and_rejects_nul() {
        let output = run(&sh("printf '5 3 \\n\\n'"), None, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(output.stored_stdout().unwrap(), "5 3");

        let output = run(&sh("printf 'a\\0b'"), None, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(output.stdout, "a\0b");
        assert!(matches!(output.stored_stdout(), Err(AppError::ExecutionError(_))));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let start = Instant::now();
        let err = run(&sh("sleep 5"), None, Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Timeout(200)));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_missing_program_is_execution_error() {
        let invocation = Invocation::new("/nonexistent/bin/generator-7c1e");
        let err = run(&invocation, None, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, AppError::ExecutionError(_)));
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = sh("pwd").current_dir(dir.path());
        let output = run(&invocation, None, Duration::from_secs(5)).await.unwrap();

        let reported = PathBuf::from(output.stdout.trim_end());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
