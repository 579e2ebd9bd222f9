//! Scoped external-process execution with a wall-clock deadline.
//!
//! [`Invocation`] describes one run of an external program: a human label
//! used in messages ("Nmap"), the executable, its argument vector and a
//! timeout in whole seconds. Arguments are passed straight to `execve`;
//! nothing goes through a shell.
//!
//! [`ScopedChild`] owns the spawned process. Whatever happens (normal exit,
//! deadline, pipe error, the caller's future being dropped) the child is
//! killed if still alive: explicitly and reaped on the deadline and error
//! paths, and through `kill_on_drop` as the last resort.
//!
//! Exit codes are recorded but never judged. Security tools routinely exit
//! non-zero when they find something, so any completed run is a success and
//! its stdout is the output.

use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::error::ToolError;
use crate::tools::result::ToolResult;

/// Deadline used when a caller does not pass one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// A fully described external-program run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    label: String,
    program: String,
    args: Vec<String>,
    timeout_secs: u64,
}

impl Invocation {
    /// `label` names the tool in timeout messages; `program` is the executable
    /// (bare name resolved via `PATH`, or a path).
    pub fn new(label: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn argv(&self) -> &[String] {
        &self.args
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Run to completion and normalize the outcome.
    pub async fn run(&self) -> ToolResult {
        match run_process(self).await {
            Ok(captured) => ToolResult::success(captured.stdout_text()),
            Err(err) => err.into(),
        }
    }
}

/// Everything captured from a process that finished before its deadline.
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    /// Stdout decoded as UTF-8, invalid sequences replaced.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Spawn, wait under the deadline, and hand back what the process wrote.
pub async fn run_process(invocation: &Invocation) -> Result<CapturedOutput, ToolError> {
    info!(
        tool = invocation.label(),
        program = invocation.program(),
        args = ?invocation.argv(),
        timeout_secs = invocation.timeout_secs,
        "spawning process"
    );
    let start = Instant::now();

    let child = ScopedChild::spawn(invocation)?;
    let captured = child
        .wait_with_deadline(invocation.label(), invocation.timeout_secs)
        .await?;

    debug!(
        tool = invocation.label(),
        status = %captured.status,
        stdout_bytes = captured.stdout.len(),
        stderr_bytes = captured.stderr.len(),
        "process finished in {:.0}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );
    if !captured.stderr.is_empty() {
        debug!(
            tool = invocation.label(),
            "stderr: {}",
            String::from_utf8_lossy(&captured.stderr).trim_end()
        );
    }
    Ok(captured)
}

// ── ScopedChild ─────────────────────────────────────────────────────

/// A child process that cannot outlive its owner.
pub struct ScopedChild {
    child: Child,
    program: String,
}

impl ScopedChild {
    /// Spawn with piped stdout/stderr and no stdin.
    pub fn spawn(invocation: &Invocation) -> Result<Self, ToolError> {
        let child = Command::new(invocation.program())
            .args(invocation.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: invocation.program().to_string(),
                source,
            })?;

        Ok(Self {
            child,
            program: invocation.program().to_string(),
        })
    }

    /// OS process id, `None` once the child has been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for exit while draining both pipes, bounded by `timeout_secs`.
    ///
    /// On deadline expiry or a pipe error the child is killed and reaped
    /// before this returns; partial output from a killed process is dropped.
    pub async fn wait_with_deadline(
        mut self,
        label: &str,
        timeout_secs: u64,
    ) -> Result<CapturedOutput, ToolError> {
        let deadline = Duration::from_secs(timeout_secs);
        let outcome = tokio::time::timeout(deadline, collect(&mut self.child)).await;

        match outcome {
            Ok(Ok(captured)) => Ok(captured),
            Ok(Err(err)) => {
                self.terminate().await;
                Err(ToolError::Io(err))
            }
            Err(_elapsed) => {
                warn!(
                    tool = label,
                    program = %self.program,
                    "deadline of {timeout_secs}s expired, killing process"
                );
                self.terminate().await;
                Err(ToolError::Timeout {
                    label: label.to_string(),
                    seconds: timeout_secs,
                })
            }
        }
    }

    /// Send SIGKILL (if still running) and wait for the process to be reaped.
    async fn terminate(&mut self) {
        if let Err(err) = self.child.kill().await {
            // InvalidInput means it already exited and was reaped.
            if err.kind() != std::io::ErrorKind::InvalidInput {
                warn!(program = %self.program, "failed to kill process: {err}");
            }
        }
    }
}

/// Drain stdout and stderr concurrently with waiting for exit, so a chatty
/// child can never block on a full pipe.
async fn collect(child: &mut Child) -> std::io::Result<CapturedOutput> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (status, stdout, stderr) =
        tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))?;
    Ok(CapturedOutput {
        status,
        stdout,
        stderr,
    })
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(label: &str, script: &str) -> Invocation {
        Invocation::new(label, "sh").arg("-c").arg(script)
    }

    #[test]
    fn builder_collects_argv_in_order() {
        let inv = Invocation::new("Nmap", "nmap")
            .arg("-F")
            .args(["10.0.0.1"])
            .timeout_secs(5);
        assert_eq!(inv.program(), "nmap");
        assert_eq!(inv.argv(), ["-F", "10.0.0.1"]);
        assert_eq!(inv.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn default_timeout_is_sixty_seconds() {
        assert_eq!(
            Invocation::new("x", "true").timeout(),
            Duration::from_secs(60)
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn success_returns_stdout() {
        let result = sh("Echo", "printf 'PORT 22/tcp open'").run().await;
        assert_eq!(result, ToolResult::success("PORT 22/tcp open"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_still_success() {
        let result = sh("Vuln", "echo 'injection found'; exit 1").run().await;
        assert_eq!(result, ToolResult::success("injection found\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stderr_is_not_part_of_output() {
        let result = sh("Noisy", "echo out; echo err >&2").run().await;
        assert_eq!(result, ToolResult::success("out\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn large_output_does_not_deadlock() {
        // Well beyond a pipe buffer on both streams.
        let result = sh(
            "Big",
            "head -c 300000 /dev/zero | tr '\\0' a; head -c 300000 /dev/zero >&2",
        )
        .timeout_secs(10)
        .run()
        .await;
        assert_eq!(result.output().map(str::len), Some(300_000));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_and_reports() {
        let start = Instant::now();
        let result = sh("Slow", "sleep 5").timeout_secs(1).run().await;
        assert!(start.elapsed() < Duration::from_secs(4));
        assert_eq!(
            result,
            ToolResult::error("Slow scan timed out after 1 seconds.")
        );
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn timed_out_process_is_gone_after_return() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!("echo $$ > '{}'; exec sleep 5", pid_file.display());

        let result = sh("Slow", &script).timeout_secs(1).run().await;
        assert!(!result.is_success());

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let proc_entry = std::path::Path::new("/proc").join(pid.trim());
        assert!(
            !proc_entry.exists(),
            "process {} still present after timeout",
            pid.trim()
        );
    }

    #[tokio::test]
    async fn missing_executable_is_an_error_result() {
        let result = Invocation::new("Ghost", "ghostcrew-definitely-not-installed")
            .run()
            .await;
        let message = result.message().unwrap();
        assert!(
            message.contains("failed to start 'ghostcrew-definitely-not-installed'"),
            "got: {message}"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_process_exposes_exit_status() {
        let captured = run_process(&sh("Exit", "exit 3")).await.unwrap();
        assert_eq!(captured.status.code(), Some(3));
        assert!(captured.stdout.is_empty());
    }
}
