//! Subprocess runner for the external generator
//!
//! The generator runs with an explicit working directory, never by changing
//! the process-wide one. Output is drained while the process runs, and the
//! wait races a timeout and a cancellation future.

use super::version::extract_version;
use super::SiteGenerator;
use crate::error::ExternalToolError;
use semver::Version;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Time a child gets to exit after SIGINT before it is killed
const INTERRUPT_GRACE: Duration = Duration::from_secs(5);

/// Time allowed to collect remaining output after the child is gone
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// One generator run
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub program: &'a str,
    pub args: Vec<String>,
    /// Working directory of the subprocess
    pub cwd: &'a Path,
    pub timeout: Duration,
}

/// Captured result of a successful generator run
#[derive(Debug, Clone, Default)]
pub struct GeneratorOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

enum Outcome {
    Exited(std::io::Result<std::process::ExitStatus>),
    TimedOut,
    Cancelled,
}

/// Run the generator to completion
///
/// Resolving `cancel` interrupts the child and reports
/// [`ExternalToolError::Aborted`].
pub async fn invoke<F>(
    invocation: &Invocation<'_>,
    cancel: F,
) -> Result<GeneratorOutput, ExternalToolError>
where
    F: Future<Output = ()>,
{
    info!(
        program = invocation.program,
        args = ?invocation.args,
        cwd = %invocation.cwd.display(),
        "running generator"
    );

    let mut child = Command::new(invocation.program)
        .args(&invocation.args)
        .current_dir(invocation.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExternalToolError::Spawn {
            program: invocation.program.to_string(),
            source,
        })?;

    let stdout_task = drain(child.stdout.take(), "stdout");
    let stderr_task = drain(child.stderr.take(), "stderr");

    tokio::pin!(cancel);

    let outcome = tokio::select! {
        status = child.wait() => Outcome::Exited(status),
        _ = tokio::time::sleep(invocation.timeout) => Outcome::TimedOut,
        _ = &mut cancel => Outcome::Cancelled,
    };

    match outcome {
        Outcome::Exited(Ok(status)) => {
            let stdout = collect(stdout_task).await;
            let stderr = collect(stderr_task).await;
            match status.code() {
                Some(0) => Ok(GeneratorOutput {
                    exit_code: 0,
                    stdout,
                    stderr,
                }),
                // Terminated by a signal reports no code
                code => Err(ExternalToolError::Failed {
                    code: code.unwrap_or(-1),
                    stderr,
                }),
            }
        }
        Outcome::Exited(Err(source)) => Err(ExternalToolError::Spawn {
            program: invocation.program.to_string(),
            source,
        }),
        Outcome::TimedOut => {
            warn!(
                program = invocation.program,
                seconds = invocation.timeout.as_secs(),
                "generator timed out, killing it"
            );
            let _ = child.kill().await;
            Err(ExternalToolError::TimedOut {
                after: invocation.timeout,
                stderr: collect(stderr_task).await,
            })
        }
        Outcome::Cancelled => {
            warn!(program = invocation.program, "build interrupted, stopping generator");
            interrupt(&mut child).await;
            Err(ExternalToolError::Aborted)
        }
    }
}

/// Ask the generator for its version, giving up after `limit`
///
/// A missing binary, a non-zero exit, an unreadable banner and a timeout all
/// report `None`; the build goes on without a version check.
pub async fn detect_version<G>(generator: &G, limit: Duration) -> Option<Version>
where
    G: SiteGenerator + ?Sized,
{
    let query = Command::new(generator.program())
        .args(generator.version_args())
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match timeout(limit, query).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            debug!(program = generator.program(), error = %e, "version query failed");
            return None;
        }
        Err(_) => {
            warn!(
                program = generator.program(),
                millis = limit.as_millis() as u64,
                "version query timed out"
            );
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }
    extract_version(&String::from_utf8_lossy(&output.stdout))
}

/// Forward an interrupt to the child, escalating to a kill
async fn interrupt(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) {
            if kill(Pid::from_raw(pid), Signal::SIGINT).is_ok() {
                if let Ok(Ok(status)) = timeout(INTERRUPT_GRACE, child.wait()).await {
                    debug!(?status, "generator exited after interrupt");
                    return;
                }
            }
        }
    }

    let _ = child.kill().await;
}

fn drain<R>(reader: Option<R>, stream: &'static str) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut captured = String::new();
        let Some(reader) = reader else {
            return captured;
        };

        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    debug!(stream, "{}", line);
                    captured.push_str(&line);
                    captured.push('\n');
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(stream, error = %e, "failed reading generator output");
                    break;
                }
            }
        }
        captured
    })
}

/// Wait briefly for a drain task; a lingering grandchild may hold the pipe open
async fn collect(task: JoinHandle<String>) -> String {
    match timeout(DRAIN_GRACE, task).await {
        Ok(Ok(captured)) => captured,
        _ => String::new(),
    }
}
