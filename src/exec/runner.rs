// src/exec/runner.rs

//! Process Runner: run one external command and capture what it printed.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
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

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of one process invocation.
///
/// `output` and `error` are the trimmed stdout / stderr text. When the
/// process could not be started, `success` is false, `output` is empty and
/// `error` describes the launch failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub success: bool,
    pub output: String,
    pub error: String,
}

impl CommandResult {
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: message.into(),
        }
    }
}

/// Trait abstracting how external commands are executed.
///
/// Production code uses [`RealProcessRunner`]; tests substitute a scripted
/// runner that records invocations instead of spawning processes.
///
/// Implementations never fail: every problem is folded into the returned
/// [`CommandResult`].
pub trait ProcessRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>>;
}

/// Runs commands with `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct RealProcessRunner {
    timeout: Option<Duration>,
}

impl RealProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child and report failure if it has not exited after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessRunner for RealProcessRunner {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>> {
        Box::pin(run_command(spec, self.timeout))
    }
}

/// How long to keep reading a timed-out command's streams after the kill.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

async fn run_command(spec: &CommandSpec, timeout: Option<Duration>) -> CommandResult {
    info!(command = %spec, cwd = ?spec.cwd, "executing command");

    if spec.program.trim().is_empty() {
        error!("refusing to execute an empty program path");
        return CommandResult::launch_failure("executable path is empty");
    }

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            error!(program = %spec.program, error = %e, "failed to start command");
            return CommandResult::launch_failure(format!(
                "failed to start '{}': {}",
                spec.program, e
            ));
        }
    };

    let stdout = child
        .stdout
        .take()
        .map(|s| StreamCapture::spawn(s, StreamKind::Stdout, spec.program.clone()));
    let stderr = child
        .stderr
        .take()
        .map(|s| StreamCapture::spawn(s, StreamKind::Stderr, spec.program.clone()));

    let (waited, drain_deadline) = match timeout {
        None => (Some(child.wait().await), None),
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(res) => (Some(res), None),
            Err(_) => {
                warn!(command = %spec, ?limit, "command timed out; killing process");
                if let Err(e) = child.kill().await {
                    warn!(command = %spec, error = %e, "failed to kill timed out process");
                }
                // Descendants of the killed child may still hold the pipes open.
                (None, Some(Instant::now() + DRAIN_GRACE))
            }
        },
    };

    let output = finish_capture(stdout, drain_deadline).await;
    let mut error_text = finish_capture(stderr, drain_deadline).await;

    let success = match waited {
        Some(Ok(status)) => {
            let code = status.code().unwrap_or(-1);
            info!(command = %spec, exit_code = code, success = status.success(), "command exited");
            status.success()
        }
        Some(Err(e)) => {
            error!(command = %spec, error = %e, "failed waiting for command");
            append_line(&mut error_text, &format!("failed waiting for '{}': {}", spec.program, e));
            false
        }
        None => {
            let limit = timeout.unwrap_or_default();
            append_line(
                &mut error_text,
                &format!("'{}' timed out after {:?}", spec.program, limit),
            );
            false
        }
    };

    CommandResult {
        success,
        output,
        error: error_text,
    }
}

/// A child stream being read into a shared buffer by a background task.
struct StreamCapture {
    kind: StreamKind,
    program: String,
    buffer: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl StreamCapture {
    fn spawn<R>(stream: R, kind: StreamKind, program: String) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let task = tokio::spawn(collect_stream(stream, kind, program.clone(), buffer.clone()));
        Self {
            kind,
            program,
            buffer,
            task,
        }
    }

    /// Wait for EOF, or until `deadline` when given, and return the trimmed
    /// text read so far.
    async fn finish(mut self, deadline: Option<Instant>) -> String {
        let joined = match deadline {
            None => (&mut self.task).await,
            Some(deadline) => match tokio::time::timeout_at(deadline, &mut self.task).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(
                        program = %self.program,
                        stream = ?self.kind,
                        "stream still open after kill; abandoning reader"
                    );
                    self.task.abort();
                    Ok(())
                }
            },
        };
        if let Err(e) = joined {
            warn!(
                program = %self.program,
                stream = ?self.kind,
                error = %e,
                "stream reader failed; output may be truncated"
            );
        }

        let bytes = match self.buffer.lock() {
            Ok(buf) => buf.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes).trim().to_string()
    }
}

async fn finish_capture(capture: Option<StreamCapture>, deadline: Option<Instant>) -> String {
    match capture {
        Some(c) => c.finish(deadline).await,
        None => String::new(),
    }
}

/// Read a child stream to EOF, chunk by chunk, preserving arrival order.
async fn collect_stream<R>(
    mut stream: R,
    kind: StreamKind,
    program: String,
    buffer: Arc<Mutex<Vec<u8>>>,
) where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 4096];

    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = &buf[..n];
                match kind {
                    StreamKind::Stdout => {
                        debug!(program = %program, "stdout: {}", String::from_utf8_lossy(chunk))
                    }
                    StreamKind::Stderr => {
                        debug!(program = %program, "stderr: {}", String::from_utf8_lossy(chunk))
                    }
                }
                match buffer.lock() {
                    Ok(mut collected) => collected.extend_from_slice(chunk),
                    Err(poisoned) => poisoned.into_inner().extend_from_slice(chunk),
                }
            }
            Err(e) => {
                warn!(program = %program, stream = ?kind, error = %e, "error reading child stream");
                break;
            }
        }
    }
}

fn append_line(buf: &mut String, line: &str) {
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}
