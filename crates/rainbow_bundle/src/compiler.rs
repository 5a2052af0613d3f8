//! Running the external JavaScript minifier.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::CompilationError;

/// Flags passed to the minifier ahead of the input files.
pub const OPTIMIZATION_FLAGS: [&str; 2] = ["--compilation_level", "ADVANCED_OPTIMIZATIONS"];

/// Default bound on a single compiler run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured output of a successful compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOutput {
    /// The minified bundle.
    pub stdout: String,
    /// Warnings and other diagnostics.
    pub stderr: String,
}

/// How to launch the minifier.
///
/// A compiler path ending in `.jar` is run as `<java> -jar <compiler>`;
/// anything else is executed directly.
#[derive(Debug, Clone)]
pub struct CompilerCommand {
    /// Compiler executable or `.jar`.
    pub compiler: PathBuf,
    /// Java launcher for `.jar` compilers.
    pub java: String,
    /// Flags appended after [`OPTIMIZATION_FLAGS`].
    pub extra_args: Vec<String>,
    /// Upper bound on a single run; the process is killed when exceeded.
    pub timeout: Duration,
}

impl CompilerCommand {
    /// Creates a command for `compiler` with the default launcher and timeout.
    pub fn new(compiler: impl Into<PathBuf>) -> Self {
        Self {
            compiler: compiler.into(),
            java: "java".to_string(),
            extra_args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Returns `true` if the compiler must be launched through Java.
    pub fn is_jar(&self) -> bool {
        self.compiler
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("jar"))
    }

    /// Builds the full argument vector, program first.
    pub fn argv(&self, files: &[PathBuf]) -> Vec<String> {
        let mut argv = Vec::with_capacity(files.len() + self.extra_args.len() + 5);
        if self.is_jar() {
            argv.push(self.java.clone());
            argv.push("-jar".to_string());
        }
        argv.push(self.compiler.display().to_string());
        argv.extend(OPTIMIZATION_FLAGS.iter().map(|s| s.to_string()));
        argv.extend(self.extra_args.iter().cloned());
        argv.extend(files.iter().map(|p| p.display().to_string()));
        argv
    }

    fn command(&self, files: &[PathBuf]) -> Command {
        let mut cmd = if self.is_jar() {
            let mut cmd = Command::new(&self.java);
            cmd.arg("-jar").arg(&self.compiler);
            cmd
        } else {
            Command::new(&self.compiler)
        };
        cmd.args(OPTIMIZATION_FLAGS)
            .args(&self.extra_args)
            .args(files)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Lead a fresh process group so a timeout can take down whatever a
        // wrapper script spawned, not just the wrapper.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }

    /// Runs the compiler over `files` and waits for it to finish.
    ///
    /// Fails if the process cannot be started, exits unsuccessfully, prints
    /// nothing on stdout, or outlives [`timeout`](Self::timeout). The timeout
    /// covers the whole run, including any processes the compiler started
    /// that keep its output pipes open.
    pub fn invoke(&self, files: &[PathBuf]) -> Result<CompilerOutput, CompilationError> {
        tracing::debug!(argv = ?self.argv(files), "running compiler");

        let mut child = self
            .command(files)
            .spawn()
            .map_err(|source| CompilationError::Spawn {
                program: self.program().display().to_string(),
                source,
            })?;

        // Drain both pipes concurrently so a chatty compiler cannot fill one
        // and stall while we wait on the other.
        let stdout = Drain::spawn(child.stdout.take());
        let stderr = Drain::spawn(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait().map_err(CompilationError::Wait)? {
                if stdout.is_finished() && stderr.is_finished() {
                    break status;
                }
            }
            if started.elapsed() >= self.timeout {
                kill_process_tree(&mut child);
                let _ = child.wait();
                return Err(CompilationError::Timeout {
                    secs: self.timeout.as_secs(),
                    stderr: stderr.snapshot(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = stdout.finish();
        let stderr = stderr.finish();
        tracing::debug!(%status, elapsed_ms = started.elapsed().as_millis() as u64, "compiler exited");

        if !status.success() {
            return Err(CompilationError::Failed { status, stderr });
        }
        if stdout.trim().is_empty() {
            return Err(CompilationError::EmptyOutput { stderr });
        }
        if !stderr.trim().is_empty() {
            tracing::warn!(stderr = %stderr.trim(), "compiler reported diagnostics");
        }
        Ok(CompilerOutput { stdout, stderr })
    }

    fn program(&self) -> &Path {
        if self.is_jar() {
            Path::new(&self.java)
        } else {
            &self.compiler
        }
    }
}

#[cfg(unix)]
fn kill_process_tree(child: &mut Child) {
    // The child leads its own group (see `command`), so its pid is the pgid.
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: kill(2) with a negative pid only signals that process group.
        unsafe {
            libc::kill(-pgid, libc::SIGKILL);
        }
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_process_tree(child: &mut Child) {
    let _ = child.kill();
}

/// A pipe read to completion on a helper thread into a shared buffer.
///
/// The buffer can be inspected before the reader finishes, so a timed-out
/// run still reports what the compiler printed without waiting on the pipe.
struct Drain {
    buf: Arc<Mutex<Vec<u8>>>,
    handle: Option<JoinHandle<()>>,
}

impl Drain {
    fn spawn<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let handle = pipe.map(|mut pipe| {
            let buf = Arc::clone(&buf);
            thread::spawn(move || {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => lock(&buf).extend_from_slice(&chunk[..n]),
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(_) => break,
                    }
                }
            })
        });
        Self { buf, handle }
    }

    fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    fn snapshot(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buf)).into_owned()
    }

    fn finish(mut self) -> String {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.snapshot()
    }
}

fn lock(buf: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(PoisonError::into_inner)
}
