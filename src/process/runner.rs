use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Default timeout for external commands
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of running an external command.
///
/// Distinguishes "did not start" from "timed out" from "ran with some exit
/// code" so callers can decide what matters to them.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub started: bool,
    pub timed_out: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    /// Started, finished in time, and exited zero
    pub fn success(&self) -> bool {
        self.started && !self.timed_out && self.exit_code == Some(0)
    }

    fn not_started() -> Self {
        Self {
            started: false,
            timed_out: false,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Runs external programs synchronously with a bounded timeout.
///
/// On timeout the child is killed and whatever output was captured so far
/// is returned; output is read on background threads so a straggling
/// grandchild holding the pipe open cannot stall the caller.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a command with this runner's timeout
    pub fn run(&self, program: &str, args: &[&str]) -> RunOutcome {
        self.run_with_timeout(program, args, self.timeout)
    }

    /// Run a command with an explicit timeout
    pub fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration) -> RunOutcome {
        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!(program, error = %e, "command failed to start");
                return RunOutcome::not_started();
            }
        };

        let stdout = Capture::drain(child.stdout.take());
        let stderr = Capture::drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return RunOutcome {
                        started: true,
                        timed_out: false,
                        exit_code: status.code(),
                        stdout: stdout.wait(),
                        stderr: stderr.wait(),
                    };
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        kill(&mut child);
                        tracing::warn!(program, ?timeout, "command timed out, killed");
                        return RunOutcome {
                            started: true,
                            timed_out: true,
                            exit_code: None,
                            stdout: stdout.snapshot(),
                            stderr: stderr.snapshot(),
                        };
                    }
                    thread::sleep(Duration::from_millis(10));
                }
                Err(e) => {
                    tracing::debug!(program, error = %e, "wait on command failed");
                    kill(&mut child);
                    return RunOutcome {
                        started: true,
                        timed_out: false,
                        exit_code: None,
                        stdout: stdout.snapshot(),
                        stderr: stderr.snapshot(),
                    };
                }
            }
        }
    }

    /// Launch a command and do not wait for it.
    ///
    /// There is no ordering guarantee relative to the caller; anyone who
    /// needs to observe the effect must check status afterwards.
    pub fn run_detached(&self, program: &str, args: &[&str]) -> bool {
        match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(program, error = %e, "detached command failed to start");
                false
            }
        }
    }
}

/// Incremental capture of one output pipe on a background thread.
///
/// `wait` joins the reader once the child has exited (the pipe closes
/// with it); `snapshot` takes whatever has arrived so far without
/// joining, so a killed child with a straggling grandchild holding the
/// pipe open cannot stall the caller.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Capture {
    fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let handle = pipe.map(|mut pipe| {
            let sink = Arc::clone(&buf);
            thread::spawn(move || {
                let mut chunk = [0u8; 4096];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => sink.lock().unwrap().extend_from_slice(&chunk[..n]),
                    }
                }
            })
        });
        Self { buf, handle }
    }

    fn wait(self) -> String {
        if let Some(handle) = self.handle {
            let _ = handle.join();
        }
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    fn snapshot(self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
