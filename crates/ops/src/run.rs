//! Subprocess invocation of the provisioned binary
//!
//! Builds the argument vector deterministically, spawns the binary with
//! piped stdio, accumulates stdout/stderr while the child runs, and maps
//! the exit code to success or `ProcessError::ExitFailure`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use yedctl_errors::{ConfigError, Error, ProcessError};
use yedctl_events::{AppEvent, EventEmitter, EventSender, FailureContext, RunEvent};

/// The operation the binary is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How payload and key material reach the child process.
///
/// `Stdin` is the default shape: the argument list carries only the mode and
/// the rules file path, and the payload goes over the child's stdin, so
/// nothing sensitive is visible in a process listing. `Args` exists for
/// binaries whose ABI takes the key and value positionally; the key still
/// goes nowhere but the argument list.
#[derive(Debug, Clone)]
pub enum Transport {
    Stdin { config_path: PathBuf },
    Args { key: String },
}

/// One invocation of the binary. Constructed fresh per call, never persisted.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub mode: Mode,
    pub payload: String,
    pub transport: Transport,
    pub validate: bool,
}

impl RunRequest {
    /// Deterministic argument vector for this request.
    fn argv(&self) -> Vec<String> {
        let mut args = vec![self.mode.as_str().to_string()];
        match &self.transport {
            Transport::Stdin { config_path } => {
                args.push("--config".to_string());
                args.push(config_path.display().to_string());
            }
            Transport::Args { key } => {
                args.push("--key".to_string());
                args.push(key.clone());
                args.push("--value".to_string());
                args.push(self.payload.clone());
            }
        }
        if self.validate {
            args.push("--validate-rules".to_string());
        }
        args
    }

    fn stdin_payload(&self) -> Option<&str> {
        match self.transport {
            Transport::Stdin { .. } => Some(&self.payload),
            Transport::Args { .. } => None,
        }
    }
}

/// Run the binary at `binary` and return its trimmed stdout.
///
/// stdout and stderr are accumulated concurrently while the child runs, so
/// neither pipe can fill and stall the process.
///
/// # Errors
///
/// - `ConfigError::RulesFileMissing` when the stdin transport's rules file
///   does not exist
/// - `ProcessError::SpawnFailed` when the binary cannot be started
/// - `ProcessError::ExitFailure` carrying the accumulated stderr on a
///   non-zero exit
/// - `ProcessError::Terminated` when the child dies to a signal
pub async fn run_cli(binary: &Path, request: &RunRequest, tx: &EventSender) -> Result<String, Error> {
    if let Transport::Stdin { config_path } = &request.transport {
        if tokio::fs::metadata(config_path).await.is_err() {
            return Err(ConfigError::RulesFileMissing {
                path: config_path.display().to_string(),
            }
            .into());
        }
    }

    tx.emit(AppEvent::Run(RunEvent::Started {
        mode: request.mode.to_string(),
    }));

    match invoke(binary, request).await {
        Ok(stdout) => {
            tx.emit(AppEvent::Run(RunEvent::Completed {
                mode: request.mode.to_string(),
                stdout_bytes: stdout.len() as u64,
            }));
            Ok(stdout)
        }
        Err(e) => {
            tx.emit(AppEvent::Run(RunEvent::Failed {
                mode: request.mode.to_string(),
                failure: FailureContext::from_error(&e),
            }));
            Err(e)
        }
    }
}

async fn invoke(binary: &Path, request: &RunRequest) -> Result<String, Error> {
    let binary_name = binary.display().to_string();

    let stdin_mode = if request.stdin_payload().is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    };

    let mut child = Command::new(binary)
        .args(request.argv())
        .stdin(stdin_mode)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ProcessError::SpawnFailed {
            binary: binary_name.clone(),
            message: e.to_string(),
        })?;

    // Pipes are taken up front so the child handle itself can be waited on
    // concurrently with the reads.
    let stdin_pipe = child.stdin.take();
    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| Error::internal("child stdout was not piped"))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| Error::internal("child stderr was not piped"))?;

    let payload = request.stdin_payload().map(str::to_owned);
    let feed_stdin = async {
        if let (Some(mut stdin), Some(payload)) = (stdin_pipe, payload) {
            stdin.write_all(payload.as_bytes()).await?;
            stdin.shutdown().await?;
            // Dropping the handle closes the pipe so the child sees EOF.
        }
        Ok::<(), std::io::Error>(())
    };

    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();
    let (status, stdin_result, stdout_result, stderr_result) = tokio::join!(
        child.wait(),
        feed_stdin,
        stdout_pipe.read_to_end(&mut stdout_buf),
        stderr_pipe.read_to_end(&mut stderr_buf),
    );

    stdout_result?;
    stderr_result?;
    let status = status?;

    // A child that exits before draining its stdin breaks the pipe; judged
    // by its exit status below, not by the failed write. Any other write
    // error still surfaces.
    if let Err(e) = stdin_result {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(ProcessError::StdinWriteFailed {
                binary: binary_name,
                message: e.to_string(),
            }
            .into());
        }
    }

    match status.code() {
        Some(0) => Ok(String::from_utf8_lossy(&stdout_buf).trim_end().to_string()),
        Some(code) => Err(ProcessError::ExitFailure {
            binary: binary_name,
            code,
            stderr: String::from_utf8_lossy(&stderr_buf).trim().to_string(),
        }
        .into()),
        None => Err(ProcessError::Terminated {
            binary: binary_name,
        }
        .into()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use yedctl_events::channel;

    async fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        tokio::fs::write(&path, format!("#!/bin/sh\n{body}\n"))
            .await
            .unwrap();
        yedctl_platform::make_executable(&path).await.unwrap();
        path
    }

    fn args_request(mode: Mode, payload: &str) -> RunRequest {
        RunRequest {
            mode,
            payload: payload.to_string(),
            transport: Transport::Args {
                key: "test-key".to_string(),
            },
            validate: false,
        }
    }

    #[tokio::test]
    async fn zero_exit_returns_trimmed_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "ok.sh", "printf 'cafe\\n'").await;
        let (tx, _rx) = channel();

        let out = run_cli(&bin, &args_request(Mode::Encrypt, "x"), &tx)
            .await
            .unwrap();
        assert_eq!(out, "cafe");
    }

    #[tokio::test]
    async fn nonzero_exit_surfaces_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fail.sh", "echo 'bad key' >&2; exit 3").await;
        let (tx, _rx) = channel();

        let err = run_cli(&bin, &args_request(Mode::Decrypt, "x"), &tx)
            .await
            .unwrap_err();
        match err {
            Error::Process(ProcessError::ExitFailure { code, stderr, .. }) => {
                assert_eq!(code, 3);
                assert!(stderr.contains("bad key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn nonzero_exit_with_silent_stderr_reports_code() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "silent.sh", "exit 7").await;
        let (tx, _rx) = channel();

        let err = run_cli(&bin, &args_request(Mode::Encrypt, "x"), &tx)
            .await
            .unwrap_err();
        match err {
            Error::Process(ProcessError::ExitFailure { code, stderr, .. }) => {
                assert_eq!(code, 7);
                assert!(stderr.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn stdin_transport_feeds_payload() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join(".yed_config.yml");
        tokio::fs::write(&rules, "rules: []\n").await.unwrap();
        // `cat` echoes the payload back; the mode/--config args are ignored.
        let bin = script(dir.path(), "echoer.sh", "cat -").await;
        let (tx, _rx) = channel();

        let request = RunRequest {
            mode: Mode::Encrypt,
            payload: "secret: value".to_string(),
            transport: Transport::Stdin {
                config_path: rules,
            },
            validate: false,
        };
        let out = run_cli(&bin, &request, &tx).await.unwrap();
        assert_eq!(out, "secret: value");
    }

    #[tokio::test]
    async fn child_exiting_without_draining_stdin_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join(".yed_config.yml");
        tokio::fs::write(&rules, "rules: []\n").await.unwrap();
        let bin = script(dir.path(), "ignorer.sh", "printf 'done'").await;
        let (tx, _rx) = channel();

        // Larger than any pipe buffer, so the write cannot complete before
        // the child exits and the pipe breaks.
        let request = RunRequest {
            mode: Mode::Encrypt,
            payload: "x".repeat(4 * 1024 * 1024),
            transport: Transport::Stdin {
                config_path: rules,
            },
            validate: false,
        };
        let out = run_cli(&bin, &request, &tx).await.unwrap();
        assert_eq!(out, "done");
    }

    #[tokio::test]
    async fn stdin_transport_requires_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "noop.sh", "exit 0").await;
        let (tx, _rx) = channel();

        let request = RunRequest {
            mode: Mode::Encrypt,
            payload: String::new(),
            transport: Transport::Stdin {
                config_path: dir.path().join("absent.yml"),
            },
            validate: false,
        };
        let err = run_cli(&bin, &request, &tx).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::RulesFileMissing { .. })
        ));
    }

    #[test]
    fn argv_is_deterministic() {
        let request = RunRequest {
            mode: Mode::Decrypt,
            payload: "v".to_string(),
            transport: Transport::Args {
                key: "k".to_string(),
            },
            validate: true,
        };
        assert_eq!(
            request.argv(),
            vec!["decrypt", "--key", "k", "--value", "v", "--validate-rules"]
        );

        let request = RunRequest {
            mode: Mode::Encrypt,
            payload: "v".to_string(),
            transport: Transport::Stdin {
                config_path: PathBuf::from(".yed_config.yml"),
            },
            validate: false,
        };
        assert_eq!(request.argv(), vec!["encrypt", "--config", ".yed_config.yml"]);
    }
}
