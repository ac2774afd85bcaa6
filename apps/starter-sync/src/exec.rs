//! External command runner.
//!
//! Commands are spawned directly (no shell). Their stdout/stderr are echoed
//! to this process's own stdout/stderr while also being buffered, so callers
//! get the full output back and operators still see progress live.

use crate::error::CommandError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;

/// Per-invocation knobs for [`run`].
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Treat a non-zero exit code as a normal result instead of an error.
    pub allow_nonzero: bool,
    pub cwd: Option<PathBuf>,
    /// Extra variables layered over the inherited environment.
    pub env: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run `program` with `args` and wait for it to finish.
pub async fn run(
    program: &str,
    args: &[String],
    options: &CommandOptions,
) -> Result<CommandOutput, CommandError> {
    tracing::debug!(program, ?args, cwd = ?options.cwd, "running command");

    let mut command = Command::new(program);
    command
        .args(args)
        .envs(&options.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }

    let mut child = command.spawn().map_err(|source| CommandError::Spawn {
        program: program.to_string(),
        source,
    })?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let mut out_buf = Vec::new();
    let mut err_buf = Vec::new();

    let finished = {
        let drain = async {
            tokio::join!(
                tee(stdout, tokio::io::stdout(), &mut out_buf),
                tee(stderr, tokio::io::stderr(), &mut err_buf),
                child.wait(),
            )
        };
        match options.timeout {
            Some(limit) => tokio::time::timeout(limit, drain).await.ok(),
            None => Some(drain.await),
        }
    };

    let io_err = |source: std::io::Error| CommandError::Io {
        program: program.to_string(),
        source,
    };
    let (out_res, err_res, status) = match finished {
        Some(parts) => parts,
        None => {
            // Timed out: the drain future is gone, kill the child before failing.
            let _ = child.kill().await;
            let limit = options.timeout.unwrap_or_default();
            tracing::warn!(program, timeout_secs = limit.as_secs_f64(), "command timed out");
            return Err(CommandError::Timeout {
                program: program.to_string(),
                timeout: limit,
                stderr: String::from_utf8_lossy(&err_buf).into_owned(),
            });
        }
    };
    out_res.map_err(io_err)?;
    err_res.map_err(io_err)?;
    let status = status.map_err(io_err)?;

    let output = CommandOutput {
        stdout: String::from_utf8_lossy(&out_buf).into_owned(),
        stderr: String::from_utf8_lossy(&err_buf).into_owned(),
        // Killed by a signal: no code, report -1.
        exit_code: status.code().unwrap_or(-1),
    };
    if output.exit_code != 0 && !options.allow_nonzero {
        return Err(CommandError::NonZeroExit {
            program: program.to_string(),
            code: output.exit_code,
            stderr: output.stderr,
        });
    }
    Ok(output)
}

/// Copy `reader` into both `sink` and `buf` until EOF.
async fn tee<R, W>(reader: Option<R>, mut sink: W, buf: &mut Vec<u8>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(());
    };
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        sink.write_all(&chunk[..n]).await?;
    }
    sink.flush().await
}

/// Git operations against one working tree.
pub struct Git {
    workdir: PathBuf,
    timeout: Option<Duration>,
}

impl Git {
    pub fn new(workdir: &Path, timeout: Option<Duration>) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            timeout,
        }
    }

    fn options(&self) -> CommandOptions {
        CommandOptions {
            cwd: Some(self.workdir.clone()),
            timeout: self.timeout,
            ..CommandOptions::default()
        }
    }

    /// Switch the working tree to `branch`.
    pub async fn checkout(&self, branch: &str) -> Result<CommandOutput, CommandError> {
        let args = vec!["checkout".to_string(), branch.to_string()];
        run("git", &args, &self.options()).await
    }

    /// Restore `paths` from `source` into the working tree and index.
    pub async fn checkout_paths(
        &self,
        source: &str,
        paths: &[String],
    ) -> Result<CommandOutput, CommandError> {
        let mut args = vec!["checkout".to_string(), source.to_string(), "--".to_string()];
        args.extend(paths.iter().cloned());
        run("git", &args, &self.options()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let out = run(
            "sh",
            &argv(&["-c", "echo hello; echo oops >&2"]),
            &CommandOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(out.stdout, "hello\n");
        assert_eq!(out.stderr, "oops\n");
        assert_eq!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error_with_stderr() {
        let err = run(
            "sh",
            &argv(&["-c", "echo broken >&2; exit 3"]),
            &CommandOptions::default(),
        )
        .await
        .unwrap_err();
        match err {
            CommandError::NonZeroExit { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_allowed() {
        let opts = CommandOptions {
            allow_nonzero: true,
            ..CommandOptions::default()
        };
        let out = run("sh", &argv(&["-c", "exit 4"]), &opts).await.unwrap();
        assert_eq!(out.exit_code, 4);
    }

    #[tokio::test]
    async fn test_missing_executable_fails_to_spawn() {
        let err = run(
            "starter-sync-definitely-not-a-binary",
            &[],
            &CommandOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_and_fails() {
        let opts = CommandOptions {
            timeout: Some(Duration::from_millis(200)),
            ..CommandOptions::default()
        };
        let started = std::time::Instant::now();
        let err = run("sleep", &argv(&["5"]), &opts).await.unwrap_err();
        assert!(matches!(err, CommandError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_cwd_and_env_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = HashMap::new();
        env.insert("STARTER_SYNC_TEST".to_string(), "42".to_string());
        let opts = CommandOptions {
            cwd: Some(dir.path().to_path_buf()),
            env,
            ..CommandOptions::default()
        };
        let out = run("sh", &argv(&["-c", "echo $STARTER_SYNC_TEST; pwd"]), &opts)
            .await
            .unwrap();
        let mut lines = out.stdout.lines();
        assert_eq!(lines.next(), Some("42"));
        let pwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(
            pwd.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
