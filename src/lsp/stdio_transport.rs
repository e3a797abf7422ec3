// process-level stdio wiring: spawn the wrapped server with piped stdin/stdout
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::error::{Result, ShimError};

/// A running language server with its protocol pipes taken out.
pub struct ServerProcess {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

/// Spawn `program args...` with stdin/stdout piped and stderr inherited.
pub fn spawn_server(program: &str, args: &[String]) -> Result<ServerProcess> {
    debug!(command = program, args = ?args, "Starting language server");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| ShimError::spawn_failed(program, e))?;

    let stdin = child.stdin.take().ok_or(ShimError::MissingPipe("stdin"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or(ShimError::MissingPipe("stdout"))?;

    Ok(ServerProcess {
        child,
        stdin,
        stdout,
    })
}

/// Exit code to report for a finished server. A missing code (killed by a
/// signal) counts as success.
pub fn exit_code(status: ExitStatus) -> i32 {
    portable_code(status.code())
}

// Codes that do not fit a portable exit status (e.g. Windows NTSTATUS values)
// become a generic failure.
fn portable_code(code: Option<i32>) -> i32 {
    match code {
        None => 0,
        Some(code @ 0..=255) => code,
        Some(_) => 1,
    }
}

#[cfg(test)]
mod code_tests {
    use super::portable_code;
    use rstest::rstest;

    #[rstest]
    #[case(None, 0)]
    #[case(Some(0), 0)]
    #[case(Some(7), 7)]
    #[case(Some(255), 255)]
    #[case(Some(256), 1)]
    #[case(Some(-1), 1)]
    #[case(Some(0xC000_0005_u32 as i32), 1)]
    fn codes_are_mapped_to_portable_statuses(#[case] code: Option<i32>, #[case] expected: i32) {
        assert_eq!(portable_code(code), expected);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn spawned_server_pipes_are_connected() {
        let ServerProcess {
            mut child,
            mut stdin,
            mut stdout,
        } = spawn_server("cat", &[]).expect("spawn cat");

        stdin.write_all(b"Content-Length: 2\r\n\r\n{}").await.unwrap();
        drop(stdin);

        let mut echoed = Vec::new();
        stdout.read_to_end(&mut echoed).await.unwrap();
        assert_eq!(echoed, b"Content-Length: 2\r\n\r\n{}");

        let status = child.wait().await.unwrap();
        assert_eq!(exit_code(status), 0);
    }

    #[tokio::test]
    async fn exit_code_is_propagated() {
        let ServerProcess { mut child, .. } =
            spawn_server("sh", &["-c".to_string(), "exit 3".to_string()]).expect("spawn sh");
        let status = child.wait().await.unwrap();
        assert_eq!(exit_code(status), 3);
    }

    #[tokio::test]
    async fn signal_termination_counts_as_success() {
        let ServerProcess { mut child, .. } =
            spawn_server("sh", &["-c".to_string(), "kill -9 $$".to_string()]).expect("spawn sh");
        let status = child.wait().await.unwrap();
        assert_eq!(status.code(), None);
        assert_eq!(exit_code(status), 0);
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = match spawn_server("definitely-not-a-real-lsp-binary", &[]) {
            Ok(_) => panic!("spawn should fail"),
            Err(e) => e,
        };
        assert!(matches!(err, ShimError::SpawnFailed { .. }));
        assert!(err.to_string().contains("definitely-not-a-real-lsp-binary"));
    }
}
