//! `command` supplier: an external process printing a JSON array of records.
//!
//! Command strings come in two forms:
//!
//! - `"gh repo list --json name"` — split on whitespace, executed directly.
//! - `"!cat a.json | jq '.items'"` — leading `!` runs the rest through `sh -c`.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sgen_core::{CancelToken, Record};

use crate::error::SupplyError;
use crate::Supplier;

/// How often a running child is checked for exit and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs a command and decodes its stdout. Always cached: commands may be slow
/// or hit the network.
#[derive(Debug, Clone)]
pub struct CommandSupplier {
    argv: Vec<String>,
}

impl CommandSupplier {
    /// Parse `cmd` into an argv. Fails with [`SupplyError::EmptyCommand`] when
    /// nothing is left to run.
    pub fn new(cmd: &str) -> Result<Self, SupplyError> {
        let argv = match cmd.strip_prefix('!') {
            Some(script) => {
                if script.trim().is_empty() {
                    return Err(SupplyError::EmptyCommand);
                }
                vec!["sh".to_string(), "-c".to_string(), script.to_string()]
            }
            None => {
                let argv: Vec<String> = cmd.split_whitespace().map(str::to_string).collect();
                if argv.is_empty() {
                    return Err(SupplyError::EmptyCommand);
                }
                argv
            }
        };
        Ok(CommandSupplier { argv })
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Block until the child exits, killing it if `cancel` fires first.
    fn wait(&self, child: &mut Child, cancel: &CancelToken) -> Result<ExitStatus, SupplyError> {
        loop {
            if cancel.is_cancelled() {
                tracing::info!("cancelling '{}' (pid {})", self.program(), child.id());
                let _ = child.kill();
                let _ = child.wait();
                return Err(SupplyError::Cancelled);
            }
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    let _ = child.kill();
                    return Err(SupplyError::Spawn {
                        program: self.program().to_string(),
                        source,
                    });
                }
            }
        }
    }
}

impl Supplier for CommandSupplier {
    fn should_cache(&self) -> bool {
        true
    }

    fn supply(&self, cancel: &CancelToken) -> Result<Vec<Record>, SupplyError> {
        if cancel.is_cancelled() {
            return Err(SupplyError::Cancelled);
        }
        let program = self.program().to_string();
        tracing::debug!("running {:?}", self.argv);

        let mut child = Command::new(&program)
            .args(&self.argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SupplyError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Pipes are drained off-thread while the child is polled.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child, cancel)?;

        // A backgrounded grandchild can keep the pipes open after the child
        // exits, so collecting output also watches the token.
        let stdout = join(stdout, cancel)?.map_err(|source| SupplyError::Spawn {
            program: program.clone(),
            source,
        })?;
        let stderr = join(stderr, cancel)?.unwrap_or_default();

        if !status.success() {
            return Err(SupplyError::CommandFailed {
                program,
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        let records: Vec<Record> = serde_json::from_slice(&stdout)
            .map_err(|source| SupplyError::DecodeOutput { program, source })?;
        tracing::debug!("'{}' produced {} records", self.program(), records.len());
        Ok(records)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

/// Wait for a pipe reader, giving up with [`SupplyError::Cancelled`] once
/// `cancel` fires. An abandoned reader stays detached until the pipe closes.
fn join(
    handle: JoinHandle<std::io::Result<Vec<u8>>>,
    cancel: &CancelToken,
) -> Result<std::io::Result<Vec<u8>>, SupplyError> {
    while !handle.is_finished() {
        if cancel.is_cancelled() {
            tracing::info!("cancelled while draining output");
            return Err(SupplyError::Cancelled);
        }
        thread::sleep(POLL_INTERVAL);
    }
    Ok(handle
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("pipe reader panicked"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_command_is_split_on_whitespace() {
        let s = CommandSupplier::new("gh  repo list --json nameWithOwner").unwrap();
        assert_eq!(s.argv(), ["gh", "repo", "list", "--json", "nameWithOwner"]);
        assert!(s.should_cache());
    }

    #[test]
    fn bang_prefix_runs_through_shell() {
        let s = CommandSupplier::new("!cat a.json | jq .").unwrap();
        assert_eq!(s.argv(), ["sh", "-c", "cat a.json | jq ."]);
    }

    #[test]
    fn empty_commands_are_rejected() {
        for cmd in ["", "   ", "!", "!  "] {
            assert!(
                matches!(CommandSupplier::new(cmd), Err(SupplyError::EmptyCommand)),
                "{cmd:?} should be rejected"
            );
        }
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::time::Instant;

        #[test]
        fn decodes_stdout_as_records() {
            let s = CommandSupplier::new(r#"!printf '[{"name":"bob"},{"name":"alice"}]'"#).unwrap();
            let records = s.supply(&CancelToken::new()).unwrap();
            assert_eq!(records.len(), 2);
            assert_eq!(records[1]["name"], "alice");
        }

        #[test]
        fn non_zero_exit_reports_stderr() {
            let s = CommandSupplier::new("!echo boom >&2; exit 3").unwrap();
            let err = s.supply(&CancelToken::new()).unwrap_err();
            match err {
                SupplyError::CommandFailed { stderr, status, .. } => {
                    assert_eq!(stderr, "boom");
                    assert_eq!(status.code(), Some(3));
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn invalid_output_is_a_decode_error() {
            let s = CommandSupplier::new("!echo not-json").unwrap();
            let err = s.supply(&CancelToken::new()).unwrap_err();
            assert!(matches!(err, SupplyError::DecodeOutput { .. }));
        }

        #[test]
        fn missing_program_is_a_spawn_error() {
            let s = CommandSupplier::new("definitely-not-a-real-program-sgen").unwrap();
            let err = s.supply(&CancelToken::new()).unwrap_err();
            assert!(matches!(err, SupplyError::Spawn { .. }));
        }

        #[test]
        fn already_cancelled_token_never_spawns() {
            let token = CancelToken::new();
            token.cancel();
            let s = CommandSupplier::new("definitely-not-a-real-program-sgen").unwrap();
            assert!(matches!(s.supply(&token), Err(SupplyError::Cancelled)));
        }

        #[test]
        fn cancellation_kills_a_running_child() {
            let token = CancelToken::new();
            let trigger = token.clone();
            let canceller = thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                trigger.cancel();
            });

            let started = Instant::now();
            let s = CommandSupplier::new("sleep 30").unwrap();
            let err = s.supply(&token).unwrap_err();
            canceller.join().unwrap();

            assert!(matches!(err, SupplyError::Cancelled));
            assert!(started.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn cancellation_stops_waiting_on_inherited_pipes() {
            let token = CancelToken::new();
            let trigger = token.clone();
            let canceller = thread::spawn(move || {
                thread::sleep(Duration::from_millis(300));
                trigger.cancel();
            });

            let started = Instant::now();
            let s = CommandSupplier::new("!sleep 4 & printf '[]'").unwrap();
            let result = s.supply(&token);
            canceller.join().unwrap();

            assert!(matches!(result, Err(SupplyError::Cancelled)), "got: {result:?}");
            assert!(started.elapsed() < Duration::from_secs(3));
        }
    }
}
