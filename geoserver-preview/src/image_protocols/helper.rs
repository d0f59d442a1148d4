// ABOUTME: Runs external image helpers (chafa, img2sixel) as subprocesses
// ABOUTME: Hides process spawning behind a trait so render tiers can be tested offline

use crate::constants::helpers::{EXIT_POLL, TIMEOUT};
use anyhow::{Context, Result, anyhow, bail};
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Executes one helper invocation and returns its stdout.
pub trait HelperRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String], stdin: Option<&[u8]>) -> Result<Vec<u8>>;
}

/// Spawns real processes.
pub struct SystemRunner;

impl HelperRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], stdin: Option<&[u8]>) -> Result<Vec<u8>> {
        self.run_with_timeout(program, args, stdin, TIMEOUT)
    }
}

impl SystemRunner {
    /// Run `program`, killing it if it has not exited within `timeout`.
    pub fn run_with_timeout(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", program))?;

        // Pipes are serviced on their own threads so a full buffer can't stall the child
        let writer = match (stdin, child.stdin.take()) {
            (Some(data), Some(mut pipe)) => {
                let data = data.to_vec();
                Some(thread::spawn(move || pipe.write_all(&data)))
            }
            _ => None,
        };
        let stdout = child.stdout.take().map(read_pipe);
        let stderr = child.stderr.take().map(read_pipe);

        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("Failed to wait for {}", program))?
            {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                child
                    .wait()
                    .with_context(|| format!("Failed to stop {}", program))?;
                bail!("{} timed out after {}ms", program, timeout.as_millis());
            }
            thread::sleep(EXIT_POLL);
        };

        let stdout = collect_pipe(program, stdout)?;
        let stderr = collect_pipe(program, stderr)?;

        if !status.success() {
            bail!(
                "{} exited with {}: {}",
                program,
                status,
                String::from_utf8_lossy(&stderr).trim()
            );
        }

        if let Some(handle) = writer {
            handle
                .join()
                .map_err(|_| anyhow!("{} stdin writer panicked", program))?
                .with_context(|| format!("Failed to write image to {}", program))?;
        }

        Ok(stdout)
    }
}

fn read_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect_pipe(
    program: &str,
    reader: Option<JoinHandle<io::Result<Vec<u8>>>>,
) -> Result<Vec<u8>> {
    let Some(handle) = reader else {
        return Ok(Vec::new());
    };
    handle
        .join()
        .map_err(|_| anyhow!("{} output reader panicked", program))?
        .with_context(|| format!("Failed to read output of {}", program))
}

/// Accept helper output only when it is non-empty UTF-8.
pub fn printable_output(program: &str, output: Vec<u8>) -> Result<String> {
    if output.iter().all(|b| b.is_ascii_whitespace()) {
        bail!("{} produced no output", program);
    }
    String::from_utf8(output).map_err(|e| anyhow!("{} produced malformed output: {}", program, e))
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted runner that records every invocation.
    #[derive(Default)]
    pub struct FakeRunner {
        responses: Mutex<HashMap<String, Result<Vec<u8>, String>>>,
        pub calls: Mutex<Vec<(String, Vec<String>, Option<Vec<u8>>)>>,
    }

    impl FakeRunner {
        /// Respond to invocations whose args contain `marker` (or the program name).
        pub fn respond(self, marker: &str, response: Result<&str, &str>) -> Self {
            self.responses.lock().unwrap().insert(
                marker.to_string(),
                response
                    .map(|out| out.as_bytes().to_vec())
                    .map_err(str::to_string),
            );
            self
        }

        pub fn programs(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(program, args, _)| {
                    let mode = args
                        .windows(2)
                        .find(|pair| pair[0] == "--format")
                        .map(|pair| format!(" {}", pair[1]))
                        .unwrap_or_default();
                    format!("{}{}", program, mode)
                })
                .collect()
        }
    }

    impl HelperRunner for FakeRunner {
        fn run(&self, program: &str, args: &[String], stdin: Option<&[u8]>) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push((
                program.to_string(),
                args.to_vec(),
                stdin.map(<[u8]>::to_vec),
            ));

            let responses = self.responses.lock().unwrap();
            let response = args
                .iter()
                .find_map(|arg| responses.get(arg))
                .or_else(|| responses.get(program));

            match response {
                Some(Ok(bytes)) => Ok(bytes.clone()),
                Some(Err(msg)) => Err(anyhow!("{}", msg)),
                None => Err(anyhow!("Failed to start {}", program)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_output_rejects_empty() {
        let err = printable_output("chafa", Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "chafa produced no output");

        assert!(printable_output("chafa", b" \n".to_vec()).is_err());
    }

    #[test]
    fn test_printable_output_rejects_invalid_utf8() {
        let err = printable_output("img2sixel", vec![0xff, 0xfe, 0x41]).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_printable_output_accepts_escape_sequences() {
        let frame = printable_output("img2sixel", b"\x1bPq#0;2;0;0;0\x1b\\".to_vec()).unwrap();
        assert!(frame.starts_with("\x1bPq"));
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let err = SystemRunner
            .run("gspreview-definitely-missing-helper", &[], None)
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("Failed to start gspreview-definitely-missing-helper")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_pipes_stdin() {
        let output = SystemRunner
            .run("cat", &[], Some(&b"map bytes"[..]))
            .unwrap();
        assert_eq!(output, b"map bytes");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_status() {
        let err = SystemRunner
            .run("sh", &["-c".to_string(), "echo boom >&2; exit 3".to_string()], None)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sh exited with"));
        assert!(msg.contains("boom"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_kills_hung_helper() {
        let started = Instant::now();
        let err = SystemRunner
            .run_with_timeout("sleep", &["5".to_string()], None, Duration::from_millis(200))
            .unwrap_err();

        assert_eq!(err.to_string(), "sleep timed out after 200ms");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_collects_large_output() {
        let output = SystemRunner
            .run_with_timeout(
                "sh",
                &["-c".to_string(), "head -c 200000 /dev/zero".to_string()],
                None,
                Duration::from_secs(10),
            )
            .unwrap();
        assert_eq!(output.len(), 200_000);
    }
}
