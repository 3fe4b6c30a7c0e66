//! Blocking execution of external programs.
//!
//! Programs are spawned from an argument vector, never through a shell, so file
//! names reach the child verbatim. There is no timeout: a hung child hangs the run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::harness::{timed, ExitPolicy};

/// `<program> <args...>` as an explicit argument vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramCall {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ProgramCall {
    /// The `<binary-path> <sample-path>` contract every variant follows.
    pub fn on_sample(program: &Path, sample: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
            args: vec![sample.as_os_str().to_os_string()],
        }
    }

    pub fn display(&self) -> String {
        let mut out = self.program.display().to_string();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        out
    }
}

/// Everything observed about one finished child.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub command: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub wall: Duration,
}

impl Invocation {
    /// Apply `policy` to the exit status; output content is checked separately.
    pub fn check(self, policy: ExitPolicy) -> Result<Self> {
        if self.status.success() {
            return Ok(self);
        }
        match policy {
            ExitPolicy::Ignore => {
                tracing::warn!(command = %self.command, status = %self.status, "non-zero exit ignored");
                Ok(self)
            }
            ExitPolicy::RequireSuccess => Err(Error::ExitStatus {
                command: self.command,
                status: self.status,
            }),
        }
    }
}

/// Spawn `call`, wait for it, and capture its standard output as text.
pub fn run(call: &ProgramCall) -> Result<Invocation> {
    let command = call.display();
    tracing::info!(%command, "invoking");

    let (output, wall) = timed(|| {
        Command::new(&call.program)
            .args(&call.args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
    });
    let output = output.map_err(|source| Error::Spawn {
        program: call.program.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    tracing::info!(
        %command,
        status = %output.status,
        wall_ms = wall.as_millis() as u64,
        "{}",
        stdout.trim_end()
    );

    Ok(Invocation {
        command,
        status: output.status,
        stdout,
        wall,
    })
}

#[cfg(all(test, unix))]
pub(crate) mod test_support {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Write an executable `/bin/sh` script named `name` into `dir`.
    pub fn stub_program(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }
}
