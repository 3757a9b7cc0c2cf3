//! SSH Remote Host
//!
//! Implements [`RemoteHost`] by shelling out to `ssh` and `scp`. The first
//! connection opens a control master (`ControlMaster=auto`) whose socket
//! lives in a private temporary directory, so every later command and copy
//! rides the same authenticated connection. The master is closed on drop.
//!
//! Privileged commands never share stdin between the sudo password and a
//! payload: input is copied to a private remote file first and redirected
//! into the command, so a sudo that does not prompt cannot pass the
//! password through.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

use crate::domain::ports::{CommandOutput, RemoteHost, TransportError};

use super::quote;

/// Seconds the control master survives after the last client disconnects
const CONTROL_PERSIST_SECS: u32 = 600;

/// Connection to one remote machine
pub struct SshHost {
    /// SSH destination (user@host or host)
    destination: String,
    /// Password fed to `sudo -S`; `None` runs `sudo -n`
    sudo_password: Option<String>,
    /// Owns the control socket directory and staged payloads
    control_dir: TempDir,
    ssh_program: String,
    scp_program: String,
}

impl SshHost {
    /// Open the shared connection and verify the host answers
    pub fn connect(
        destination: impl Into<String>,
        sudo_password: Option<String>,
    ) -> Result<Self, TransportError> {
        Self::connect_with_programs(destination, sudo_password, "ssh", "scp")
    }

    /// Connect using `ssh`/`scp`-compatible binaries other than the defaults
    pub fn connect_with_programs(
        destination: impl Into<String>,
        sudo_password: Option<String>,
        ssh_program: impl Into<String>,
        scp_program: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let control_dir = tempfile::Builder::new().prefix("hoist-ssh-").tempdir()?;
        let host = Self {
            destination: destination.into(),
            sudo_password,
            control_dir,
            ssh_program: ssh_program.into(),
            scp_program: scp_program.into(),
        };

        let output = host.exec("true", None)?;
        if !output.ok() {
            return Err(TransportError::Connection {
                host: host.destination.clone(),
                message: output.stderr.trim().to_string(),
            });
        }

        tracing::info!(host = %host.destination, "connected");
        Ok(host)
    }

    fn control_path(&self) -> PathBuf {
        self.control_dir.path().join("control.sock")
    }

    fn control_options(&self) -> Vec<String> {
        vec![
            "-o".to_string(),
            format!("ControlPath={}", self.control_path().display()),
            "-o".to_string(),
            "ControlMaster=auto".to_string(),
            "-o".to_string(),
            format!("ControlPersist={}", CONTROL_PERSIST_SECS),
        ]
    }

    /// Run a command on the remote host via SSH
    fn exec(&self, command: &str, input: Option<&str>) -> Result<CommandOutput, TransportError> {
        tracing::debug!(host = %self.destination, command, "ssh exec");

        let mut child = Command::new(&self.ssh_program)
            .args(self.control_options())
            .arg(&self.destination)
            .arg(command)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: "ssh",
                source,
            })?;

        if let Some(inp) = input {
            if let Some(mut stdin) = child.stdin.take() {
                // The remote side may exit without reading its input
                if let Err(e) = stdin.write_all(inp.as_bytes()) {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(e.into());
                    }
                }
            }
        }

        let output = child.wait_with_output()?;
        let result = CommandOutput {
            // ssh reports 255 for its own failures; a missing code means a signal
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if result.status == 255 {
            return Err(TransportError::Connection {
                host: self.destination.clone(),
                message: result.stderr.trim().to_string(),
            });
        }

        tracing::trace!(status = result.status, "ssh exit");
        Ok(result)
    }
}

impl RemoteHost for SshHost {
    fn name(&self) -> &str {
        &self.destination
    }

    fn query(&self, command: &str) -> Result<CommandOutput, TransportError> {
        self.exec(command, None)
    }

    fn run(&self, command: &str) -> Result<CommandOutput, TransportError> {
        self.exec(command, None)
    }

    fn sudo(&self, command: &str, input: Option<&str>) -> Result<CommandOutput, TransportError> {
        let Some(payload) = input else {
            return self.exec_sudo(command);
        };

        let staged = self.stage_input(payload)?;
        let result = self.exec_sudo(&format!("{} < {}", command, quote(&staged)));
        if let Err(e) = self.exec(&format!("rm -f {}", quote(&staged)), None) {
            tracing::debug!(staged = %staged, error = %e, "staged input left behind");
        }
        result
    }

    fn put(&self, local: &Path, remote: &str) -> Result<(), TransportError> {
        tracing::debug!(host = %self.destination, local = %local.display(), remote, "scp");

        let output = Command::new(&self.scp_program)
            .args(self.control_options())
            .arg("-q")
            .arg(local)
            .arg(format!("{}:{}", self.destination, remote))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| TransportError::Spawn {
                program: "scp",
                source,
            })?;

        if !output.status.success() {
            return Err(TransportError::Copy {
                local: local.to_path_buf(),
                remote: remote.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl SshHost {
    /// Run `command` under sudo; stdin carries the password and nothing else
    fn exec_sudo(&self, command: &str) -> Result<CommandOutput, TransportError> {
        let wrapped = sudo_command(command, self.sudo_password.is_some());
        match &self.sudo_password {
            Some(password) => self.exec(&wrapped, Some(&format!("{}\n", password))),
            None => self.exec(&wrapped, None),
        }
    }

    /// Copy `payload` into a fresh `mktemp` file owned by the connecting user
    fn stage_input(&self, payload: &str) -> Result<String, TransportError> {
        let created = self.exec("mktemp", None)?;
        let staged = created.stdout.trim().to_string();
        if !created.ok() || staged.is_empty() {
            return Err(TransportError::Connection {
                host: self.destination.clone(),
                message: format!("unable to stage input: {}", created.stderr.trim()),
            });
        }

        let mut local = tempfile::NamedTempFile::new_in(self.control_dir.path())?;
        local.write_all(payload.as_bytes())?;
        local.flush()?;
        self.put(local.path(), &staged)?;
        Ok(staged)
    }
}

impl Drop for SshHost {
    fn drop(&mut self) {
        let _ = Command::new(&self.ssh_program)
            .arg("-o")
            .arg(format!("ControlPath={}", self.control_path().display()))
            .arg("-O")
            .arg("exit")
            .arg(&self.destination)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
}

/// Wrap a shell command for privileged execution
fn sudo_command(command: &str, with_password: bool) -> String {
    let mode = if with_password { "-S -p ''" } else { "-n" };
    format!("sudo {} sh -c {}", mode, quote(command))
}
