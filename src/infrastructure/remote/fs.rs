//! Remote File System Helpers
//!
//! Privileged file and system operations expressed as shell commands over a
//! [`RemoteHost`]. Reads go through `query`; everything that changes the host
//! goes through `sudo`, so a dry run suppresses it.

use crate::domain::ports::{CommandOutput, RemoteError, RemoteHost};

use super::quote;

/// Suffix of the staging file used by [`RemoteFs::write_atomic`]
pub const STAGING_SUFFIX: &str = ".new";

pub struct RemoteFs<'h> {
    host: &'h dyn RemoteHost,
}

impl<'h> RemoteFs<'h> {
    pub fn new(host: &'h dyn RemoteHost) -> Self {
        Self { host }
    }

    fn sudo(&self, command: String, input: Option<&str>) -> Result<CommandOutput, RemoteError> {
        let output = self.host.sudo(&command, input)?;
        RemoteError::check(&command, output)
    }

    fn probe(&self, command: String) -> Result<bool, RemoteError> {
        Ok(self.host.query(&command)?.ok())
    }

    /// Read a remote file, `None` when it is absent or unreadable
    pub fn read_file(&self, path: &str) -> Result<Option<String>, RemoteError> {
        let output = self.host.query(&format!("cat {}", quote(path)))?;
        if output.ok() {
            Ok(Some(output.stdout))
        } else {
            tracing::debug!(path, stderr = %output.stderr.trim(), "remote read failed");
            Ok(None)
        }
    }

    pub fn create_directory(&self, path: &str) -> Result<(), RemoteError> {
        self.sudo(format!("mkdir -p {}", quote(path)), None)?;
        Ok(())
    }

    pub fn move_file(&self, from: &str, to: &str) -> Result<(), RemoteError> {
        self.sudo(format!("mv -f {} {}", quote(from), quote(to)), None)?;
        Ok(())
    }

    pub fn remove(&self, path: &str) -> Result<(), RemoteError> {
        self.sudo(format!("rm -f {}", quote(path)), None)?;
        Ok(())
    }

    /// Write `contents` to `path` directly
    pub fn write_file(&self, path: &str, contents: &str) -> Result<(), RemoteError> {
        self.sudo(format!("tee {} > /dev/null", quote(path)), Some(contents))?;
        Ok(())
    }

    /// Write through a staging file and rename it over `path`
    ///
    /// The live path is only ever replaced by `mv`; if the rename fails the
    /// previous contents stay in place.
    pub fn write_atomic(&self, path: &str, contents: &str) -> Result<(), RemoteError> {
        let staging = format!("{}{}", path, STAGING_SUFFIX);
        self.write_file(&staging, contents)?;
        self.move_file(&staging, path)
    }

    /// Point `link` at `target`, replacing any existing link
    pub fn symlink(&self, target: &str, link: &str) -> Result<(), RemoteError> {
        self.sudo(format!("ln -sfn {} {}", quote(target), quote(link)), None)?;
        Ok(())
    }

    pub fn unpack(&self, archive: &str, destination: &str) -> Result<(), RemoteError> {
        self.sudo(
            format!("tar -C {} -xzf {}", quote(destination), quote(archive)),
            None,
        )?;
        Ok(())
    }

    pub fn user_exists(&self, user: &str) -> Result<bool, RemoteError> {
        self.probe(format!("id -u {}", quote(user)))
    }

    pub fn create_user(&self, user: &str) -> Result<(), RemoteError> {
        self.sudo(format!("useradd --system --no-create-home {}", quote(user)), None)?;
        Ok(())
    }

    pub fn group_exists(&self, group: &str) -> Result<bool, RemoteError> {
        self.probe(format!("getent group {}", quote(group)))
    }

    pub fn create_group(&self, group: &str) -> Result<(), RemoteError> {
        self.sudo(format!("groupadd --system {}", quote(group)), None)?;
        Ok(())
    }

    pub fn add_user_to_group(&self, user: &str, group: &str) -> Result<(), RemoteError> {
        self.sudo(format!("usermod -a -G {} {}", quote(group), quote(user)), None)?;
        Ok(())
    }

    pub fn change_owner(&self, path: &str, user: &str) -> Result<(), RemoteError> {
        self.sudo(format!("chown -R {} {}", quote(user), quote(path)), None)?;
        Ok(())
    }

    pub fn change_group(&self, path: &str, group: &str) -> Result<(), RemoteError> {
        self.sudo(format!("chgrp -R {} {}", quote(group), quote(path)), None)?;
        Ok(())
    }

    pub fn package_installed(&self, package: &str) -> Result<bool, RemoteError> {
        self.probe(format!("dpkg -s {}", quote(package)))
    }

    pub fn restart_service(&self, service: &str) -> Result<(), RemoteError> {
        self.sudo(format!("systemctl restart {}", quote(service)), None)?;
        Ok(())
    }

    pub fn create_venv(&self, python: &str, path: &str) -> Result<(), RemoteError> {
        self.sudo(format!("{} -m venv {}", quote(python), quote(path)), None)?;
        Ok(())
    }

    pub fn pip_install(&self, venv: &str, requirements: &str) -> Result<(), RemoteError> {
        let pip = format!("{}/bin/pip", venv.trim_end_matches('/'));
        self.sudo(
            format!("{} install -r {}", quote(&pip), quote(requirements)),
            None,
        )?;
        Ok(())
    }
}
