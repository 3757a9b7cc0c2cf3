//! In-memory remote host.
//!
//! `FakeHost` interprets the shell commands the pipeline sends and keeps a
//! tiny model of the remote machine: files, directories, symlinks, accounts
//! and installed packages. Every call is logged so tests can assert on order.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use hoist::domain::ports::{
    CommandOutput, RemoteHost, SecretError, SecretStore, SourceControl, TransportError,
};
use hoist::error::BuildInfoError;

#[derive(Default)]
pub struct FakeHost {
    pub files: RefCell<BTreeMap<String, String>>,
    pub dirs: RefCell<BTreeSet<String>>,
    pub links: RefCell<BTreeMap<String, String>>,
    pub users: RefCell<BTreeSet<String>>,
    pub groups: RefCell<BTreeSet<String>>,
    pub packages: BTreeSet<String>,
    pub calls: RefCell<Vec<String>>,
    fail_on: Vec<String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with every fixture dependency installed
    pub fn provisioned() -> Self {
        Self::new().with_packages(&["redis-server", "nginx"])
    }

    pub fn with_packages(mut self, packages: &[&str]) -> Self {
        self.packages = packages.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Make every mutating command containing `needle` exit with status 1
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// Pretend `version` is live under id `id`
    pub fn with_deployed(self, id: &str, version: &str) -> Self {
        self.write("/srv/pubpublica/.deployed", id);
        self.write(
            "/srv/pubpublica/production/__version__.py",
            &format!("{version}\n"),
        );
        self
    }

    pub fn write(&self, path: &str, contents: &str) {
        self.files
            .borrow_mut()
            .insert(path.to_string(), contents.to_string());
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn link(&self, path: &str) -> Option<String> {
        self.links.borrow().get(path).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Index of the first logged call containing `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.contains(needle))
    }

    /// Calls that could have changed the host
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !c.starts_with("query "))
            .cloned()
            .collect()
    }

    fn log(&self, entry: String) {
        self.calls.borrow_mut().push(entry);
    }

    fn answer_query(&self, words: &[String]) -> CommandOutput {
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let found = |yes: bool| {
            if yes {
                CommandOutput::success("")
            } else {
                CommandOutput::failure(1, "")
            }
        };

        match words.as_slice() {
            ["cat", path] => match self.file(path) {
                Some(contents) => CommandOutput::success(contents),
                None => CommandOutput::failure(1, format!("cat: {path}: No such file or directory")),
            },
            ["id", "-u", user] => found(self.users.borrow().contains(*user)),
            ["getent", "group", group] => found(self.groups.borrow().contains(*group)),
            ["dpkg", "-s", package] => found(self.packages.contains(*package)),
            _ => CommandOutput::failure(127, "unknown query"),
        }
    }

    fn apply(&self, words: &[String], input: Option<&str>) -> CommandOutput {
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        match words.as_slice() {
            ["mkdir", "-p", path] => {
                self.dirs.borrow_mut().insert(path.to_string());
            }
            ["mv", "-f", from, to] => {
                let moved = self.files.borrow_mut().remove(*from);
                match moved {
                    Some(contents) => self.write(to, &contents),
                    None => {
                        return CommandOutput::failure(
                            1,
                            format!("mv: cannot stat '{from}': No such file or directory"),
                        )
                    }
                }
            }
            ["rm", "-f", path] => {
                self.files.borrow_mut().remove(*path);
            }
            ["tee", path, ">", "/dev/null"] => self.write(path, input.unwrap_or_default()),
            ["ln", "-sfn", target, link] => {
                self.links
                    .borrow_mut()
                    .insert(link.to_string(), target.to_string());
            }
            ["tar", "-C", _, "-xzf", archive] => {
                if !self.files.borrow().contains_key(*archive) {
                    return CommandOutput::failure(
                        2,
                        format!("tar: {archive}: Cannot open: No such file or directory"),
                    );
                }
            }
            ["useradd", .., user] => {
                self.users.borrow_mut().insert(user.to_string());
            }
            ["groupadd", .., group] => {
                self.groups.borrow_mut().insert(group.to_string());
            }
            _ => {}
        }
        CommandOutput::success("")
    }

    fn should_fail(&self, command: &str) -> bool {
        self.fail_on.iter().any(|needle| command.contains(needle.as_str()))
    }
}

impl RemoteHost for FakeHost {
    fn name(&self) -> &str {
        "fake"
    }

    fn query(&self, command: &str) -> Result<CommandOutput, TransportError> {
        self.log(format!("query {command}"));
        Ok(self.answer_query(&shell_words(command)))
    }

    fn run(&self, command: &str) -> Result<CommandOutput, TransportError> {
        self.log(format!("run {command}"));
        if self.should_fail(command) {
            return Ok(CommandOutput::failure(1, "simulated failure"));
        }
        Ok(self.apply(&shell_words(command), None))
    }

    fn sudo(&self, command: &str, input: Option<&str>) -> Result<CommandOutput, TransportError> {
        self.log(format!("sudo {command}"));
        if self.should_fail(command) {
            return Ok(CommandOutput::failure(1, "simulated failure"));
        }
        Ok(self.apply(&shell_words(command), input))
    }

    fn put(&self, local: &Path, remote: &str) -> Result<(), TransportError> {
        self.log(format!("put {remote}"));
        let size = std::fs::metadata(local)?.len();
        self.write(remote, &format!("<archive {size} bytes>"));
        Ok(())
    }
}

/// Split a command into words, honoring single quotes and `'\''`
pub fn shell_words(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '\\' => {
                in_word = true;
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Secret store backed by a map
#[derive(Default)]
pub struct MapSecrets(pub BTreeMap<String, String>);

impl MapSecrets {
    pub fn fixture() -> Self {
        Self(BTreeMap::from([
            ("pubpublica/redis".to_string(), "hunter2".to_string()),
            ("pubpublica/flask".to_string(), "s3cr3t".to_string()),
        ]))
    }
}

impl SecretStore for MapSecrets {
    fn get(&self, path: &str) -> Result<String, SecretError> {
        self.0.get(path).cloned().ok_or_else(|| SecretError::NotFound {
            path: path.to_string(),
        })
    }
}

/// Source control answering with fixed values
pub struct FixedScm {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

impl FixedScm {
    pub fn clean() -> Self {
        Self {
            commit: Some("a1b2c3d4e5f60718293a4b5c6d7e8f9012345678".to_string()),
            dirty: Some(false),
        }
    }

    pub fn dirty() -> Self {
        Self {
            dirty: Some(true),
            ..Self::clean()
        }
    }
}

impl SourceControl for FixedScm {
    fn latest_commit(&self, root: &Path) -> Result<String, BuildInfoError> {
        self.commit
            .clone()
            .ok_or_else(|| BuildInfoError::NotARepository(root.to_path_buf()))
    }

    fn is_dirty(&self, _root: &Path) -> Result<Option<bool>, BuildInfoError> {
        Ok(self.dirty)
    }
}

