//! Git command wrappers using [`std::process::Command`].
//!
//! Every method shells out to the system `git` binary inside one working
//! copy. Terminal prompts are disabled so a missing credential fails fast
//! instead of blocking. Secrets registered with [`Git::redacting`] are
//! replaced by `***` in every error message, including the echoed command
//! line.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::error::GitError;

const REDACTED: &str = "***";

/// Identity used for commits, passed per invocation and never written to
/// repository config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Handle on a single working copy.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
    secrets: Vec<String>,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            secrets: Vec::new(),
        }
    }

    /// Register a value that must never appear in error messages.
    pub fn redacting(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if !secret.is_empty() {
            self.secrets.push(secret);
        }
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// `true` when the working copy has a `.git` entry.
    pub fn exists(&self) -> bool {
        self.workdir.join(".git").exists()
    }

    // -----------------------------------------------------------------------
    // Clone / fetch / reset
    // -----------------------------------------------------------------------

    /// `git clone <url> <workdir>`.
    pub fn clone_repo(&self, url: &str) -> Result<(), GitError> {
        if let Some(parent) = self.workdir.parent() {
            std::fs::create_dir_all(parent).map_err(|source| GitError::Spawn {
                command: format!("clone (creating {})", parent.display()),
                source,
            })?;
        }
        let dest = self.workdir.to_string_lossy().into_owned();
        self.exec(None, &["clone", "--quiet", url, &dest])?;
        Ok(())
    }

    /// `git fetch --prune <remote>`.
    pub fn fetch(&self, remote: &str) -> Result<(), GitError> {
        self.run(&["fetch", "--prune", "--quiet", remote])?;
        Ok(())
    }

    /// `git reset --hard <target>`.
    pub fn reset_hard(&self, target: &str) -> Result<(), GitError> {
        self.run(&["reset", "--hard", "--quiet", target])?;
        Ok(())
    }

    /// `git clean -fd`: drop untracked files and directories.
    pub fn clean(&self) -> Result<(), GitError> {
        self.run(&["clean", "-f", "-d", "--quiet"])?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Branches and refs
    // -----------------------------------------------------------------------

    /// Short name of the checked-out branch (`HEAD` when detached).
    pub fn current_branch(&self) -> Result<String, GitError> {
        Ok(self
            .run(&["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_owned())
    }

    /// `git checkout --force <branch>`, discarding local modifications.
    pub fn checkout(&self, branch: &str) -> Result<(), GitError> {
        self.run(&["checkout", "--quiet", "--force", branch])?;
        Ok(())
    }

    /// `git checkout -B <branch> [<start>]`: create or overwrite `branch`.
    pub fn checkout_reset(&self, branch: &str, start: Option<&str>) -> Result<(), GitError> {
        let mut args = vec!["checkout", "--quiet", "-B", branch];
        if let Some(start) = start {
            args.push(start);
        }
        self.run(&args)?;
        Ok(())
    }

    /// Object id `reference` points at, or `None` if it does not exist.
    pub fn resolve(&self, reference: &str) -> Result<Option<String>, GitError> {
        let spec = format!("{reference}^{{commit}}");
        let args = ["rev-parse", "--verify", "--quiet", spec.as_str()];
        let output = self.output(Some(self.workdir.as_path()), &args)?;
        if output.status.success() {
            let oid = String::from_utf8_lossy(&output.stdout).trim().to_owned();
            return Ok(Some(oid));
        }
        match output.status.code() {
            Some(1) => Ok(None),
            _ => Err(self.failure(&args, &output)),
        }
    }

    // -----------------------------------------------------------------------
    // Status, staging, commit
    // -----------------------------------------------------------------------

    /// Paths (relative to the working copy) that are modified, staged, or untracked.
    pub fn changed_paths(&self) -> Result<Vec<String>, GitError> {
        let out = self.run(&["status", "--porcelain=v1", "-z", "--untracked-files=all"])?;
        Ok(parse_porcelain_z(&out))
    }

    /// `git reset -q -- <path>`: unstage anything already staged for `path`.
    pub fn unstage(&self, path: &str) -> Result<(), GitError> {
        self.run(&["reset", "--quiet", "--", path])?;
        Ok(())
    }

    /// `git add -- <path>`.
    pub fn add(&self, path: &str) -> Result<(), GitError> {
        self.run(&["add", "--", path])?;
        Ok(())
    }

    /// `true` when the index differs from `HEAD` for `path`.
    pub fn has_staged_changes(&self, path: &str) -> Result<bool, GitError> {
        let args = ["diff", "--cached", "--quiet", "--", path];
        let output = self.output(Some(self.workdir.as_path()), &args)?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(self.failure(&args, &output)),
        }
    }

    /// Commit only `path` with `message` as `identity`; anything else in the
    /// index stays staged.
    pub fn commit_path(&self, path: &str, message: &str, identity: &Identity) -> Result<(), GitError> {
        let name = format!("user.name={}", identity.name);
        let email = format!("user.email={}", identity.email);
        self.run(&[
            "-c", &name, "-c", &email, "commit", "--quiet", "-m", message, "--", path,
        ])?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Remotes and push
    // -----------------------------------------------------------------------

    /// `git remote get-url <remote>`.
    pub fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        Ok(self.run(&["remote", "get-url", remote])?.trim().to_owned())
    }

    /// `git remote set-url <remote> <url>`.
    pub fn set_remote_url(&self, remote: &str, url: &str) -> Result<(), GitError> {
        self.run(&["remote", "set-url", remote, url])?;
        Ok(())
    }

    /// Push `branch:branch` to `remote`, refusing to overwrite unless the
    /// remote branch still points at `expected` (`None`: must not exist yet).
    pub fn push_with_lease(
        &self,
        remote: &str,
        branch: &str,
        expected: Option<&str>,
    ) -> Result<(), GitError> {
        let lease = format!("--force-with-lease={branch}:{}", expected.unwrap_or(""));
        let refspec = format!("{branch}:{branch}");
        self.run(&["push", "--quiet", &lease, remote, &refspec])?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    /// Run `git -C <workdir> <args>` and return stdout; non-zero exit is an error.
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        self.exec(Some(self.workdir.as_path()), args)
    }

    fn exec(&self, dir: Option<&Path>, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(dir, args)?;
        if !output.status.success() {
            return Err(self.failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn output(&self, dir: Option<&Path>, args: &[&str]) -> Result<Output, GitError> {
        let mut cmd = Command::new("git");
        if let Some(dir) = dir {
            cmd.arg("-C").arg(dir);
        }
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(command = %self.describe(args), "spawning git");
        cmd.output().map_err(|source| GitError::Spawn {
            command: self.describe(args),
            source,
        })
    }

    fn failure(&self, args: &[&str], output: &Output) -> GitError {
        GitError::Failed {
            command: self.describe(args),
            status: output.status.to_string(),
            stderr: self.redact(String::from_utf8_lossy(&output.stderr).trim()),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        self.redact(&args.join(" "))
    }

    fn redact(&self, text: &str) -> String {
        self.secrets
            .iter()
            .fold(text.to_owned(), |acc, secret| acc.replace(secret.as_str(), REDACTED))
    }
}

/// Parse `git status --porcelain=v1 -z` output into paths.
///
/// Records are `XY <path>\0`; renames and copies carry the original path as
/// an extra NUL-terminated field, which is skipped.
pub fn parse_porcelain_z(out: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut fields = out.split('\0');
    while let Some(record) = fields.next() {
        if record.len() < 4 {
            continue;
        }
        let (status, path) = record.split_at(3);
        paths.push(path.to_owned());
        if status.starts_with('R') || status.starts_with('C') {
            fields.next();
        }
    }
    paths
}
