//! Shared fixtures: real git repositories in temp dirs.
//!
//! A "remote" is a bare repository seeded with one commit on `master`. The
//! synchronizer clones it over a plain filesystem path, so no network is
//! involved.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tafsync_sync::RepoConfig;
use tempfile::TempDir;

pub const BRANCH: &str = "teddycloud-sync";

pub const DESCRIPTOR: &str = "\
article: tt-10000001
data:
- series: Die Maus
  ids:
  - audio-id: 1600000000
    hash: 0123456789abcdef
    size: 555
    tracks: 3
    confidence: 2
";

/// Run git in `dir` with a throwaway identity; panics on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=Fixture",
            "-c",
            "user.email=fixture@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

/// Number of commits reachable from `HEAD`.
pub fn commit_count(dir: &Path) -> usize {
    git(dir, &["rev-list", "--count", "HEAD"])
        .parse()
        .expect("rev-list count")
}

pub fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write");
}

/// A bare remote plus scratch space for working copies.
pub struct Fixture {
    pub tmp: TempDir,
    pub remote: PathBuf,
}

impl Fixture {
    /// Bare remote whose `master` holds `files`.
    pub fn new(files: &[(&str, &str)]) -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let seed = tmp.path().join("seed");
        fs::create_dir_all(&seed).expect("mkdir seed");
        git(&seed, &["init", "--quiet"]);
        git(&seed, &["symbolic-ref", "HEAD", "refs/heads/master"]);
        for (rel, contents) in files {
            write(&seed, rel, contents);
        }
        git(&seed, &["add", "--all"]);
        git(&seed, &["commit", "--quiet", "-m", "seed"]);

        let remote = tmp.path().join("remote.git");
        git(
            tmp.path(),
            &["clone", "--quiet", "--bare", seed.to_str().expect("utf8"), "remote.git"],
        );
        Self { tmp, remote }
    }

    pub fn with_descriptor() -> Self {
        Self::new(&[
            ("yaml/10000001.yaml", DESCRIPTOR),
            ("yaml/10000002.yaml", DESCRIPTOR),
            ("README.md", "# tonies\n"),
        ])
    }

    pub fn url(&self) -> String {
        self.remote.to_string_lossy().into_owned()
    }

    pub fn workdir(&self) -> PathBuf {
        self.tmp.path().join("work").join("tonies-json")
    }

    /// Config with identity and token set.
    pub fn config(&self) -> RepoConfig {
        RepoConfig {
            url: self.url(),
            path: self.workdir(),
            update_branch: BRANCH.into(),
            user_name: Some("tafsync-bot".into()),
            user_email: Some("bot@example.com".into()),
            token: Some("s3cr3t-token".into()),
        }
    }

    /// Object id of `branch` on the remote, if it exists.
    pub fn remote_head(&self, branch: &str) -> Option<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.remote)
            .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{branch}")])
            .output()
            .expect("spawn git");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }

    /// Commit subjects on a remote branch, newest first.
    pub fn remote_subjects(&self, branch: &str) -> Vec<String> {
        git(&self.remote, &["log", "--format=%s", branch])
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// File contents on a remote branch.
    pub fn remote_file(&self, branch: &str, rel: &str) -> String {
        git(&self.remote, &["show", &format!("{branch}:{rel}")])
    }

    /// Push a commit to `branch` on the remote from an independent clone.
    pub fn push_from_elsewhere(&self, branch: &str, rel: &str, contents: &str) {
        let other = self.tmp.path().join(format!("other-{}", rand_suffix()));
        git(
            self.tmp.path(),
            &["clone", "--quiet", &self.url(), other.to_str().expect("utf8")],
        );
        let exists = Command::new("git")
            .arg("-C")
            .arg(&other)
            .args(["rev-parse", "--verify", "--quiet", &format!("origin/{branch}")])
            .output()
            .expect("spawn git")
            .status
            .success();
        if exists {
            git(&other, &["checkout", "--quiet", branch]);
        } else {
            git(&other, &["checkout", "--quiet", "-b", branch]);
        }
        write(&other, rel, contents);
        git(&other, &["add", "--all"]);
        git(&other, &["commit", "--quiet", "-m", "concurrent edit"]);
        git(&other, &["push", "--quiet", "origin", &format!("{branch}:{branch}")]);
    }
}

fn rand_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos()
}
