//! Subcommands and the settings they share.

pub mod locate;
pub mod prepare;
pub mod run;

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use tafsync_client::TeddyCloudClient;
use tafsync_core::DescriptorStore;
use tafsync_sync::{RepoConfig, RepoSynchronizer};

/// Where the descriptor working copy lives.
#[derive(Args, Debug, Clone)]
pub struct WorkingCopyArgs {
    /// Local path of the tonies-json working copy.
    #[arg(long, env = "TONIES_JSON_REPO_PATH")]
    pub repo_path: PathBuf,

    /// Subdirectory of the working copy searched for descriptors.
    #[arg(long, env = "TONIES_JSON_DESCRIPTOR_DIR", default_value = ".")]
    pub descriptor_dir: PathBuf,
}

impl WorkingCopyArgs {
    pub fn store(&self) -> DescriptorStore {
        DescriptorStore::new(self.repo_path.join(&self.descriptor_dir))
    }
}

/// Remote repository, branch, and git identity.
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    #[command(flatten)]
    pub working_copy: WorkingCopyArgs,

    /// Clone URL of the tonies-json repository.
    #[arg(long, env = "TONIES_JSON_REPO_URL")]
    pub repo_url: String,

    /// Branch that collects descriptor updates.
    #[arg(long, env = "TONIES_JSON_UPDATE_BRANCH", default_value = "teddycloud-sync")]
    pub update_branch: String,

    /// Commit author name; also the user for HTTPS pushes.
    #[arg(long, env = "GIT_USER_NAME")]
    pub git_user_name: Option<String>,

    #[arg(long, env = "GIT_USER_EMAIL")]
    pub git_user_email: Option<String>,

    /// Access token for HTTPS pushes.
    #[arg(long, env = "GIT_TOKEN", hide_env_values = true)]
    pub git_token: Option<String>,
}

impl RepoArgs {
    pub fn synchronizer(&self) -> RepoSynchronizer {
        RepoSynchronizer::new(RepoConfig {
            url: self.repo_url.clone(),
            path: self.working_copy.repo_path.clone(),
            update_branch: self.update_branch.clone(),
            user_name: self.git_user_name.clone(),
            user_email: self.git_user_email.clone(),
            token: self.git_token.clone(),
        })
    }
}

/// TeddyCloud connection.
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// Base URL of the TeddyCloud server, e.g. `http://teddycloud.local`.
    #[arg(long, env = "TEDDYCLOUD_API")]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "TEDDYCLOUD_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

impl ApiArgs {
    pub fn client(&self) -> TeddyCloudClient {
        TeddyCloudClient::new(self.api_url.as_str(), Duration::from_secs(self.timeout_secs))
    }
}
