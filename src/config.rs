//! Step inputs and their validation

use tracing::{info, warn};

use crate::env::{self, EnvLookup};
use crate::error::{Result, TriggerError};

const HIDDEN_TOKEN: &str = "*****";

/// Inputs of the trigger step, read once at startup.
/// Unset inputs are empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerConfig {
    pub app_slug: String,
    pub api_token: String,
    pub branch: String,
    pub tag: String,
    pub commit_hash: String,
    pub commit_message: String,
    pub workflow_id: String,
    pub branch_dest: String,
    pub pull_request_id: String,
    pub pull_request_repository_url: String,
    pub pull_request_merge_branch: String,
    pub pull_request_head_branch: String,
    pub exported_environment_variable_names: String,
    pub branch_repo_owner: String,
    pub branch_dest_repo_owner: String,
}

impl TriggerConfig {
    /// Load the step inputs from `lookup`, keyed by their input names
    pub fn from_lookup<L: EnvLookup + ?Sized>(lookup: &L) -> Self {
        Self {
            app_slug: lookup.get_or_empty("app_slug"),
            api_token: lookup.get_or_empty("api_token"),
            branch: lookup.get_or_empty("branch"),
            tag: lookup.get_or_empty("tag"),
            commit_hash: lookup.get_or_empty("commit_hash"),
            commit_message: lookup.get_or_empty("commit_message"),
            workflow_id: lookup.get_or_empty("workflow_id"),
            branch_dest: lookup.get_or_empty("branch_dest"),
            pull_request_id: lookup.get_or_empty("pull_request_id"),
            pull_request_repository_url: lookup.get_or_empty("pull_request_repository_url"),
            pull_request_merge_branch: lookup.get_or_empty("pull_request_merge_branch"),
            pull_request_head_branch: lookup.get_or_empty("pull_request_head_branch"),
            exported_environment_variable_names: lookup
                .get_or_empty("exported_environment_variable_names"),
            branch_repo_owner: lookup.get_or_empty("branch_repo_owner"),
            branch_dest_repo_owner: lookup.get_or_empty("branch_dest_repo_owner"),
        }
    }

    /// Names of the variables forwarded to the triggered build
    pub fn exported_names(&self) -> Vec<String> {
        env::split(&self.exported_environment_variable_names)
    }

    /// Checks the inputs before any request is made. The first problem found is returned.
    pub fn validate(&self) -> Result<()> {
        if self.app_slug.is_empty() {
            return Err(TriggerError::InvalidInput(
                "missing app identifier".to_string(),
            ));
        }

        if self.api_token.is_empty() {
            return Err(TriggerError::InvalidInput("missing auth token".to_string()));
        }

        for name in self.exported_names() {
            if name.is_empty() {
                return Err(TriggerError::InvalidInput(
                    "empty exported variable name".to_string(),
                ));
            }
            if name.contains('=') {
                warn!("Invalid exported variable name: {}", name);
                return Err(TriggerError::InvalidInput(
                    "exported variable name must not contain '='".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Log the inputs for the build log. The api token is never printed.
    pub fn dump(&self) {
        info!("Configs:");
        info!(" - AppSlug: {}", self.app_slug);
        info!(" - ApiToken (hidden): {}", HIDDEN_TOKEN);
        info!(" - Branch: {}", self.branch);
        info!(" - Tag: {}", self.tag);
        info!(" - CommitHash: {}", self.commit_hash);
        info!(" - CommitMessage: {}", self.commit_message);
        info!(" - WorkflowID: {}", self.workflow_id);
        info!(" - BranchDest: {}", self.branch_dest);
        info!(" - PullRequestID: {}", self.pull_request_id);
        info!(
            " - PullRequestRepositoryURL: {}",
            self.pull_request_repository_url
        );
        info!(
            " - PullRequestMergeBranch: {}",
            self.pull_request_merge_branch
        );
        info!(" - PullRequestHeadBranch: {}", self.pull_request_head_branch);
        info!(
            " - ExportedVariableNames: {}",
            self.exported_environment_variable_names
        );
        info!(" - BranchRepoOwner: {}", self.branch_repo_owner);
        info!(" - BranchDestRepoOwner: {}", self.branch_dest_repo_owner);
    }
}
