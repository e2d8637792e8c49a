//! Request body of the Build Trigger API

use serde::{Deserialize, Serialize};

use crate::config::TriggerConfig;
use crate::env::{self, EnvLookup};
use crate::error::Result;

/// Hook type sent with every trigger
pub const HOOK_TYPE: &str = "bitrise";

/// Body of `POST /app/{slug}/build/start.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerRequest {
    pub hook_info: HookInfo,
    pub build_params: BuildParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookInfo {
    #[serde(rename = "type")]
    pub hook_type: String,
    pub api_token: String,
}

/// Parameters of the build to start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildParams {
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
    pub environments: Vec<EnvironmentVariable>,
    pub branch_repo_owner: String,
    pub branch_dest_repo_owner: String,
}

/// A variable handed to the triggered build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentVariable {
    pub mapped_to: String,
    pub value: String,
    pub is_expand: bool,
}

impl EnvironmentVariable {
    /// New unexpanded variable
    pub fn new(mapped_to: String, value: String) -> Self {
        Self {
            mapped_to,
            value,
            is_expand: false,
        }
    }
}

impl TriggerRequest {
    /// Maps the step inputs onto the request body.
    /// The exported variables are resolved against `lookup` at this point.
    pub fn from_config<L: EnvLookup + ?Sized>(config: &TriggerConfig, lookup: &L) -> Self {
        Self {
            hook_info: HookInfo {
                hook_type: HOOK_TYPE.to_string(),
                api_token: config.api_token.clone(),
            },
            build_params: BuildParams {
                branch: config.branch.clone(),
                tag: config.tag.clone(),
                commit_hash: config.commit_hash.clone(),
                commit_message: config.commit_message.clone(),
                workflow_id: config.workflow_id.clone(),
                branch_dest: config.branch_dest.clone(),
                pull_request_id: config.pull_request_id.clone(),
                pull_request_repository_url: config.pull_request_repository_url.clone(),
                pull_request_merge_branch: config.pull_request_merge_branch.clone(),
                pull_request_head_branch: config.pull_request_head_branch.clone(),
                environments: env::select(lookup, &config.exported_environment_variable_names),
                branch_repo_owner: config.branch_repo_owner.clone(),
                branch_dest_repo_owner: config.branch_dest_repo_owner.clone(),
            },
        }
    }

    /// JSON body ready to send
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
