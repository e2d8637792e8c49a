//! Runs one trigger: validate, send, check the reply and export its outputs

use tracing::info;

use crate::client::TriggerClient;
use crate::config::TriggerConfig;
use crate::env::EnvLookup;
use crate::error::{Result, TriggerError};
use crate::export::Exporter;
use crate::payload::TriggerRequest;
use crate::response::TriggerResponse;

pub const TRIGGERED_BUILD_SLUG: &str = "TRIGGERED_BUILD_SLUG";
pub const TRIGGERED_BUILD_NUMBER: &str = "TRIGGERED_BUILD_NUMBER";
pub const TRIGGERED_BUILD_URL: &str = "TRIGGERED_BUILD_URL";
pub const TRIGGERED_WORKFLOW_ID: &str = "TRIGGERED_WORKFLOW_ID";

/// Triggers the build described by `config` and exports the identifiers of the new build.
///
/// Stops at the first failure. Exports that already succeeded are kept.
pub async fn run<L, E>(
    config: &TriggerConfig,
    lookup: &L,
    client: &TriggerClient,
    exporter: &E,
) -> Result<TriggerResponse>
where
    L: EnvLookup + ?Sized,
    E: Exporter,
{
    config.validate()?;

    let body = TriggerRequest::from_config(config, lookup).to_json()?;
    let raw = client.send(&config.app_slug, body).await?;
    let response = TriggerResponse::decode(&raw.body)?;

    info!("Build Trigger status: {}", response.status);
    ensure_accepted(&response)?;

    info!("Triggered build slug: {}", response.build_slug);
    info!("Triggered build number: {}", response.build_number);
    info!("Triggered build URL: {}", response.build_url);
    info!("Triggered workflow ID: {}", response.triggered_workflow);

    export_outputs(&response, exporter).await?;
    Ok(response)
}

/// Fails with [`TriggerError::Rejected`] unless the platform accepted the trigger
pub fn ensure_accepted(response: &TriggerResponse) -> Result<()> {
    if response.is_ok() {
        return Ok(());
    }
    Err(TriggerError::Rejected {
        status: response.message.clone(),
    })
}

/// Output keys and values, in export order
pub fn outputs(response: &TriggerResponse) -> [(&'static str, String); 4] {
    [
        (TRIGGERED_BUILD_SLUG, response.build_slug.clone()),
        (TRIGGERED_BUILD_NUMBER, response.build_number.to_string()),
        (TRIGGERED_BUILD_URL, response.build_url.clone()),
        (TRIGGERED_WORKFLOW_ID, response.triggered_workflow.clone()),
    ]
}

/// Exports every output in order, stopping at the first failure
pub async fn export_outputs<E: Exporter>(response: &TriggerResponse, exporter: &E) -> Result<()> {
    for (key, value) in outputs(response) {
        exporter.set(key, &value).await?;
    }
    Ok(())
}
