use bitrise_trigger::client::{ClientSettings, TriggerClient};
use bitrise_trigger::config::TriggerConfig;
use bitrise_trigger::env::ProcessEnv;
use bitrise_trigger::error::TriggerError;
use bitrise_trigger::export::EnvmanExporter;
use bitrise_trigger::logging::setup_logging;
use bitrise_trigger::runner;
use tracing::{error, info};

async fn trigger() -> Result<(), TriggerError> {
    let config = TriggerConfig::from_lookup(&ProcessEnv);
    config.dump();
    config.validate()?;

    let settings = ClientSettings::from_lookup(&ProcessEnv)?;
    let client = TriggerClient::new(&settings)?;
    let exporter = EnvmanExporter::new();

    runner::run(&config, &ProcessEnv, &client, &exporter).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();
    setup_logging();

    if let Err(e) = trigger().await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
    info!("Build triggered and outputs exported");
}
