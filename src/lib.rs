pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod export;
pub mod logging;
pub mod payload;
pub mod response;
pub mod runner;

pub use client::{ClientSettings, TriggerClient};
pub use config::TriggerConfig;
pub use env::{EnvLookup, ProcessEnv};
pub use error::{Result, TriggerError};
pub use export::{EnvmanExporter, Exporter};
pub use payload::TriggerRequest;
pub use response::TriggerResponse;
