//! HTTP client for the Build Trigger API

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use tracing::{debug, info};

use crate::env::EnvLookup;
use crate::error::{Result, TriggerError};

pub const DEFAULT_API_URL: &str = "https://app.bitrise.io";
pub const API_URL_VAR: &str = "BITRISE_TRIGGER_API_URL";
pub const TIMEOUT_VAR: &str = "BITRISE_TRIGGER_TIMEOUT_SECS";

/// Transport settings. No timeout unless one is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientSettings {
    /// Read overrides from `lookup`. Empty values are treated as unset.
    pub fn from_lookup<L: EnvLookup + ?Sized>(lookup: &L) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(url) = lookup.get(API_URL_VAR).filter(|v| !v.is_empty()) {
            settings.base_url = url;
        }

        if let Some(raw) = lookup.get(TIMEOUT_VAR).filter(|v| !v.is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|e| {
                TriggerError::InvalidInput(format!("invalid {} '{}': {}", TIMEOUT_VAR, raw, e))
            })?;
            settings.timeout = Some(Duration::from_secs(secs));
        }

        Ok(settings)
    }
}

/// Status line and fully read body of a trigger reply
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

pub struct TriggerClient {
    client: reqwest::Client,
    base_url: String,
}

impl TriggerClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TriggerError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `{base_url}/app/{app_slug}/build/start.json`
    pub fn endpoint(&self, app_slug: &str) -> Result<Url> {
        let url = format!("{}/app/{}/build/start.json", self.base_url, app_slug);
        Url::parse(&url)
            .map_err(|e| TriggerError::RequestBuild(format!("invalid URL '{}': {}", url, e)))
    }

    /// POSTs `body` to the trigger endpoint of `app_slug` and reads the whole reply.
    /// Any HTTP status is returned as is; only transport failures are errors.
    pub async fn send(&self, app_slug: &str, body: Vec<u8>) -> Result<RawResponse> {
        let request = self
            .client
            .post(self.endpoint(app_slug)?)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(|e| TriggerError::RequestBuild(e.to_string()))?;

        debug!("POST {}", request.url().path());
        let response = self.client.execute(request).await?;

        let status = response.status();
        info!("Build Trigger API HTTP response status: {}", status);

        // Consumes the response, so the connection is released on both paths.
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TriggerClient {
        TriggerClient::new(&ClientSettings {
            base_url: server.uri(),
            timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn test_default_settings() {
        let settings = ClientSettings::default();
        assert_eq!(settings.base_url, "https://app.bitrise.io");
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn test_settings_from_lookup() {
        let env = HashMap::from([
            (API_URL_VAR.to_string(), "http://localhost:9000".to_string()),
            (TIMEOUT_VAR.to_string(), "45".to_string()),
        ]);
        let settings = ClientSettings::from_lookup(&env).unwrap();

        assert_eq!(settings.base_url, "http://localhost:9000");
        assert_eq!(settings.timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_settings_empty_values_are_unset() {
        let env = HashMap::from([
            (API_URL_VAR.to_string(), String::new()),
            (TIMEOUT_VAR.to_string(), String::new()),
        ]);
        assert_eq!(
            ClientSettings::from_lookup(&env).unwrap(),
            ClientSettings::default()
        );
    }

    #[test]
    fn test_settings_invalid_timeout() {
        let env = HashMap::from([(TIMEOUT_VAR.to_string(), "soon".to_string())]);
        let err = ClientSettings::from_lookup(&env).unwrap_err();
        assert!(matches!(err, TriggerError::InvalidInput(_)));
    }

    #[test]
    fn test_endpoint() {
        let client = TriggerClient::new(&ClientSettings::default()).unwrap();
        let url = client.endpoint("abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://app.bitrise.io/app/abc123/build/start.json"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = TriggerClient::new(&ClientSettings {
            base_url: "http://localhost:8080/".to_string(),
            timeout: None,
        })
        .unwrap();
        let url = client.endpoint("x").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/app/x/build/start.json");
    }

    #[test]
    fn test_endpoint_invalid_base_url() {
        let client = TriggerClient::new(&ClientSettings {
            base_url: "not a url".to_string(),
            timeout: None,
        })
        .unwrap();
        let err = client.endpoint("x").unwrap_err();
        assert!(matches!(err, TriggerError::RequestBuild(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_BUILD_FAILED);
    }

    #[tokio::test]
    async fn test_send_posts_json_body() {
        let server = MockServer::start().await;
        let payload = serde_json::json!({"hook_info": {"type": "bitrise"}});

        Mock::given(method("POST"))
            .and(path("/app/my-app/build/start.json"))
            .and(header("content-type", "application/json"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"status":"ok"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send("my-app", serde_json::to_vec(&payload).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_send_returns_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"status":"error"}"#),
            )
            .mount(&server)
            .await;

        let response = client_for(&server).send("a", Vec::new()).await.unwrap();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, br#"{"status":"error"}"#);
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let settings = ClientSettings {
            base_url: format!("http://{}", listener.local_addr().unwrap()),
            timeout: None,
        };
        drop(listener);

        let err = TriggerClient::new(&settings)
            .unwrap()
            .send("a", Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TriggerError::Network(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_NETWORK);
    }

    #[tokio::test]
    async fn test_send_times_out_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = TriggerClient::new(&ClientSettings {
            base_url: server.uri(),
            timeout: Some(Duration::from_millis(100)),
        })
        .unwrap();
        let err = client.send("a", Vec::new()).await.unwrap_err();

        match err {
            TriggerError::Network(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
