/// Exit code for missing or malformed step inputs
pub const EXIT_INVALID_INPUT: i32 = 1;
/// Exit code for failures while building the payload or the request
pub const EXIT_BUILD_FAILED: i32 = 2;
/// Exit code for transport failures and unreadable responses
pub const EXIT_NETWORK: i32 = 3;
/// Exit code for a trigger the platform refused
pub const EXIT_REJECTED: i32 = 4;
/// Exit code for failures while exporting outputs
pub const EXIT_EXPORT_FAILED: i32 = 5;

/// Custom error type for bitrise_trigger operations
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("Issue with input: {0}")]
    InvalidInput(String),

    #[error("Could not create request body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not create request: {0}")]
    RequestBuild(String),

    #[error("Could not send request: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Build not triggered, status: {status}")]
    Rejected { status: String },

    #[error("Could not export {key}: {message}")]
    Export { key: String, message: String },
}

impl TriggerError {
    /// Process exit code for this failure class
    pub fn exit_code(&self) -> i32 {
        match self {
            TriggerError::InvalidInput(_) => EXIT_INVALID_INPUT,
            TriggerError::Serialization(_) | TriggerError::RequestBuild(_) => EXIT_BUILD_FAILED,
            TriggerError::Network(_) | TriggerError::Decode(_) => EXIT_NETWORK,
            TriggerError::Rejected { .. } => EXIT_REJECTED,
            TriggerError::Export { .. } => EXIT_EXPORT_FAILED,
        }
    }
}

/// Helper type for Results that use TriggerError
pub type Result<T> = std::result::Result<T, TriggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        assert_eq!(TriggerError::InvalidInput("x".into()).exit_code(), 1);
        assert_eq!(TriggerError::Serialization(serde_err).exit_code(), 2);
        assert_eq!(TriggerError::RequestBuild("x".into()).exit_code(), 2);
        assert_eq!(TriggerError::Decode("x".into()).exit_code(), 3);
        assert_eq!(
            TriggerError::Rejected {
                status: "error".into()
            }
            .exit_code(),
            4
        );
        assert_eq!(
            TriggerError::Export {
                key: "K".into(),
                message: "x".into()
            }
            .exit_code(),
            5
        );
    }

    #[test]
    fn test_error_display() {
        let err = TriggerError::Rejected {
            status: "error".to_string(),
        };
        assert_eq!(err.to_string(), "Build not triggered, status: error");

        let err = TriggerError::InvalidInput("missing auth token".to_string());
        assert_eq!(err.to_string(), "Issue with input: missing auth token");
    }
}
