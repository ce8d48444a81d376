//! Error types for the wizard engine.

use crate::wizard::local::LocalError;
use crate::wizard::steps::StepId;

/// Top-level error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Generic remote rejections — never mapped to a field, surfaced as a
/// single notification.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Onboarding not found: {onboarding_id}")]
    NotFound { onboarding_id: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Transport failure: {message}")]
    Transport { message: String },
}

/// Errors raised while submitting a step.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Step {step} is not part of the current flow")]
    NotInFlow { step: StepId },

    #[error("Step {step} already has a submission in flight")]
    AlreadyInFlight { step: StepId },

    #[error("Local validation failed for {} field(s)", errors.len())]
    LocalValidation { errors: Vec<LocalError> },
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
