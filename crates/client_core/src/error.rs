use std::time::Duration;

use thiserror::Error;

use crate::schema::SchemaViolation;

pub const EMPTY_TAG_MESSAGE: &str = "Please enter a player tag";

/// Every way a call to the advice service can fail, normalized so callers
/// never see raw `reqwest` errors or half-parsed bodies.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("failed to reach advice service: {0}")]
    Network(String),
    #[error("advice service did not respond within {0:?}")]
    Timeout(Duration),
    #[error("invalid response from advice service: {0}")]
    Decode(String),
    #[error("invalid player snapshot: {0}")]
    Schema(#[from] SchemaViolation),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// What the controller surfaces in its single error slot.
#[derive(Debug, Clone, Error)]
pub enum ControllerError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ControllerError {
    pub fn empty_tag() -> Self {
        ControllerError::Validation(EMPTY_TAG_MESSAGE.to_string())
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ControllerError::Validation(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid api url '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
    #[error("invalid request timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error("invalid settings file '{path}': {reason}")]
    SettingsFile { path: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}
