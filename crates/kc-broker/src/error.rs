//! Broker error types.
//!
//! Mapper hooks never fail towards the login flow; these errors surface from
//! configuration validation and from the helpers the hooks are built on.

use kc_protocol_saml::SamlError;
use thiserror::Error;

/// Errors that can occur while running identity provider mappers.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Mapper configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Expected data is missing from the brokered identity context.
    #[error("Missing context data: {0}")]
    MissingContextData(String),

    /// SAML object model error.
    #[error("SAML error: {0}")]
    Saml(#[from] SamlError),
}

impl BrokerError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a missing context data error.
    #[must_use]
    pub fn missing_context_data(key: impl Into<String>) -> Self {
        Self::MissingContextData(key.into())
    }
}

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;
