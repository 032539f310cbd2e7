//! Brokered identity context.
//!
//! Carries what an identity provider told us about a user through the
//! first-login and post-login flows.

use std::collections::HashMap;

use kc_protocol_saml::Assertion;
use serde::{Deserialize, Serialize};

use crate::error::{BrokerError, BrokerResult};

/// Context data key under which the SAML endpoint stores the assertion.
pub const SAML_ASSERTION: &str = "SAML_ASSERTION";

/// A value stored in the context data map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextData {
    /// A validated SAML assertion.
    SamlAssertion(Box<Assertion>),
    /// Free-form text.
    Text(String),
}

/// Identity information received from a brokered identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokeredIdentityContext {
    /// User ID at the identity provider.
    pub id: String,

    /// Username at the identity provider.
    pub username: Option<String>,

    /// Alias of the identity provider.
    pub identity_provider_alias: String,

    context_data: HashMap<String, ContextData>,

    user_attributes: HashMap<String, Vec<String>>,
}

impl BrokeredIdentityContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new(id: impl Into<String>, identity_provider_alias: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            identity_provider_alias: identity_provider_alias.into(),
            context_data: HashMap::new(),
            user_attributes: HashMap::new(),
        }
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Stores the SAML assertion under [`SAML_ASSERTION`].
    #[must_use]
    pub fn with_saml_assertion(mut self, assertion: Assertion) -> Self {
        self.set_context_data(SAML_ASSERTION, ContextData::SamlAssertion(Box::new(assertion)));
        self
    }

    /// Stores a context data entry.
    pub fn set_context_data(&mut self, key: impl Into<String>, value: ContextData) {
        self.context_data.insert(key.into(), value);
    }

    /// Gets a context data entry.
    #[must_use]
    pub fn context_data(&self, key: &str) -> Option<&ContextData> {
        self.context_data.get(key)
    }

    /// Returns the SAML assertion stored under [`SAML_ASSERTION`].
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::MissingContextData`] if no entry exists under
    /// that key or it holds something other than an assertion.
    pub fn saml_assertion(&self) -> BrokerResult<&Assertion> {
        match self.context_data(SAML_ASSERTION) {
            Some(ContextData::SamlAssertion(assertion)) => Ok(assertion),
            _ => Err(BrokerError::missing_context_data(SAML_ASSERTION)),
        }
    }

    /// Sets a user attribute to apply when the local user is created.
    pub fn set_user_attribute(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.user_attributes.insert(name.into(), values);
    }

    /// Gets a pending user attribute.
    #[must_use]
    pub fn user_attribute(&self, name: &str) -> Option<&[String]> {
        self.user_attributes.get(name).map(Vec::as_slice)
    }

    /// Returns all pending user attributes.
    #[must_use]
    pub const fn user_attributes(&self) -> &HashMap<String, Vec<String>> {
        &self.user_attributes
    }
}
