//! Identity provider mappers.
//!
//! Mappers run when a user logs in through a brokered identity provider and
//! transform the data the provider sent into Keycloak's user model.

use std::collections::HashMap;

use kc_model::UserAttributeStore;
use kc_protocol_saml::EntityDescriptor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ProviderConfigProperty;
use crate::context::BrokeredIdentityContext;
use crate::error::BrokerResult;

// ============================================================================
// Mapper Configuration
// ============================================================================

/// How mapped data is kept in sync with the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityProviderSyncMode {
    /// Behave as mappers did before sync modes existed.
    #[default]
    Legacy,

    /// Import data only when the user is first created.
    Import,

    /// Update data on every login.
    Force,
}

impl IdentityProviderSyncMode {
    /// All sync modes.
    pub const ALL: [Self; 3] = [Self::Legacy, Self::Import, Self::Force];
}

/// Configuration for one mapper instance attached to an identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Mapper ID.
    pub id: Uuid,

    /// Mapper name.
    pub name: String,

    /// Mapper type (the provider ID of the mapper implementation).
    pub mapper_type: String,

    /// Alias of the identity provider this mapper belongs to.
    pub identity_provider_alias: String,

    /// Sync mode.
    #[serde(default)]
    pub sync_mode: IdentityProviderSyncMode,

    /// Mapper-specific configuration.
    pub config: HashMap<String, String>,
}

impl MapperConfig {
    /// Creates a new mapper config.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mapper_type: impl Into<String>,
        identity_provider_alias: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            mapper_type: mapper_type.into(),
            identity_provider_alias: identity_provider_alias.into(),
            sync_mode: IdentityProviderSyncMode::default(),
            config: HashMap::new(),
        }
    }

    /// Adds a config value.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Removes a config value.
    #[must_use]
    pub fn without_config(mut self, key: &str) -> Self {
        self.config.remove(key);
        self
    }

    /// Gets a config value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets a config value, treating an empty string as unset.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

// ============================================================================
// Mapper Traits
// ============================================================================

/// Base trait for identity provider mappers.
///
/// The hooks have no error channel: a mapper that cannot do its job leaves
/// the user untouched and logs why.
pub trait IdentityProviderMapper: Send + Sync {
    /// Returns the mapper type identifier.
    fn id(&self) -> &'static str;

    /// Returns the category the admin console groups this mapper under.
    fn display_category(&self) -> &'static str;

    /// Returns the display name for this mapper.
    fn display_type(&self) -> &'static str;

    /// Returns help text describing this mapper.
    fn help_text(&self) -> &'static str;

    /// Returns the identity provider types this mapper can be attached to.
    fn compatible_providers(&self) -> &'static [&'static str];

    /// Returns the configuration options this mapper understands.
    fn config_properties(&self) -> &[ProviderConfigProperty];

    /// Returns whether the mapper can run under the given sync mode.
    fn supports_sync_mode(&self, sync_mode: IdentityProviderSyncMode) -> bool;

    /// Checks a configuration before it is stored.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found.
    fn validate_config(&self, _config: &MapperConfig) -> BrokerResult<()> {
        Ok(())
    }

    /// Runs before the local user exists, on the brokered identity context.
    fn preprocess_federated_identity(
        &self,
        _config: &MapperConfig,
        _context: &mut BrokeredIdentityContext,
    ) {
    }

    /// Runs on every login of an already linked user.
    fn update_brokered_user(
        &self,
        _user: &mut dyn UserAttributeStore,
        _config: &MapperConfig,
        _context: &BrokeredIdentityContext,
    ) {
    }
}

/// Mapper that contributes to the SP metadata published to a SAML provider.
pub trait SamlMetadataDescriptorUpdater {
    /// Updates the SP entity descriptor in place.
    fn update_metadata(&self, config: &MapperConfig, entity_descriptor: &mut EntityDescriptor);
}
