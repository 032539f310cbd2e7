//! `eduPersonTargetedID` mapper.
//!
//! Imports the `eduPersonTargetedID` SAML attribute into a user attribute and
//! asks the identity provider to release it through the SP metadata.
//!
//! # Configuration
//!
//! | key | default |
//! |---|---|
//! | `attribute.name` | `urn:oid:1.3.6.1.4.1.5923.1.1.1.10` |
//! | `attribute.friendly.name` | `eduPersonTargetedID` |
//! | `attribute.name.format` | `ATTRIBUTE_FORMAT_URI` |
//! | `user.attribute` | `eduPersonTargetedID` |

use kc_model::UserAttributeStore;
use kc_protocol_saml::{AttributeNameFormat, EntityDescriptor};

use crate::config::{ConfigPropertyType, ProviderConfigProperty};
use crate::context::BrokeredIdentityContext;
use crate::declarator::{declare_attribute, RequestedAttributeSelector};
use crate::error::{BrokerError, BrokerResult};
use crate::locator::{locate, AttributeSelector};
use crate::mapper::{
    IdentityProviderMapper, IdentityProviderSyncMode, MapperConfig, SamlMetadataDescriptorUpdater,
};
use crate::sync::{synchronize, AttributeAction};

/// Maps the `eduPersonTargetedID` assertion attribute to a user attribute.
#[derive(Debug, Clone)]
pub struct EduPersonTargetedIdMapper {
    properties: Vec<ProviderConfigProperty>,
}

impl EduPersonTargetedIdMapper {
    /// Provider ID.
    pub const PROVIDER_ID: &'static str = "edu-person-targetedid-mapper";

    /// Identity provider types this mapper applies to.
    pub const COMPATIBLE_PROVIDERS: &'static [&'static str] = &["saml"];

    /// Display category and type.
    pub const DISPLAY_NAME: &'static str = "EduPersonTargetedID Mapper";

    /// Config key: attribute name to look for.
    pub const ATTRIBUTE_NAME: &'static str = "attribute.name";
    /// Config key: attribute friendly name to look for.
    pub const ATTRIBUTE_FRIENDLY_NAME: &'static str = "attribute.friendly.name";
    /// Config key: name format of the requested attribute.
    pub const ATTRIBUTE_NAME_FORMAT: &'static str = "attribute.name.format";
    /// Config key: user attribute receiving the values.
    pub const USER_ATTRIBUTE: &'static str = "user.attribute";

    /// Default attribute name.
    pub const ATTRIBUTE_NAME_DEFAULT: &'static str = "urn:oid:1.3.6.1.4.1.5923.1.1.1.10";
    /// Default attribute friendly name.
    pub const ATTRIBUTE_FRIENDLY_NAME_DEFAULT: &'static str = "eduPersonTargetedID";
    /// Default user attribute.
    pub const USER_ATTRIBUTE_DEFAULT: &'static str = "eduPersonTargetedID";

    /// Creates the mapper with its configuration property descriptors.
    #[must_use]
    pub fn new() -> Self {
        let properties = vec![
            ProviderConfigProperty::new(
                Self::ATTRIBUTE_NAME,
                "Attribute Name",
                ConfigPropertyType::String,
            )
            .with_help_text(
                "Name of attribute to search for in assertion.  You can leave this blank and \
                 specify a friendly name instead. \
                 Default to urn:oid:1.3.6.1.4.1.5923.1.1.1.10 .",
            )
            .with_default(Self::ATTRIBUTE_NAME_DEFAULT),
            ProviderConfigProperty::new(
                Self::ATTRIBUTE_FRIENDLY_NAME,
                "Friendly Name",
                ConfigPropertyType::String,
            )
            .with_help_text(
                "Friendly name of attribute to search for in assertion.  You can leave this blank \
                 and specify a name instead. Default to eduPersonTargetedID.",
            )
            .with_default(Self::ATTRIBUTE_FRIENDLY_NAME_DEFAULT),
            ProviderConfigProperty::new(
                Self::ATTRIBUTE_NAME_FORMAT,
                "Name Format",
                ConfigPropertyType::List,
            )
            .with_help_text(
                "Name format of attribute to specify in the RequestedAttribute element. \
                 Default to uri format.",
            )
            .with_options(AttributeNameFormat::ALL.iter().map(AttributeNameFormat::name))
            .with_default(AttributeNameFormat::Uri.name()),
            ProviderConfigProperty::new(
                Self::USER_ATTRIBUTE,
                "User Attribute Name",
                ConfigPropertyType::String,
            )
            .with_help_text(
                "User attribute name to store saml attribute. Default to eduPersonTargetedID.",
            )
            .with_default(Self::USER_ATTRIBUTE_DEFAULT),
        ];

        Self { properties }
    }

    /// Returns a mapper configuration filled with the default values.
    #[must_use]
    pub fn default_config(&self, identity_provider_alias: impl Into<String>) -> MapperConfig {
        self.properties.iter().fold(
            MapperConfig::new(Self::DISPLAY_NAME, Self::PROVIDER_ID, identity_provider_alias),
            |config, property| match property.default_value {
                Some(ref value) => config.with_config(property.name.as_str(), value.as_str()),
                None => config,
            },
        )
    }

    /// The key looked up in assertions: the configured attribute name, or
    /// the friendly name when no name is configured.
    #[must_use]
    pub fn resolve_selector_name(config: &MapperConfig) -> Option<&str> {
        config
            .get(Self::ATTRIBUTE_NAME)
            .or_else(|| config.get(Self::ATTRIBUTE_FRIENDLY_NAME))
    }

    /// Builds the assertion selector for `config`.
    #[must_use]
    pub fn selector(config: &MapperConfig) -> AttributeSelector {
        AttributeSelector::by_name(Self::resolve_selector_name(config).unwrap_or_default())
    }

    /// Parses the configured name format. Unset means BASIC.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a format name nor a format
    /// URI.
    pub fn configured_name_format(
        config: &MapperConfig,
    ) -> BrokerResult<Option<AttributeNameFormat>> {
        config
            .get(Self::ATTRIBUTE_NAME_FORMAT)
            .map(str::parse::<AttributeNameFormat>)
            .transpose()
            .map_err(BrokerError::from)
    }

    /// Locates the configured attribute in the SAML assertion of `context`.
    ///
    /// Returns `None` if the context has no `SAML_ASSERTION` entry or the
    /// entry is not an assertion. Callers pass the result to the
    /// synchronizer, which treats `None` as "nothing received" and removes
    /// the stored user attribute. A login without an assertion therefore
    /// clears a previously mapped value.
    #[must_use]
    pub fn find_attribute_values_in_context(
        config: &MapperConfig,
        context: &BrokeredIdentityContext,
    ) -> Option<Vec<String>> {
        match context.saml_assertion() {
            Ok(assertion) => Some(locate(&Self::selector(config), assertion)),
            Err(e) => {
                tracing::debug!(error = %e, "No assertion in brokered identity context");
                None
            }
        }
    }

    /// Synchronizes the configured user attribute and returns what changed.
    pub fn apply(
        &self,
        user: &mut dyn UserAttributeStore,
        config: &MapperConfig,
        context: &BrokeredIdentityContext,
    ) -> AttributeAction {
        let Some(target) = config.get_non_empty(Self::USER_ATTRIBUTE) else {
            tracing::debug!(mapper = %config.name, "No user attribute configured, skipping");
            return AttributeAction::Unchanged;
        };

        let located = Self::find_attribute_values_in_context(config, context);
        synchronize(target, located.as_deref(), user)
    }

    /// Builds the metadata declaration for `config`.
    ///
    /// An unrecognised name format is logged and replaced by BASIC.
    #[must_use]
    pub fn requested_attribute_selector(config: &MapperConfig) -> RequestedAttributeSelector {
        let name_format = Self::configured_name_format(config).unwrap_or_else(|e| {
            tracing::warn!(mapper = %config.name, error = %e, "Falling back to basic name format");
            None
        });

        RequestedAttributeSelector::new(
            config.get(Self::ATTRIBUTE_NAME).map(str::to_string),
            config.get(Self::ATTRIBUTE_FRIENDLY_NAME).map(str::to_string),
            name_format,
        )
    }
}

impl Default for EduPersonTargetedIdMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProviderMapper for EduPersonTargetedIdMapper {
    fn id(&self) -> &'static str {
        Self::PROVIDER_ID
    }

    fn display_category(&self) -> &'static str {
        Self::DISPLAY_NAME
    }

    fn display_type(&self) -> &'static str {
        Self::DISPLAY_NAME
    }

    fn help_text(&self) -> &'static str {
        "Import eduPersonTargetedID saml attribute if it exists in assertion into the specified \
         user attribute."
    }

    fn compatible_providers(&self) -> &'static [&'static str] {
        Self::COMPATIBLE_PROVIDERS
    }

    fn config_properties(&self) -> &[ProviderConfigProperty] {
        &self.properties
    }

    fn supports_sync_mode(&self, sync_mode: IdentityProviderSyncMode) -> bool {
        IdentityProviderSyncMode::ALL.contains(&sync_mode)
    }

    fn validate_config(&self, config: &MapperConfig) -> BrokerResult<()> {
        if Self::resolve_selector_name(config).map_or(true, str::is_empty) {
            return Err(BrokerError::config(format!(
                "either '{}' or '{}' must be set",
                Self::ATTRIBUTE_NAME,
                Self::ATTRIBUTE_FRIENDLY_NAME
            )));
        }
        Self::configured_name_format(config)?;
        Ok(())
    }

    fn preprocess_federated_identity(
        &self,
        config: &MapperConfig,
        context: &mut BrokeredIdentityContext,
    ) {
        let Some(target) = config.get_non_empty(Self::USER_ATTRIBUTE) else {
            tracing::debug!(mapper = %config.name, "No user attribute configured, skipping");
            return;
        };

        let values = Self::find_attribute_values_in_context(config, context).unwrap_or_default();
        if !values.is_empty() {
            context.set_user_attribute(target, values);
        }
    }

    fn update_brokered_user(
        &self,
        user: &mut dyn UserAttributeStore,
        config: &MapperConfig,
        context: &BrokeredIdentityContext,
    ) {
        self.apply(user, config, context);
    }
}

impl SamlMetadataDescriptorUpdater for EduPersonTargetedIdMapper {
    fn update_metadata(&self, config: &MapperConfig, entity_descriptor: &mut EntityDescriptor) {
        let selector = Self::requested_attribute_selector(config);
        let appended = declare_attribute(&selector, entity_descriptor);
        if appended > 0 {
            tracing::debug!(
                mapper = %config.name,
                appended,
                "Requested attribute added to SP metadata"
            );
        }
    }
}
