//! Mapper configuration property descriptors.
//!
//! Each mapper describes the options it understands so that admin
//! frontends can render a form for them. The descriptors are plain values
//! owned by the mapper instance.

use serde::{Deserialize, Serialize};

/// Type of a configuration property, as understood by admin frontends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigPropertyType {
    /// Free-form text.
    String,

    /// One value out of a fixed list of options.
    List,
}

/// Describes one configuration option of a mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigProperty {
    /// Config key.
    pub name: String,

    /// Form label.
    pub label: String,

    /// Help text shown next to the field.
    pub help_text: String,

    /// Property type.
    #[serde(rename = "type")]
    pub property_type: ConfigPropertyType,

    /// Default value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Allowed values for [`ConfigPropertyType::List`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ProviderConfigProperty {
    /// Creates a property descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        property_type: ConfigPropertyType,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            help_text: String::new(),
            property_type,
            default_value: None,
            options: Vec::new(),
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the allowed options.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}
