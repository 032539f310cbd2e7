//! Attribute lookup inside SAML assertions.

use kc_protocol_saml::{Assertion, Attribute, AttributeValue, ASSERTION_PREFIX};
use serde::{Deserialize, Serialize};

/// Identifies an assertion attribute by name or friendly name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSelector {
    /// Formal attribute name (usually a URN/OID).
    pub name: Option<String>,

    /// Human readable attribute name.
    pub friendly_name: Option<String>,
}

impl AttributeSelector {
    /// Creates a selector.
    #[must_use]
    pub const fn new(name: Option<String>, friendly_name: Option<String>) -> Self {
        Self {
            name,
            friendly_name,
        }
    }

    /// Selects by formal name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()), None)
    }

    /// Selects by friendly name.
    #[must_use]
    pub fn by_friendly_name(friendly_name: impl Into<String>) -> Self {
        Self::new(None, Some(friendly_name.into()))
    }

    /// The single key looked up in the assertion.
    ///
    /// The formal name wins when both are set. An empty key selects nothing.
    #[must_use]
    pub fn lookup_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.friendly_name.as_deref())
            .filter(|key| !key.is_empty())
    }

    /// Returns true if the attribute's name or friendly name equals the
    /// lookup key.
    #[must_use]
    pub fn matches(&self, attribute: &Attribute) -> bool {
        self.lookup_name().is_some_and(|key| {
            attribute.name == key || attribute.friendly_name.as_deref() == Some(key)
        })
    }
}

/// Collects the string values of every attribute matching `selector`.
///
/// Attributes are visited in document order across all attribute
/// statements, and values keep their order within each attribute. `NameID`
/// values are rendered as a standalone `saml2:NameID` element; one that
/// cannot be rendered is dropped. Other value types are dropped as well.
#[must_use]
pub fn locate(selector: &AttributeSelector, assertion: &Assertion) -> Vec<String> {
    if selector.lookup_name().is_none() {
        return Vec::new();
    }

    assertion
        .attributes()
        .filter(|attribute| selector.matches(attribute))
        .flat_map(|attribute| attribute.values.iter())
        .filter_map(value_to_string)
        .collect()
}

fn value_to_string(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::String(s) => Some(s.clone()),
        AttributeValue::NameId(name_id) => match name_id.to_xml(ASSERTION_PREFIX) {
            Ok(xml) => Some(xml),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Dropping NameID attribute value that cannot be serialized"
                );
                None
            }
        },
        AttributeValue::DateTime(_) | AttributeValue::Nil => None,
    }
}
