//! Declares a requested attribute in SP metadata.
//!
//! Each attribute consuming service of each SP descriptor gets the
//! declaration unless it already requests a matching attribute.

use kc_protocol_saml::{AttributeNameFormat, EntityDescriptor, RequestedAttribute};

/// The attribute to request, as configured on a mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedAttributeSelector {
    /// Attribute name. `None` matches any existing declaration's name.
    pub name: Option<String>,

    /// Friendly name. `None` matches any existing declaration's friendly
    /// name.
    pub friendly_name: Option<String>,

    /// Name format. Defaults to [`AttributeNameFormat::Basic`].
    pub name_format: Option<AttributeNameFormat>,
}

impl RequestedAttributeSelector {
    /// Creates a selector.
    #[must_use]
    pub const fn new(
        name: Option<String>,
        friendly_name: Option<String>,
        name_format: Option<AttributeNameFormat>,
    ) -> Self {
        Self {
            name,
            friendly_name,
            name_format,
        }
    }

    /// Builds the declaration to insert.
    ///
    /// The friendly name is only carried over when non-empty; `isRequired`
    /// is left unset.
    #[must_use]
    pub fn to_requested_attribute(&self) -> RequestedAttribute {
        RequestedAttribute {
            name: self.name.clone(),
            name_format: Some(
                self.name_format
                    .unwrap_or(AttributeNameFormat::Basic)
                    .uri()
                    .to_string(),
            ),
            friendly_name: self.friendly_name.clone().filter(|f| !f.is_empty()),
            is_required: None,
        }
    }

    /// Returns true if `existing` already covers this selector.
    ///
    /// Each side compares case-insensitively; an unset selector side matches
    /// anything, including an unset declaration field.
    #[must_use]
    pub fn matches(&self, existing: &RequestedAttribute) -> bool {
        field_matches(self.name.as_deref(), existing.name.as_deref())
            && field_matches(
                self.friendly_name.as_deref(),
                existing.friendly_name.as_deref(),
            )
    }
}

fn field_matches(selector: Option<&str>, existing: Option<&str>) -> bool {
    match (selector, existing) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(wanted), Some(found)) => wanted.to_lowercase() == found.to_lowercase(),
    }
}

/// Adds the selected attribute to every attribute consuming service of every
/// SP descriptor that does not already request it.
///
/// Returns the number of declarations appended. Descriptors other than SP
/// descriptors are left alone.
pub fn declare_attribute(
    selector: &RequestedAttributeSelector,
    entity_descriptor: &mut EntityDescriptor,
) -> usize {
    let requested = selector.to_requested_attribute();
    let mut appended = 0;

    for service in entity_descriptor.attribute_consuming_services_mut() {
        let already_present = service
            .requested_attributes
            .iter()
            .any(|existing| selector.matches(existing));

        if !already_present {
            service.add_requested_attribute(requested.clone());
            appended += 1;
        }
    }

    tracing::debug!(
        entity_id = %entity_descriptor.entity_id,
        name = ?selector.name,
        friendly_name = ?selector.friendly_name,
        appended,
        "Declared requested attribute"
    );
    appended
}
