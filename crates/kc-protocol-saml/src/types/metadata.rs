//! SAML 2.0 metadata types.
//!
//! An [`EntityDescriptor`] describes one SAML entity. Service provider
//! descriptors list the attributes the SP asks the IdP to release through
//! their attribute consuming services.

use serde::{Deserialize, Serialize};

use super::{AttributeNameFormat, SamlBinding, METADATA_PREFIX, SAMLP_NS, SAML_METADATA_NS};
use crate::error::SamlResult;
use crate::xml::XmlWriter;

/// Entity descriptor, the root of a metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity ID of the described entity.
    pub entity_id: String,

    /// Descriptor groups, in document order.
    #[serde(default)]
    pub choices: Vec<EntityDescriptorChoice>,
}

impl EntityDescriptor {
    /// Creates an empty entity descriptor.
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            choices: Vec::new(),
        }
    }

    /// Appends a descriptor group.
    #[must_use]
    pub fn with_choice(mut self, choice: EntityDescriptorChoice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Appends a role descriptor to the last group, opening one if needed.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: RoleDescriptor) -> Self {
        if self.choices.is_empty() {
            self.choices.push(EntityDescriptorChoice::new());
        }
        if let Some(choice) = self.choices.last_mut() {
            choice.descriptors.push(descriptor);
        }
        self
    }

    /// Iterates mutably over every attribute consuming service of every SP
    /// descriptor, in document order.
    pub fn attribute_consuming_services_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut AttributeConsumingService> {
        self.choices
            .iter_mut()
            .flat_map(|choice| choice.descriptors.iter_mut())
            .filter_map(RoleDescriptor::sp_descriptor_mut)
            .flat_map(|sp| sp.attribute_consuming_services.iter_mut())
    }

    /// Renders this descriptor as a metadata XML document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::XmlWrite`] if a value cannot be
    /// represented in XML.
    pub fn to_xml(&self) -> SamlResult<String> {
        let root = md("EntityDescriptor");
        let xmlns = format!("xmlns:{METADATA_PREFIX}");

        let mut writer = XmlWriter::indented();
        writer.declaration()?;
        writer.start(
            &root,
            &[(xmlns.as_str(), SAML_METADATA_NS), ("entityID", self.entity_id.as_str())],
        )?;
        for descriptor in self.choices.iter().flat_map(|c| c.descriptors.iter()) {
            match descriptor {
                RoleDescriptor::ServiceProvider(sp) => write_sp(&mut writer, sp)?,
                RoleDescriptor::IdentityProvider(idp) => write_idp(&mut writer, idp)?,
            }
        }
        writer.end(&root)?;
        writer.into_string()
    }
}

/// A group of role descriptors inside an entity descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptorChoice {
    /// Role descriptors, in document order.
    pub descriptors: Vec<RoleDescriptor>,
}

impl EntityDescriptorChoice {
    /// Creates an empty group.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Appends a role descriptor.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: RoleDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }
}

/// A role the entity plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleDescriptor {
    /// `SPSSODescriptor`.
    ServiceProvider(SpSsoDescriptor),
    /// `IDPSSODescriptor`.
    IdentityProvider(IdpSsoDescriptor),
}

impl RoleDescriptor {
    /// Returns the SP descriptor, if this is one.
    #[must_use]
    pub const fn sp_descriptor(&self) -> Option<&SpSsoDescriptor> {
        match self {
            Self::ServiceProvider(sp) => Some(sp),
            Self::IdentityProvider(_) => None,
        }
    }

    /// Returns the SP descriptor mutably, if this is one.
    pub fn sp_descriptor_mut(&mut self) -> Option<&mut SpSsoDescriptor> {
        match self {
            Self::ServiceProvider(sp) => Some(sp),
            Self::IdentityProvider(_) => None,
        }
    }
}

/// Service provider SSO descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpSsoDescriptor {
    /// Supported protocol URIs.
    pub protocol_support_enumeration: String,

    /// Whether the SP signs its authentication requests.
    pub authn_requests_signed: bool,

    /// Whether the SP wants assertions signed.
    pub want_assertions_signed: bool,

    /// Supported name ID format URIs.
    #[serde(default)]
    pub name_id_formats: Vec<String>,

    /// Assertion consumer service endpoints.
    #[serde(default)]
    pub assertion_consumer_services: Vec<IndexedEndpoint>,

    /// Attribute consuming services.
    #[serde(default)]
    pub attribute_consuming_services: Vec<AttributeConsumingService>,
}

impl SpSsoDescriptor {
    /// Creates a SAML 2.0 SP descriptor without endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            protocol_support_enumeration: SAMLP_NS.to_string(),
            authn_requests_signed: false,
            want_assertions_signed: false,
            name_id_formats: Vec::new(),
            assertion_consumer_services: Vec::new(),
            attribute_consuming_services: Vec::new(),
        }
    }

    /// Adds a supported name ID format.
    #[must_use]
    pub fn with_name_id_format(mut self, format: impl Into<String>) -> Self {
        self.name_id_formats.push(format.into());
        self
    }

    /// Adds an assertion consumer service.
    #[must_use]
    pub fn with_assertion_consumer_service(mut self, endpoint: IndexedEndpoint) -> Self {
        self.assertion_consumer_services.push(endpoint);
        self
    }

    /// Adds an attribute consuming service.
    #[must_use]
    pub fn with_attribute_consuming_service(mut self, service: AttributeConsumingService) -> Self {
        self.attribute_consuming_services.push(service);
        self
    }
}

impl Default for SpSsoDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity provider SSO descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpSsoDescriptor {
    /// Supported protocol URIs.
    pub protocol_support_enumeration: String,

    /// Whether the IdP requires signed authentication requests.
    pub want_authn_requests_signed: bool,

    /// Single sign-on endpoints.
    #[serde(default)]
    pub single_sign_on_services: Vec<Endpoint>,
}

impl IdpSsoDescriptor {
    /// Creates a SAML 2.0 IdP descriptor without endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            protocol_support_enumeration: SAMLP_NS.to_string(),
            want_authn_requests_signed: false,
            single_sign_on_services: Vec::new(),
        }
    }

    /// Adds a single sign-on endpoint.
    #[must_use]
    pub fn with_single_sign_on_service(mut self, endpoint: Endpoint) -> Self {
        self.single_sign_on_services.push(endpoint);
        self
    }
}

impl Default for IdpSsoDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

/// A protocol endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Binding URI.
    pub binding: String,
    /// Endpoint URL.
    pub location: String,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(binding: SamlBinding, location: impl Into<String>) -> Self {
        Self {
            binding: binding.uri().to_string(),
            location: location.into(),
        }
    }
}

/// A protocol endpoint with an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedEndpoint {
    /// Binding URI.
    pub binding: String,
    /// Endpoint URL.
    pub location: String,
    /// Index of the endpoint.
    pub index: u16,
    /// Whether this is the default endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl IndexedEndpoint {
    /// Creates an indexed endpoint.
    #[must_use]
    pub fn new(binding: SamlBinding, location: impl Into<String>, index: u16) -> Self {
        Self {
            binding: binding.uri().to_string(),
            location: location.into(),
            index,
            is_default: None,
        }
    }
}

/// A localized name (`md:ServiceName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    /// Language tag.
    pub lang: String,
    /// Name text.
    pub value: String,
}

/// An `AttributeConsumingService` of an SP descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeConsumingService {
    /// Index of the service.
    pub index: u16,

    /// Whether this is the default service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,

    /// Service names.
    #[serde(default)]
    pub service_names: Vec<LocalizedName>,

    /// Requested attributes, in document order.
    #[serde(default)]
    pub requested_attributes: Vec<RequestedAttribute>,
}

impl AttributeConsumingService {
    /// Creates an empty service with the given index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self {
            index,
            is_default: None,
            service_names: Vec::new(),
            requested_attributes: Vec::new(),
        }
    }

    /// Adds a service name.
    #[must_use]
    pub fn with_service_name(mut self, lang: impl Into<String>, name: impl Into<String>) -> Self {
        self.service_names.push(LocalizedName {
            lang: lang.into(),
            value: name.into(),
        });
        self
    }

    /// Adds a requested attribute.
    #[must_use]
    pub fn with_requested_attribute(mut self, attribute: RequestedAttribute) -> Self {
        self.requested_attributes.push(attribute);
        self
    }

    /// Appends a requested attribute.
    pub fn add_requested_attribute(&mut self, attribute: RequestedAttribute) {
        self.requested_attributes.push(attribute);
    }
}

/// A `RequestedAttribute` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedAttribute {
    /// Attribute name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Attribute name format URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_format: Option<String>,

    /// Human readable attribute name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    /// Whether the attribute is required. Unset means "not stated".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
}

impl RequestedAttribute {
    /// Creates a requested attribute with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the name format.
    #[must_use]
    pub fn with_name_format(mut self, format: AttributeNameFormat) -> Self {
        self.name_format = Some(format.uri().to_string());
        self
    }

    /// Sets the required flag.
    #[must_use]
    pub const fn with_is_required(mut self, required: bool) -> Self {
        self.is_required = Some(required);
        self
    }
}

fn md(local: &str) -> String {
    format!("{METADATA_PREFIX}:{local}")
}

const fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn write_sp(writer: &mut XmlWriter, sp: &SpSsoDescriptor) -> SamlResult<()> {
    let element = md("SPSSODescriptor");
    writer.start(
        &element,
        &[
            ("AuthnRequestsSigned", bool_str(sp.authn_requests_signed)),
            ("WantAssertionsSigned", bool_str(sp.want_assertions_signed)),
            ("protocolSupportEnumeration", sp.protocol_support_enumeration.as_str()),
        ],
    )?;

    for format in &sp.name_id_formats {
        writer.text_element(&md("NameIDFormat"), &[], format)?;
    }

    for acs in &sp.assertion_consumer_services {
        let index = acs.index.to_string();
        let mut attrs = vec![
            ("Binding", acs.binding.as_str()),
            ("Location", acs.location.as_str()),
            ("index", index.as_str()),
        ];
        if let Some(is_default) = acs.is_default {
            attrs.push(("isDefault", bool_str(is_default)));
        }
        writer.empty(&md("AssertionConsumerService"), &attrs)?;
    }

    for service in &sp.attribute_consuming_services {
        write_attribute_consuming_service(writer, service)?;
    }

    writer.end(&element)
}

fn write_attribute_consuming_service(
    writer: &mut XmlWriter,
    service: &AttributeConsumingService,
) -> SamlResult<()> {
    let element = md("AttributeConsumingService");
    let index = service.index.to_string();
    let mut attrs = vec![("index", index.as_str())];
    if let Some(is_default) = service.is_default {
        attrs.push(("isDefault", bool_str(is_default)));
    }
    writer.start(&element, &attrs)?;

    for name in &service.service_names {
        writer.text_element(&md("ServiceName"), &[("xml:lang", name.lang.as_str())], &name.value)?;
    }

    for requested in &service.requested_attributes {
        let mut attrs = Vec::with_capacity(4);
        if let Some(ref name) = requested.name {
            attrs.push(("Name", name.as_str()));
        }
        if let Some(ref format) = requested.name_format {
            attrs.push(("NameFormat", format.as_str()));
        }
        if let Some(ref friendly) = requested.friendly_name {
            attrs.push(("FriendlyName", friendly.as_str()));
        }
        if let Some(required) = requested.is_required {
            attrs.push(("isRequired", bool_str(required)));
        }
        writer.empty(&md("RequestedAttribute"), &attrs)?;
    }

    writer.end(&element)
}

fn write_idp(writer: &mut XmlWriter, idp: &IdpSsoDescriptor) -> SamlResult<()> {
    let element = md("IDPSSODescriptor");
    writer.start(
        &element,
        &[
            ("WantAuthnRequestsSigned", bool_str(idp.want_authn_requests_signed)),
            ("protocolSupportEnumeration", idp.protocol_support_enumeration.as_str()),
        ],
    )?;
    for sso in &idp.single_sign_on_services {
        writer.empty(
            &md("SingleSignOnService"),
            &[("Binding", sso.binding.as_str()), ("Location", sso.location.as_str())],
        )?;
    }
    writer.end(&element)
}
