//! # kc-broker
//!
//! Identity provider brokering for Keycloak Rust.
//!
//! When a user logs in through an external SAML identity provider, the
//! configured mappers copy data from the assertion into the local user and
//! contribute to the SP metadata published to that provider.
//!
//! - [`locator`] - Finds attribute values inside an assertion
//! - [`sync`] - Reconciles located values into a user's attributes
//! - [`declarator`] - Adds `RequestedAttribute` declarations to SP metadata
//! - [`edu_person`] - The `eduPersonTargetedID` mapper built on the above
//! - [`mapper`] - Mapper traits and configuration
//! - [`context`] - Brokered identity context handed to mappers

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(warnings)]

pub mod config;
pub mod context;
pub mod declarator;
pub mod edu_person;
pub mod error;
pub mod locator;
pub mod mapper;
pub mod sync;

pub use config::{ConfigPropertyType, ProviderConfigProperty};
pub use context::{BrokeredIdentityContext, ContextData};
pub use declarator::{declare_attribute, RequestedAttributeSelector};
pub use edu_person::EduPersonTargetedIdMapper;
pub use error::{BrokerError, BrokerResult};
pub use locator::{locate, AttributeSelector};
pub use mapper::{
    IdentityProviderMapper, IdentityProviderSyncMode, MapperConfig, SamlMetadataDescriptorUpdater,
};
pub use sync::{synchronize, AttributeAction};
