//! SAML 2.0 object model for Keycloak Rust.
//!
//! This crate provides the SAML data structures consumed by the identity
//! brokering layer:
//!
//! - **Assertions** - Attribute statements with typed attribute values
//! - **Name identifiers** - `NameID` records with a canonical XML form
//! - **SP metadata** - Entity descriptors with attribute consuming services
//!
//! # Architecture
//!
//! - [`types`] - Core SAML types and data structures
//! - [`error`] - Error types for SAML operations
//!
//! Wire parsing and signature validation of assertions happen upstream; the
//! types here are handed over already populated.
//!
//! # Example
//!
//! ```rust
//! use kc_protocol_saml::{NameId, ASSERTION_PREFIX};
//!
//! let xml = NameId::persistent("abc123").to_xml(ASSERTION_PREFIX).unwrap();
//! assert!(xml.starts_with("<saml2:NameID"));
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)
//! - [SAML 2.0 Metadata](https://docs.oasis-open.org/security/saml/v2.0/saml-metadata-2.0-os.pdf)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;
mod xml;

pub use error::{SamlError, SamlResult};
pub use types::*;
