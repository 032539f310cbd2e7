//! SAML 2.0 types and data structures.
//!
//! This module contains the assertion, name identifier and metadata types
//! consumed by the identity brokering layer.

mod assertion;
mod constants;
mod metadata;
mod name_id;

pub use assertion::*;
pub use constants::*;
pub use metadata::*;
pub use name_id::*;
