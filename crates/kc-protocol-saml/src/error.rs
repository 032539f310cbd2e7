//! SAML error types.
//!
//! Provides error types for building, rendering and reading the SAML
//! object model.

use thiserror::Error;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML protocol errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// XML rendering error.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// Missing required element or attribute.
    #[error("missing required element: {0}")]
    MissingElement(String),

    /// Element found in an unexpected namespace.
    #[error("unexpected namespace for {element}: {namespace}")]
    UnexpectedNamespace {
        /// The local name of the element.
        element: String,
        /// The namespace URI the element was bound to.
        namespace: String,
    },

    /// Unknown or unsupported attribute name format.
    #[error("unsupported attribute name format: {0}")]
    UnsupportedNameFormat(String),
}

impl From<quick_xml::Error> for SamlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SamlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::XmlParse(err.to_string())
    }
}
