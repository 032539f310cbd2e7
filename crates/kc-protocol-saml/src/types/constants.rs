//! SAML 2.0 constants and URIs.
//!
//! Contains namespace URIs, binding URIs, name ID formats and attribute
//! name formats defined in the SAML 2.0 specification.

use std::str::FromStr;

use crate::error::SamlError;

/// SAML 2.0 assertion namespace URI.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace URI.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// SAML 2.0 metadata namespace URI.
pub const SAML_METADATA_NS: &str = "urn:oasis:names:tc:SAML:2.0:metadata";

/// Prefix bound to [`SAML_NS`] when serializing assertion elements.
pub const ASSERTION_PREFIX: &str = "saml2";

/// Prefix bound to [`SAML_METADATA_NS`] when serializing metadata.
pub const METADATA_PREFIX: &str = "md";

// ============================================================================
// Binding URIs
// ============================================================================

/// SAML binding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamlBinding {
    /// HTTP POST binding.
    HttpPost,
    /// HTTP Redirect binding.
    HttpRedirect,
    /// HTTP Artifact binding.
    HttpArtifact,
    /// SOAP binding.
    Soap,
}

impl SamlBinding {
    /// Returns the URI for this binding.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::HttpPost => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
            Self::HttpRedirect => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
            Self::HttpArtifact => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Artifact",
            Self::Soap => "urn:oasis:names:tc:SAML:2.0:bindings:SOAP",
        }
    }
}

// ============================================================================
// Name ID Formats
// ============================================================================

/// SAML Name ID formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameIdFormat {
    /// Unspecified name ID format.
    #[default]
    Unspecified,
    /// Email address format.
    Email,
    /// Entity identifier format.
    Entity,
    /// Persistent identifier format.
    Persistent,
    /// Transient identifier format.
    Transient,
}

impl NameIdFormat {
    /// Returns the URI for this name ID format.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified",
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Entity => "urn:oasis:names:tc:SAML:2.0:nameid-format:entity",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }
}

// ============================================================================
// Attribute Name Formats
// ============================================================================

/// SAML attribute name formats.
///
/// Mapper configuration refers to these by their constant name
/// (`ATTRIBUTE_FORMAT_URI`), metadata carries the URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeNameFormat {
    /// Basic (simple string) attribute names.
    Basic,
    /// URI reference attribute names.
    Uri,
    /// Unspecified attribute name format.
    Unspecified,
}

impl AttributeNameFormat {
    /// All formats, in the order offered to administrators.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Uri, Self::Unspecified];

    /// Returns the constant name used in mapper configuration.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Basic => "ATTRIBUTE_FORMAT_BASIC",
            Self::Uri => "ATTRIBUTE_FORMAT_URI",
            Self::Unspecified => "ATTRIBUTE_FORMAT_UNSPECIFIED",
        }
    }

    /// Returns the URI for this attribute name format.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Basic => "urn:oasis:names:tc:SAML:2.0:attrname-format:basic",
            Self::Uri => "urn:oasis:names:tc:SAML:2.0:attrname-format:uri",
            Self::Unspecified => "urn:oasis:names:tc:SAML:2.0:attrname-format:unspecified",
        }
    }

    /// Parses a format from its constant name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Parses a format from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.uri() == uri)
    }

    /// Parses a format given either its constant name or its URI.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_name(value).or_else(|| Self::from_uri(value))
    }
}

impl FromStr for AttributeNameFormat {
    type Err = SamlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SamlError::UnsupportedNameFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_uris() {
        assert_eq!(
            SamlBinding::HttpPost.uri(),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST"
        );
        assert_eq!(
            SamlBinding::HttpRedirect.uri(),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect"
        );
    }

    #[test]
    fn name_id_format_uris() {
        assert_eq!(
            NameIdFormat::Persistent.uri(),
            "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent"
        );
        assert_eq!(NameIdFormat::default(), NameIdFormat::Unspecified);
    }

    #[test]
    fn attribute_name_format_accepts_name_or_uri() {
        assert_eq!(
            AttributeNameFormat::parse("ATTRIBUTE_FORMAT_URI"),
            Some(AttributeNameFormat::Uri)
        );
        assert_eq!(
            AttributeNameFormat::parse("urn:oasis:names:tc:SAML:2.0:attrname-format:basic"),
            Some(AttributeNameFormat::Basic)
        );
        assert_eq!(AttributeNameFormat::parse("attribute_format_uri"), None);
    }

    #[test]
    fn attribute_name_format_from_str() {
        let format: AttributeNameFormat = "ATTRIBUTE_FORMAT_UNSPECIFIED".parse().unwrap();
        assert_eq!(format, AttributeNameFormat::Unspecified);

        let err = "xml".parse::<AttributeNameFormat>().unwrap_err();
        assert!(matches!(err, SamlError::UnsupportedNameFormat(ref v) if v == "xml"));
    }

    #[test]
    fn attribute_name_format_order() {
        let names: Vec<_> = AttributeNameFormat::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "ATTRIBUTE_FORMAT_BASIC",
                "ATTRIBUTE_FORMAT_URI",
                "ATTRIBUTE_FORMAT_UNSPECIFIED"
            ]
        );
    }
}
