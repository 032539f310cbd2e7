//! SAML Name ID types.
//!
//! Name identifiers are used to identify subjects in SAML assertions. They
//! also show up as attribute values, e.g. `eduPersonTargetedID`, where the
//! consumer keeps the whole `NameID` element in its canonical XML form.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use super::{NameIdFormat, SAML_NS};
use crate::error::{SamlError, SamlResult};
use crate::xml::XmlWriter;

/// Local name of the `NameID` element.
pub const NAME_ID_ELEMENT: &str = "NameID";

const FORMAT_ATTR: &str = "Format";
const SP_PROVIDED_ID_ATTR: &str = "SPProvidedID";
const SP_NAME_QUALIFIER_ATTR: &str = "SPNameQualifier";
const NAME_QUALIFIER_ATTR: &str = "NameQualifier";

/// SAML Name ID.
///
/// Represents the identifier of a subject in a SAML assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameId {
    /// The actual identifier value.
    pub value: String,

    /// The format of the name identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// The security or administrative domain that qualifies the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_qualifier: Option<String>,

    /// The service provider's entity ID that qualifies the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_name_qualifier: Option<String>,

    /// A provider identifier for the SP that was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_provided_id: Option<String>,
}

impl NameId {
    /// Creates a new name ID with the given value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: None,
            name_qualifier: None,
            sp_name_qualifier: None,
            sp_provided_id: None,
        }
    }

    /// Creates a new persistent name ID.
    #[must_use]
    pub fn persistent(value: impl Into<String>) -> Self {
        Self::new(value).with_format(NameIdFormat::Persistent)
    }

    /// Creates a new transient name ID.
    #[must_use]
    pub fn transient(value: impl Into<String>) -> Self {
        Self::new(value).with_format(NameIdFormat::Transient)
    }

    /// Sets the format for this name ID.
    #[must_use]
    pub fn with_format(mut self, format: NameIdFormat) -> Self {
        self.format = Some(format.uri().to_string());
        self
    }

    /// Sets the name qualifier.
    #[must_use]
    pub fn with_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.name_qualifier = Some(qualifier.into());
        self
    }

    /// Sets the SP name qualifier.
    #[must_use]
    pub fn with_sp_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.sp_name_qualifier = Some(qualifier.into());
        self
    }

    /// Sets the SP provided ID.
    #[must_use]
    pub fn with_sp_provided_id(mut self, id: impl Into<String>) -> Self {
        self.sp_provided_id = Some(id.into());
        self
    }

    /// Serializes this name ID as a standalone `NameID` element.
    ///
    /// The element is bound to the assertion namespace through `prefix` and
    /// declares that namespace itself, so the fragment can be stored and
    /// re-read without any surrounding document. Qualifier attributes are
    /// written only when set, in the order `Format`, `SPProvidedID`,
    /// `SPNameQualifier`, `NameQualifier`.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::XmlWrite`] if any field holds characters that
    /// cannot appear in an XML document.
    pub fn to_xml(&self, prefix: &str) -> SamlResult<String> {
        let element = format!("{prefix}:{NAME_ID_ELEMENT}");
        let xmlns = format!("xmlns:{prefix}");

        let mut attrs: Vec<(&str, &str)> = vec![(xmlns.as_str(), SAML_NS)];
        let qualifiers = [
            (FORMAT_ATTR, &self.format),
            (SP_PROVIDED_ID_ATTR, &self.sp_provided_id),
            (SP_NAME_QUALIFIER_ATTR, &self.sp_name_qualifier),
            (NAME_QUALIFIER_ATTR, &self.name_qualifier),
        ];
        attrs.extend(
            qualifiers
                .iter()
                .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v))),
        );

        let mut writer = XmlWriter::new();
        writer.text_element(&element, &attrs, &self.value)?;
        writer.into_string()
    }

    /// Reads a name ID back from a standalone `NameID` element.
    ///
    /// Any prefix is accepted as long as it is bound to the assertion
    /// namespace on the element itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not well-formed, contains no
    /// `NameID` element, or the element is in another namespace.
    pub fn from_xml(xml: &str) -> SamlResult<Self> {
        let mut reader = Reader::from_str(xml);

        let mut name_id: Option<Self> = None;
        loop {
            match reader.read_event()? {
                Event::Start(e) if is_name_id(&e) => {
                    name_id = Some(read_qualifiers(&e)?);
                }
                Event::Empty(e) if is_name_id(&e) => {
                    return read_qualifiers(&e);
                }
                Event::Text(t) => {
                    if let Some(ref mut id) = name_id {
                        id.value.push_str(&t.unescape()?);
                    }
                }
                Event::End(e) if e.local_name().as_ref() == NAME_ID_ELEMENT.as_bytes() => {
                    if let Some(id) = name_id {
                        return Ok(id);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Err(SamlError::MissingElement(NAME_ID_ELEMENT.to_string()))
    }
}

fn is_name_id(e: &BytesStart<'_>) -> bool {
    e.local_name().as_ref() == NAME_ID_ELEMENT.as_bytes()
}

fn read_qualifiers(e: &BytesStart<'_>) -> SamlResult<NameId> {
    let xmlns_key = match e.name().prefix() {
        Some(prefix) => format!("xmlns:{}", String::from_utf8_lossy(prefix.as_ref())),
        None => "xmlns".to_string(),
    };

    let mut namespace = None;
    let mut name_id = NameId::new(String::new());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        match key.as_str() {
            FORMAT_ATTR => name_id.format = Some(value),
            SP_PROVIDED_ID_ATTR => name_id.sp_provided_id = Some(value),
            SP_NAME_QUALIFIER_ATTR => name_id.sp_name_qualifier = Some(value),
            NAME_QUALIFIER_ATTR => name_id.name_qualifier = Some(value),
            k if k == xmlns_key => namespace = Some(value),
            _ => {}
        }
    }

    match namespace.as_deref() {
        Some(SAML_NS) => Ok(name_id),
        other => Err(SamlError::UnexpectedNamespace {
            element: NAME_ID_ELEMENT.to_string(),
            namespace: other.unwrap_or_default().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ASSERTION_PREFIX;
    use pretty_assertions::assert_eq;

    #[test]
    fn name_id_persistent() {
        let name_id = NameId::persistent("abc123");
        assert_eq!(name_id.value, "abc123");
        assert_eq!(name_id.format.as_deref(), Some(NameIdFormat::Persistent.uri()));
    }

    #[test]
    fn to_xml_writes_qualifiers_in_order() {
        let name_id = NameId::persistent("abc123")
            .with_name_qualifier("https://idp.example.com")
            .with_sp_name_qualifier("https://sp.example.com");

        let xml = name_id.to_xml(ASSERTION_PREFIX).unwrap();

        assert_eq!(
            xml,
            "<saml2:NameID xmlns:saml2=\"urn:oasis:names:tc:SAML:2.0:assertion\" \
             Format=\"urn:oasis:names:tc:SAML:2.0:nameid-format:persistent\" \
             SPNameQualifier=\"https://sp.example.com\" \
             NameQualifier=\"https://idp.example.com\">abc123</saml2:NameID>"
        );
    }

    #[test]
    fn to_xml_without_qualifiers() {
        let xml = NameId::new("plain").to_xml(ASSERTION_PREFIX).unwrap();
        assert_eq!(
            xml,
            "<saml2:NameID xmlns:saml2=\"urn:oasis:names:tc:SAML:2.0:assertion\">\
             plain</saml2:NameID>"
        );
    }

    #[test]
    fn to_xml_escapes_value() {
        let xml = NameId::new("a<b&c").to_xml(ASSERTION_PREFIX).unwrap();
        assert!(xml.contains(">a&lt;b&amp;c</saml2:NameID>"));
    }

    #[test]
    fn to_xml_rejects_invalid_characters() {
        let err = NameId::new("bad\u{1}value").to_xml(ASSERTION_PREFIX).unwrap_err();
        assert!(matches!(err, SamlError::XmlWrite(_)));
    }

    #[test]
    fn xml_roundtrip_keeps_content_and_qualifiers() {
        let original = NameId::transient("_9f2c")
            .with_name_qualifier("https://idp.example.com")
            .with_sp_name_qualifier("https://sp.example.com")
            .with_sp_provided_id("sp-42");

        let xml = original.to_xml(ASSERTION_PREFIX).unwrap();
        let parsed = NameId::from_xml(&xml).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn xml_roundtrip_keeps_surrounding_whitespace() {
        let original = NameId::persistent("  padded value \n");

        let xml = original.to_xml(ASSERTION_PREFIX).unwrap();
        assert!(xml.ends_with(">  padded value \n</saml2:NameID>"));

        assert_eq!(NameId::from_xml(&xml).unwrap(), original);
    }

    #[test]
    fn from_xml_ignores_whitespace_outside_element() {
        let xml = "\n  <saml2:NameID xmlns:saml2=\"urn:oasis:names:tc:SAML:2.0:assertion\">\
                   abc</saml2:NameID>\n";

        assert_eq!(NameId::from_xml(xml).unwrap(), NameId::new("abc"));
    }

    #[test]
    fn from_xml_accepts_other_prefixes() {
        let xml = concat!(
            r#"<saml:NameID xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
            r#"Format="urn:oasis:names:tc:SAML:2.0:nameid-format:persistent">xyz</saml:NameID>"#
        );
        let parsed = NameId::from_xml(xml).unwrap();

        assert_eq!(parsed.value, "xyz");
        assert_eq!(parsed.format.as_deref(), Some(NameIdFormat::Persistent.uri()));
    }

    #[test]
    fn from_xml_rejects_foreign_namespace() {
        let xml = r#"<x:NameID xmlns:x="urn:example:other">xyz</x:NameID>"#;
        let err = NameId::from_xml(xml).unwrap_err();
        assert!(matches!(err, SamlError::UnexpectedNamespace { .. }));
    }

    #[test]
    fn from_xml_requires_name_id() {
        let xml = r#"<Issuer xmlns="urn:oasis:names:tc:SAML:2.0:assertion">idp</Issuer>"#;
        let err = NameId::from_xml(xml).unwrap_err();
        assert!(matches!(err, SamlError::MissingElement(_)));
    }
}
