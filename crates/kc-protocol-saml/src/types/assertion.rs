//! SAML Assertion types.
//!
//! Assertions contain statements about a subject made by an issuer. Only the
//! parts the brokering layer reads are modelled here: the subject and the
//! attribute statements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AttributeNameFormat, NameId};

/// SAML Assertion.
///
/// A package of information that supplies one or more statements made
/// by a SAML authority (the issuer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    /// Unique identifier for this assertion.
    pub id: String,

    /// Version of the SAML protocol (always "2.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Timestamp when this assertion was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the identity provider that issued this assertion.
    pub issuer: String,

    /// The subject of this assertion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,

    /// Attribute statements, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_statements: Vec<AttributeStatement>,
}

fn default_version() -> String {
    "2.0".to_string()
}

impl Assertion {
    /// Creates a new assertion.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            id: format!("_id{}", uuid::Uuid::new_v4()),
            version: default_version(),
            issue_instant: Utc::now(),
            issuer: issuer.into(),
            subject: None,
            attribute_statements: Vec::new(),
        }
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Appends an attribute statement.
    #[must_use]
    pub fn with_attribute_statement(mut self, statement: AttributeStatement) -> Self {
        self.attribute_statements.push(statement);
        self
    }

    /// Iterates over the attributes of every statement, in document order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attribute_statements
            .iter()
            .flat_map(|statement| statement.attributes.iter())
    }
}

/// Subject of an assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// The name identifier for the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id: Option<NameId>,
}

impl Subject {
    /// Creates a new subject with a name ID.
    #[must_use]
    pub const fn new(name_id: NameId) -> Self {
        Self {
            name_id: Some(name_id),
        }
    }
}

/// Attribute statement.
///
/// Contains attributes about the subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeStatement {
    /// List of attributes.
    pub attributes: Vec<Attribute>,
}

impl AttributeStatement {
    /// Creates a new empty attribute statement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }
}

/// SAML Attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    /// The attribute name (typically a URI).
    pub name: String,

    /// The format of the attribute name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_format: Option<String>,

    /// A human-readable name for the attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    /// The attribute values, in document order.
    pub values: Vec<AttributeValue>,
}

impl Attribute {
    /// Creates a new attribute without values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_format: None,
            friendly_name: None,
            values: Vec::new(),
        }
    }

    /// Creates a new attribute with a single value.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::new(name).with_value(value)
    }

    /// Creates a new attribute with multiple string values.
    #[must_use]
    pub fn multi(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            values: values.into_iter().map(AttributeValue::String).collect(),
            ..Self::new(name)
        }
    }

    /// Appends a value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<AttributeValue>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the name format.
    #[must_use]
    pub fn with_format(mut self, format: AttributeNameFormat) -> Self {
        self.name_format = Some(format.uri().to_string());
        self
    }
}

/// A single `AttributeValue`.
///
/// Identity providers send values of different XML schema types; each shape
/// the object model knows about gets its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// `xs:string` (or untyped) text content.
    String(String),

    /// A structured `saml2:NameID` element.
    NameId(NameId),

    /// `xs:dateTime` content.
    DateTime(DateTime<Utc>),

    /// An explicitly nil value (`xsi:nil="true"`).
    Nil,
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<NameId> for AttributeValue {
    fn from(value: NameId) -> Self {
        Self::NameId(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_creation() {
        let assertion = Assertion::new("https://idp.example.com")
            .with_subject(Subject::new(NameId::persistent("user-1")))
            .with_attribute_statement(
                AttributeStatement::new().with_attribute(Attribute::single("mail", "a@b.c")),
            );

        assert!(assertion.id.starts_with("_id"));
        assert_eq!(assertion.version, "2.0");
        assert_eq!(assertion.issuer, "https://idp.example.com");
        assert!(assertion.subject.is_some());
        assert_eq!(assertion.attribute_statements.len(), 1);
    }

    #[test]
    fn attributes_flatten_in_document_order() {
        let assertion = Assertion::new("https://idp.example.com")
            .with_attribute_statement(
                AttributeStatement::new()
                    .with_attribute(Attribute::single("a", "1"))
                    .with_attribute(Attribute::single("b", "2")),
            )
            .with_attribute_statement(AttributeStatement::new())
            .with_attribute_statement(
                AttributeStatement::new().with_attribute(Attribute::single("c", "3")),
            );

        let names: Vec<_> = assertion.attributes().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn attribute_builders() {
        let attr = Attribute::multi("roles", vec!["admin".to_string(), "user".to_string()])
            .with_value(NameId::new("x"))
            .with_friendly_name("Roles")
            .with_format(AttributeNameFormat::Basic);

        assert_eq!(attr.values.len(), 3);
        assert_eq!(attr.values[0], AttributeValue::String("admin".to_string()));
        assert!(matches!(attr.values[2], AttributeValue::NameId(_)));
        assert_eq!(attr.friendly_name.as_deref(), Some("Roles"));
        assert_eq!(
            attr.name_format.as_deref(),
            Some("urn:oasis:names:tc:SAML:2.0:attrname-format:basic")
        );
    }

    #[test]
    fn attribute_value_serde_is_tagged() {
        let json = serde_json::to_value(AttributeValue::from("abc")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "string", "value": "abc"}));

        let nil: AttributeValue = serde_json::from_str(r#"{"type":"nil"}"#).unwrap();
        assert_eq!(nil, AttributeValue::Nil);
    }
}
