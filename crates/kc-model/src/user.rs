//! User domain model.
//!
//! Users are the primary identity entities in Keycloak. They belong to a
//! realm and carry multi-valued custom attributes, some of which are
//! imported from external identity providers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read/write access to a user's custom attributes.
///
/// A missing key and a key holding an empty list are different states.
pub trait UserAttributeStore {
    /// Returns every attribute of the user.
    fn get_attributes(&self) -> &HashMap<String, Vec<String>>;

    /// Replaces all values of an attribute.
    fn set_attribute(&mut self, name: &str, values: Vec<String>);

    /// Removes an attribute entirely.
    fn remove_attribute(&mut self, name: &str);

    /// Returns the values of one attribute, if present.
    fn get_attribute(&self, name: &str) -> Option<&[String]> {
        self.get_attributes().get(name).map(Vec::as_slice)
    }
}

/// A Keycloak user.
///
/// Users represent individual identities within a realm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// Realm this user belongs to.
    pub realm_id: Uuid,
    /// Unique username within the realm.
    pub username: String,
    /// Whether the user account is enabled.
    pub enabled: bool,

    // === Profile ===
    /// User's email address.
    pub email: Option<String>,

    // === Timestamps ===
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,

    // === Custom Attributes ===
    /// Custom user attributes.
    pub attributes: HashMap<String, Vec<String>>,
}

impl User {
    /// Creates a new user with the given username.
    #[must_use]
    pub fn new(realm_id: Uuid, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            realm_id,
            username: username.into(),
            enabled: true,
            email: None,
            created_at: now,
            updated_at: now,
            attributes: HashMap::new(),
        }
    }

    /// Sets the user's email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets an attribute while building the user.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn get_first_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }
}

impl UserAttributeStore for User {
    fn get_attributes(&self) -> &HashMap<String, Vec<String>> {
        &self.attributes
    }

    fn set_attribute(&mut self, name: &str, values: Vec<String>) {
        self.attributes.insert(name.to_string(), values);
        self.updated_at = Utc::now();
    }

    fn remove_attribute(&mut self, name: &str) {
        if self.attributes.remove(name).is_some() {
            self.updated_at = Utc::now();
        }
    }
}
