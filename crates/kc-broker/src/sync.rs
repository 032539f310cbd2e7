//! Reconciles located assertion values into a user attribute.

use kc_model::UserAttributeStore;
use serde::{Deserialize, Serialize};

/// Change applied to a user attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "values", rename_all = "snake_case")]
pub enum AttributeAction {
    /// The attribute was removed.
    Remove,
    /// The attribute did not exist and was created.
    Create(Vec<String>),
    /// The attribute existed with different values and was replaced.
    Replace(Vec<String>),
    /// Nothing changed.
    Unchanged,
}

impl AttributeAction {
    /// Computes the action for the located values against the current ones.
    ///
    /// `None` for `located` means nothing was received and the attribute
    /// must go. Value comparison is order sensitive.
    #[must_use]
    pub fn decide(located: Option<&[String]>, current: Option<&[String]>) -> Self {
        match (located, current) {
            (None, _) => Self::Remove,
            (Some(values), None) => Self::Create(values.to_vec()),
            (Some(values), Some(current)) if values != current => Self::Replace(values.to_vec()),
            (Some(_), Some(_)) => Self::Unchanged,
        }
    }

    /// Applies the action to `key` in `store`.
    pub fn apply<S: UserAttributeStore + ?Sized>(&self, key: &str, store: &mut S) {
        match self {
            Self::Remove => store.remove_attribute(key),
            Self::Create(values) | Self::Replace(values) => {
                store.set_attribute(key, values.clone());
            }
            Self::Unchanged => {}
        }
    }
}

/// Brings `target_key` in `store` in line with the located values.
///
/// An empty `target_key` skips the whole operation.
pub fn synchronize<S: UserAttributeStore + ?Sized>(
    target_key: &str,
    located: Option<&[String]>,
    store: &mut S,
) -> AttributeAction {
    if target_key.is_empty() {
        tracing::debug!("No destination user attribute configured, skipping sync");
        return AttributeAction::Unchanged;
    }

    let action = AttributeAction::decide(located, store.get_attribute(target_key));
    action.apply(target_key, store);

    tracing::debug!(attribute = target_key, ?action, "Synchronized user attribute");
    action
}
