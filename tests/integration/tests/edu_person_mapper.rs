//! `eduPersonTargetedID` mapper integration tests.
//!
//! Covers first login, repeat logins and SP metadata publishing.

use kc_broker::{
    AttributeAction, BrokeredIdentityContext, EduPersonTargetedIdMapper, IdentityProviderMapper,
    SamlMetadataDescriptorUpdater,
};
use kc_model::UserAttributeStore;
use kc_protocol_saml::{Attribute, AttributeNameFormat, NameId, RequestedAttribute};
use pretty_assertions::assert_eq;

use crate::common::{
    assertion, idp_metadata, login_context, sp_metadata, targeted_id, TestEnv, EPTID, IDP_ALIAS,
};

const USER_ATTRIBUTE: &str = "eduPersonTargetedID";

/// First login copies the targeted ID into the context, then into the user.
#[test]
fn test_first_login_imports_targeted_id() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let mut context = login_context(assertion(
        "_transient-1",
        vec![
            Attribute::single("urn:oid:0.9.2342.19200300.100.1.3", "jdoe@example.org")
                .with_friendly_name("mail"),
            Attribute::single(EPTID, targeted_id("opaque-42"))
                .with_friendly_name("eduPersonTargetedID")
                .with_format(AttributeNameFormat::Uri),
        ],
    ));

    env.mapper.preprocess_federated_identity(&env.config, &mut context);

    let imported = context
        .user_attribute(USER_ATTRIBUTE)
        .expect("targeted ID should be imported");
    assert_eq!(imported.len(), 1);
    assert_eq!(NameId::from_xml(&imported[0])?, targeted_id("opaque-42"));

    let mut user = env.user("jdoe");
    for (name, values) in context.user_attributes() {
        user.set_attribute(name, values.clone());
    }

    // The first update after creation finds the same values.
    assert_eq!(
        env.mapper.apply(&mut user, &env.config, &context),
        AttributeAction::Unchanged
    );
    Ok(())
}

/// Repeat logins keep the user attribute in line with the assertion.
#[test]
fn test_repeat_logins_sync_user_attribute() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let mut user = env.user("jdoe");

    let login = |values: Vec<&str>| -> BrokeredIdentityContext {
        let attribute = values
            .into_iter()
            .fold(Attribute::new(EPTID), |attribute, value| attribute.with_value(value));
        login_context(assertion("_transient", vec![attribute]))
    };

    let context = login(vec!["a"]);
    assert_eq!(
        env.mapper.apply(&mut user, &env.config, &context),
        AttributeAction::Create(vec!["a".to_string()])
    );

    let context = login(vec!["a"]);
    assert_eq!(
        env.mapper.apply(&mut user, &env.config, &context),
        AttributeAction::Unchanged
    );

    let context = login(vec!["b", "a"]);
    env.mapper.update_brokered_user(&mut user, &env.config, &context);
    assert_eq!(
        user.get_attribute(USER_ATTRIBUTE),
        Some(&["b".to_string(), "a".to_string()][..])
    );

    // An assertion without the attribute stores an empty list.
    let context = login_context(assertion("_transient", Vec::new()));
    env.mapper.update_brokered_user(&mut user, &env.config, &context);
    assert_eq!(user.get_attribute(USER_ATTRIBUTE), Some(&[][..]));

    // No assertion at all drops the attribute.
    let context = BrokeredIdentityContext::new("idp-user-1", IDP_ALIAS);
    env.mapper.update_brokered_user(&mut user, &env.config, &context);
    assert_eq!(user.get_attribute(USER_ATTRIBUTE), None);
    Ok(())
}

/// Lookup by friendly name when no formal name is configured.
#[test]
fn test_friendly_name_lookup() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let config = env
        .config
        .clone()
        .without_config(EduPersonTargetedIdMapper::ATTRIBUTE_NAME);
    env.mapper.validate_config(&config)?;

    let context = login_context(assertion(
        "_transient",
        vec![Attribute::single("urn:mace:dir:attribute-def:eduPersonTargetedID", "legacy")
            .with_friendly_name("eduPersonTargetedID")],
    ));
    let mut user = env.user("jdoe");

    env.mapper.update_brokered_user(&mut user, &config, &context);

    assert_eq!(user.get_first_attribute(USER_ATTRIBUTE), Some("legacy"));
    Ok(())
}

/// Publishing metadata requests the attribute once per service.
#[test]
fn test_metadata_publish_requests_attribute() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let mut metadata = sp_metadata();

    env.mapper.update_metadata(&env.config, &mut metadata);
    env.mapper.update_metadata(&env.config, &mut metadata);

    let service = metadata
        .attribute_consuming_services_mut()
        .next()
        .expect("SP metadata has an attribute consuming service");
    assert_eq!(
        service.requested_attributes,
        [RequestedAttribute::new(EPTID)
            .with_friendly_name("eduPersonTargetedID")
            .with_name_format(AttributeNameFormat::Uri)]
    );

    let xml = metadata.to_xml()?;
    assert!(
        xml.contains(
            "<md:RequestedAttribute Name=\"urn:oid:1.3.6.1.4.1.5923.1.1.1.10\" \
             NameFormat=\"urn:oasis:names:tc:SAML:2.0:attrname-format:uri\" \
             FriendlyName=\"eduPersonTargetedID\"/>"
        ),
        "Metadata should request eduPersonTargetedID: {xml}"
    );
    Ok(())
}

/// An existing declaration with the same name is not duplicated.
#[test]
fn test_metadata_publish_keeps_existing_declaration() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let config = env
        .config
        .clone()
        .without_config(EduPersonTargetedIdMapper::ATTRIBUTE_FRIENDLY_NAME)
        .with_config(EduPersonTargetedIdMapper::ATTRIBUTE_NAME, "foo");

    let mut metadata = sp_metadata();
    if let Some(service) = metadata.attribute_consuming_services_mut().next() {
        service.add_requested_attribute(RequestedAttribute::new("FOO"));
    }
    let before = metadata.clone();

    env.mapper.update_metadata(&config, &mut metadata);

    assert_eq!(metadata, before);
    Ok(())
}

/// Metadata without SP roles is left untouched.
#[test]
fn test_metadata_publish_without_sp_descriptor() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let mut metadata = idp_metadata();
    let before = metadata.clone();

    env.mapper.update_metadata(&env.config, &mut metadata);

    assert_eq!(metadata, before);
    assert!(metadata.to_xml()?.contains("<md:IDPSSODescriptor"));
    Ok(())
}
