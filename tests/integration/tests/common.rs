//! Common test utilities and fixtures.

use kc_broker::{
    BrokeredIdentityContext, EduPersonTargetedIdMapper, IdentityProviderMapper, MapperConfig,
};
use kc_model::User;
use kc_protocol_saml::{
    Assertion, Attribute, AttributeConsumingService, AttributeStatement, EntityDescriptor,
    IdpSsoDescriptor, IndexedEndpoint, NameId, RoleDescriptor, SamlBinding, SpSsoDescriptor,
    Subject,
};
use uuid::Uuid;

/// Alias of the SAML identity provider used in the tests.
pub const IDP_ALIAS: &str = "saml-idp";

/// Entity ID of the identity provider.
pub const IDP_ENTITY_ID: &str = "https://idp.example.org/idp/shibboleth";

/// Entity ID of the broker acting as SP.
pub const SP_ENTITY_ID: &str = "https://keycloak.example.com/realms/test";

/// Formal name of `eduPersonTargetedID`.
pub const EPTID: &str = "urn:oid:1.3.6.1.4.1.5923.1.1.1.10";

/// Test environment holding a mapper with its default configuration.
pub struct TestEnv {
    /// The mapper under test.
    pub mapper: EduPersonTargetedIdMapper,
    /// Its configuration.
    pub config: MapperConfig,
}

impl TestEnv {
    /// Creates a new test environment.
    pub fn new() -> anyhow::Result<Self> {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("kc_broker=debug")
            .with_test_writer()
            .try_init();

        let mapper = EduPersonTargetedIdMapper::new();
        let config = mapper.default_config(IDP_ALIAS);
        mapper.validate_config(&config)?;

        Ok(Self { mapper, config })
    }

    /// Creates a local user in a fresh realm.
    pub fn user(&self, username: &str) -> User {
        User::new(Uuid::now_v7(), username)
    }
}

/// Builds the assertion an IdP sends for `subject`, with the given
/// attributes in one attribute statement.
pub fn assertion(subject: &str, attributes: Vec<Attribute>) -> Assertion {
    let statement = attributes
        .into_iter()
        .fold(AttributeStatement::new(), AttributeStatement::with_attribute);
    Assertion::new(IDP_ENTITY_ID)
        .with_subject(Subject::new(NameId::transient(subject)))
        .with_attribute_statement(statement)
}

/// Wraps an assertion in a brokered identity context.
pub fn login_context(assertion: Assertion) -> BrokeredIdentityContext {
    BrokeredIdentityContext::new("idp-user-1", IDP_ALIAS)
        .with_username("jdoe")
        .with_saml_assertion(assertion)
}

/// The targeted ID an IdP releases for the broker.
pub fn targeted_id(value: &str) -> NameId {
    NameId::persistent(value)
        .with_name_qualifier(IDP_ENTITY_ID)
        .with_sp_name_qualifier(SP_ENTITY_ID)
}

/// SP metadata as the broker publishes it before mappers run.
pub fn sp_metadata() -> EntityDescriptor {
    EntityDescriptor::new(SP_ENTITY_ID).with_descriptor(RoleDescriptor::ServiceProvider(
        SpSsoDescriptor::new()
            .with_assertion_consumer_service(IndexedEndpoint::new(
                SamlBinding::HttpPost,
                format!("{SP_ENTITY_ID}/broker/{IDP_ALIAS}/endpoint"),
                1,
            ))
            .with_attribute_consuming_service(
                AttributeConsumingService::new(0).with_service_name("en", "Keycloak"),
            ),
    ))
}

/// Metadata with an IdP role only.
pub fn idp_metadata() -> EntityDescriptor {
    EntityDescriptor::new(IDP_ENTITY_ID)
        .with_descriptor(RoleDescriptor::IdentityProvider(IdpSsoDescriptor::new()))
}
