//! End-to-End Integration Tests
//!
//! These tests drive the identity brokering mappers through a SAML login
//! and an SP metadata publish, the way the broker endpoint invokes them.

mod common;
mod edu_person_mapper;
