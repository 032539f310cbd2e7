//! # kc-model
//!
//! Domain models for Keycloak Rust.
//!
//! This crate defines the user entity that identity brokering writes
//! imported attributes into.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod user;

pub use user::{User, UserAttributeStore};
