//! Credential handling.

pub mod credentials;

pub use credentials::{api_key_from_env, SecretString};
