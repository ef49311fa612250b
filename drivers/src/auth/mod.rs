//! Credential primitives.
//!
//! - [`password`]: Argon2id hashing and verification of driver passwords
//! - [`session`]: JWT session tokens issued on successful authentication

pub mod password;
pub mod session;
