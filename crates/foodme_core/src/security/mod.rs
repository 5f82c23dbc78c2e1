//! Credential primitives used by the account store.
//!
//! # Responsibility
//! - Keep password hashing and verification behind one stateless module.
//! - Keep stores free of any crypto detail beyond "verification passed".

pub mod password;
