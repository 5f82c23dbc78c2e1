//! Salted password hashing and verification.
//!
//! # Responsibility
//! - Produce and check opaque `salt$digest` credential hashes.
//! - Generate random passwords for administrative reset flows.
//!
//! # Invariants
//! - The stored value is the only persisted credential material; the clear
//!   text password never leaves this module's call frame.
//! - Verification of a malformed stored value is an error, not a mismatch.

use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SALT_LEN: usize = 16;
const HASH_ITERATIONS: u32 = 10_000;

pub type PasswordResult<T> = Result<T, PasswordError>;

/// Failure modes of the credential verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The password does not match the stored hash.
    Mismatch,
    /// The stored value is not a valid `salt$digest` pair.
    MalformedHash,
}

impl Display for PasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch => write!(f, "invalid password"),
            Self::MalformedHash => write!(f, "stored password hash is malformed"),
        }
    }
}

impl Error for PasswordError {}

/// Hashes `password` with a fresh random salt.
///
/// Output format is `hex(salt)$hex(digest)` where the digest is an
/// iterated SHA-256 over salt and password.
pub fn salted_hash(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), hex::encode(digest(&salt, password)))
}

/// Verifies `password` against a stored `salt$digest` value.
///
/// # Errors
/// - `PasswordError::Mismatch` when the password is wrong.
/// - `PasswordError::MalformedHash` when the stored value cannot be parsed.
pub fn check(password: &str, stored: &str) -> PasswordResult<()> {
    let (salt_hex, digest_hex) = stored
        .split_once('$')
        .ok_or(PasswordError::MalformedHash)?;
    let salt = hex::decode(salt_hex).map_err(|_| PasswordError::MalformedHash)?;
    let expected = hex::decode(digest_hex).map_err(|_| PasswordError::MalformedHash)?;
    if salt.len() != SALT_LEN || expected.is_empty() {
        return Err(PasswordError::MalformedHash);
    }

    if digest(&salt, password) == expected {
        Ok(())
    } else {
        Err(PasswordError::Mismatch)
    }
}

/// Generates a random alphanumeric password of the requested length.
pub fn generate_random_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut value = hasher.finalize();

    for _ in 1..HASH_ITERATIONS {
        let mut round = Sha256::new();
        round.update(value);
        value = round.finalize();
    }

    value.to_vec()
}
