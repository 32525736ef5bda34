use crate::error::Result;

/// Password hashing and verification, kept behind a trait so the Argon2
/// implementation can be swapped for a test double that skips the real
/// (deliberately slow) KDF.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}
