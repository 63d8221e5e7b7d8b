//! Password hashing and verification (bcrypt).

use bcrypt::BcryptError;

/// Fixed work factor, matching the 10 salt rounds the clinic's user
/// records were created with.
const COST: u32 = 10;

/// Hash a plaintext password with a fresh random salt.
pub fn hash(plaintext: &str) -> Result<String, BcryptError> {
    bcrypt::hash(plaintext, COST)
}

/// Verify a plaintext password against a stored bcrypt hash.
pub fn verify(plaintext: &str, hashed: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(plaintext, hashed)
}
