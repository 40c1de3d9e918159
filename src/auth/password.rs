//! Credential Verifier
//! Mission: Check plaintext passwords against bcrypt hashes without leaking which part failed

use crate::auth::{error::AuthError, models::CredentialRecord};
use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use tracing::debug;

/// Hashed once at construction; verified against when the username is unknown.
const DUMMY_PASSWORD: &str = "nanotox-unknown-user";

/// Lowest and highest work factors bcrypt accepts
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt only reads this many bytes of input; longer passwords are refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Stateless bcrypt verifier with a fixed work factor
pub struct CredentialVerifier {
    cost: u32,
    dummy_hash: String,
}

impl CredentialVerifier {
    /// Create a verifier hashing at `cost`
    pub fn new(cost: u32) -> Result<Self> {
        check_cost(cost)?;
        let dummy_hash = hash(DUMMY_PASSWORD, cost).context("Failed to hash dummy password")?;
        Ok(Self { cost, dummy_hash })
    }

    /// Re-hash the unknown-user dummy at `cost`, typically the cost most
    /// stored records were hashed with. New hashes still use [`Self::cost`].
    pub fn with_dummy_cost(mut self, cost: u32) -> Result<Self> {
        check_cost(cost)?;
        if hash_cost(&self.dummy_hash) != Some(cost) {
            self.dummy_hash =
                hash(DUMMY_PASSWORD, cost).context("Failed to hash dummy password")?;
        }
        Ok(self)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn dummy_cost(&self) -> Option<u32> {
        hash_cost(&self.dummy_hash)
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash_password(&self, plaintext: impl AsRef<[u8]>) -> Result<String, AuthError> {
        let plaintext = plaintext.as_ref();
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Internal(format!(
                "password longer than {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        hash(plaintext, self.cost).map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// True iff the password matches the record and the record is enabled.
    pub fn verify(&self, plaintext: impl AsRef<[u8]>, record: &CredentialRecord) -> bool {
        // Hash first so disabled accounts cost the same as enabled ones.
        let matches = verify_password(plaintext, &record.password_hash);
        matches && !record.disabled
    }

    /// Verify against an optional record. A missing record still burns one
    /// bcrypt round against the dummy hash. Records hashed at a cost other
    /// than [`Self::dummy_cost`] still differ in timing from unknown users.
    pub fn authenticate(
        &self,
        plaintext: impl AsRef<[u8]>,
        record: Option<&CredentialRecord>,
    ) -> bool {
        match record {
            Some(record) => self.verify(plaintext, record),
            None => {
                let _ = verify_password(plaintext, &self.dummy_hash);
                false
            }
        }
    }
}

fn check_cost(cost: u32) -> Result<()> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        anyhow::bail!("bcrypt cost {} outside {}..={}", cost, MIN_COST, MAX_COST);
    }
    Ok(())
}

/// Work factor encoded in a `$2b$NN$...` hash
pub fn hash_cost(stored_hash: &str) -> Option<u32> {
    let mut parts = stored_hash.split('$');
    let (Some(""), Some(version), Some(cost)) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    if !version.starts_with('2') || cost.len() != 2 {
        return None;
    }
    cost.parse().ok()
}

/// Compare a plaintext against a stored bcrypt hash. Malformed hashes and
/// passwords past bcrypt's input limit never match.
pub fn verify_password(plaintext: impl AsRef<[u8]>, stored_hash: &str) -> bool {
    let plaintext = plaintext.as_ref();
    if plaintext.len() > MAX_PASSWORD_BYTES {
        debug!("Password exceeds {} bytes; rejecting", MAX_PASSWORD_BYTES);
        return false;
    }
    match verify(plaintext, stored_hash) {
        Ok(valid) => valid,
        Err(e) => {
            debug!(error = %e, "Stored password hash is not valid bcrypt");
            false
        }
    }
}
