//! Password hashing - Argon2id with a per-call salt.
//!
//! `HashedPassword` is the stored PHC string; `CredentialHasher` is the seam
//! the auth service depends on, with `Argon2Hasher` as the production
//! implementation.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::HashingSettings;
use crate::errors::{AppError, AppResult};

/// A stored password hash (PHC string format).
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl HashedPassword {
    /// Wrap an existing hash (from database).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

/// One-way secret hashing and verification.
pub trait CredentialHasher: Send + Sync {
    /// Hash a secret with a fresh salt.
    fn hash(&self, plain_text: &str) -> AppResult<HashedPassword>;

    /// Check a secret against a stored hash. A malformed hash never matches.
    fn verify(&self, plain_text: &str, hash: &HashedPassword) -> bool;

    /// Do the work of a verification that can never succeed.
    ///
    /// Used when the account does not exist so that response timing does not
    /// reveal which emails are registered.
    fn verify_decoy(&self, _plain_text: &str) -> bool {
        false
    }
}

/// Argon2id hasher with configurable cost.
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    decoy: HashedPassword,
}

impl Argon2Hasher {
    /// Build a hasher from cost settings.
    pub fn new(settings: HashingSettings) -> AppResult<Self> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| AppError::internal(format!("Invalid Argon2 parameters: {}", e)))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = Self::hash_with(&argon2, "decoy-password-never-matches")?;

        Ok(Self { argon2, decoy })
    }

    fn hash_with(argon2: &Argon2<'_>, plain_text: &str) -> AppResult<HashedPassword> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(HashedPassword::from_hash(hash.to_string()))
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> AppResult<HashedPassword> {
        Self::hash_with(&self.argon2, plain_text)
    }

    fn verify(&self, plain_text: &str, hash: &HashedPassword) -> bool {
        let parsed = match PasswordHash::new(hash.as_str()) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };
        // Parameters come from the PHC string, so hashes made with older
        // cost settings still verify.
        self.argon2
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }

    fn verify_decoy(&self, plain_text: &str) -> bool {
        let _ = self.verify(plain_text, &self.decoy);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(HashingSettings {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hasher = hasher();
        let plain = "SecurePassword123!";
        let hash = hasher.hash(plain).unwrap();

        assert!(hasher.verify(plain, &hash));
        assert!(!hasher.verify("WrongPassword123", &hash));
    }

    #[test]
    fn test_password_from_hash() {
        let hasher = hasher();
        let plain = "TestPassword123";
        let stored = hasher.hash(plain).unwrap().into_string();

        let restored = HashedPassword::from_hash(stored);
        assert!(hasher.verify(plain, &restored));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = hasher();
        let plain = "SamePassword123";
        let first = hasher.hash(plain).unwrap();
        let second = hasher.hash(plain).unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(hasher.verify(plain, &first));
        assert!(hasher.verify(plain, &second));
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hash = hasher().hash("Pw123!").unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!hash.as_str().contains("Pw123!"));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        let hasher = hasher();
        assert!(!hasher.verify("anything", &HashedPassword::from_hash("not-a-hash")));
        assert!(!hasher.verify("anything", &HashedPassword::from_hash("")));
    }

    #[test]
    fn test_hash_from_other_cost_still_verifies() {
        let cheap = hasher();
        let hash = cheap.hash("Pw123!").unwrap();

        let other = Argon2Hasher::new(HashingSettings {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(other.verify("Pw123!", &hash));
    }

    #[test]
    fn test_decoy_never_matches() {
        let hasher = hasher();
        assert!(!hasher.verify_decoy("decoy-password-never-matches"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = Argon2Hasher::new(HashingSettings {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_hash() {
        let hash = HashedPassword::from_hash("$argon2id$secret");
        assert!(!format!("{:?}", hash).contains("secret"));
    }
}
