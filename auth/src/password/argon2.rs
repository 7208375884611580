use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Plaintext hashed once at construction so that lookups for unknown accounts
/// can spend the same verification work as lookups for known ones.
const DECOY_PLAINTEXT: &str = "decoy-password-for-timing-equalization";

/// Argon2id work factor.
///
/// The parameters are embedded in every PHC digest, so raising the cost only
/// affects new hashes; digests produced under an older cost stay verifiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingCost {
    /// Memory size in KiB.
    pub memory_kib: u32,
    /// Number of passes over memory.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl HashingCost {
    /// Smallest cost Argon2 accepts. Only meant for tests.
    pub const MINIMUM: Self = Self {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };

    fn to_params(self) -> Result<Params, PasswordError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordError::InvalidCost(e.to_string()))
    }
}

impl Default for HashingCost {
    /// OWASP baseline for Argon2id (19 MiB, 2 passes, 1 lane).
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Password hashing implementation.
///
/// Provides salted, adaptive-cost password hashing (internally uses Argon2id).
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    cost: HashingCost,
    decoy_hash: String,
}

impl PasswordHasher {
    /// Create a new password hasher with the given work factor.
    ///
    /// # Arguments
    /// * `cost` - Argon2id parameters used for new digests
    ///
    /// # Returns
    /// PasswordHasher instance with a precomputed decoy digest
    ///
    /// # Errors
    /// * `InvalidCost` - Parameters rejected by Argon2
    /// * `HashingFailed` - Decoy digest could not be computed
    pub fn new(cost: HashingCost) -> Result<Self, PasswordError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, cost.to_params()?);
        let decoy_hash = Self::hash_with(&argon2, DECOY_PLAINTEXT)?;

        Ok(Self {
            argon2,
            cost,
            decoy_hash,
        })
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed (not retryable)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Self::hash_with(&self.argon2, password)
    }

    /// Verify a password against a stored hash.
    ///
    /// Parameters are read back from the digest itself, so hashes created with
    /// a different cost are verified correctly.
    ///
    /// # Returns
    /// True if password matches; false on mismatch or unparseable digest
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed_hash) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Run a full verification against the decoy digest and discard the result.
    ///
    /// Callers use this when no stored digest exists for the requested account,
    /// so that response latency does not reveal whether the account exists.
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, &self.decoy_hash);
    }

    /// Work factor applied to new digests.
    pub fn cost(&self) -> HashingCost {
        self.cost
    }

    fn hash_with(argon2: &Argon2<'static>, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}
