//! One-way password hashing for password attributes

use thiserror::Error;

use crate::config::HasherConfig;

#[cfg(feature = "argon2")]
use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
#[cfg(feature = "argon2")]
use rand::thread_rng;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashingError {
    #[error("Unknown password hashing algorithm: {0} (or feature not enabled)")]
    UnknownAlgorithm(String),

    #[error("Password hashing failed: {0}")]
    Backend(String),
}

pub type HashingResult<T> = Result<T, HashingError>;

/// Hash primitive used for password attributes
pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> HashingResult<String>;

    fn verify_password(&self, password: &str, hash: &str) -> HashingResult<bool>;

    fn hasher_name(&self) -> &str;
}

/// Argon2id hasher
#[cfg(feature = "argon2")]
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

#[cfg(feature = "argon2")]
impl Argon2Hasher {
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// Cheap parameters for tests and local development
    pub fn development() -> Self {
        Self::new(4096, 2, 2)
    }

    fn engine(&self) -> HashingResult<Argon2<'static>> {
        let params = argon2::Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| HashingError::Backend(e.to_string()))?;
        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }
}

#[cfg(feature = "argon2")]
impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new(65536, 3, 4)
    }
}

#[cfg(feature = "argon2")]
impl PasswordHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> HashingResult<String> {
        let salt = SaltString::generate(&mut thread_rng());
        let hash = self
            .engine()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashingError::Backend(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> HashingResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| HashingError::Backend(e.to_string()))?;
        Ok(self.engine()?.verify_password(password.as_bytes(), &parsed).is_ok())
    }

    fn hasher_name(&self) -> &str {
        "argon2"
    }
}

/// bcrypt hasher
#[cfg(feature = "bcrypt")]
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

#[cfg(feature = "bcrypt")]
impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

#[cfg(feature = "bcrypt")]
impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(feature = "bcrypt")]
impl PasswordHasher for BcryptHasher {
    fn hash_password(&self, password: &str) -> HashingResult<String> {
        bcrypt::hash(password, self.cost).map_err(|e| HashingError::Backend(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> HashingResult<bool> {
        bcrypt::verify(password, hash).map_err(|e| HashingError::Backend(e.to_string()))
    }

    fn hasher_name(&self) -> &str {
        "bcrypt"
    }
}

pub struct PasswordHasherFactory;

impl PasswordHasherFactory {
    /// Build the hasher a `HasherConfig` selects
    pub fn from_config(config: &HasherConfig) -> HashingResult<Box<dyn PasswordHasher>> {
        match config.algorithm.as_str() {
            #[cfg(feature = "argon2")]
            "argon2" => Ok(Box::new(Argon2Hasher::new(
                config.memory_cost,
                config.time_cost,
                config.parallelism,
            ))),
            #[cfg(feature = "bcrypt")]
            "bcrypt" => Ok(Box::new(BcryptHasher::new(config.cost))),
            other => Err(HashingError::UnknownAlgorithm(other.to_string())),
        }
    }
}
