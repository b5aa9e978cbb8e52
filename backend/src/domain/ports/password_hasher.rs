//! Port for one-way password hashing.
use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHashError {
        /// The hasher could not produce a hash.
        Hashing { message: String } => InternalError: "password hashing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// `false` for a mismatch or an unparseable stored hash.
    fn verify(&self, candidate: &str, hash: &PasswordHash) -> bool;
}
