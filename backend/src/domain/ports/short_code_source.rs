//! Port supplying candidate short codes.
use crate::domain::ShortCode;

/// Source of candidate codes. Uniqueness is checked by the caller.
#[cfg_attr(test, mockall::automock)]
pub trait ShortCodeSource: Send + Sync {
    fn next_code(&self) -> ShortCode;
}
