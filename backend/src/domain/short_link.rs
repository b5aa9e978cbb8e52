//! Short recipe links of the form `/s/{code}/`.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;

use super::ports::ShortCodeSource;

/// Number of characters in a generated code.
pub const SHORT_CODE_LENGTH: usize = 6;

/// Default number of attempts before giving up on a collision-free code.
pub const DEFAULT_SHORT_CODE_ATTEMPTS: u32 = 8;

/// Fixed-length alphanumeric token identifying a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

impl ShortCode {
    /// Parse a code taken from a request path.
    ///
    /// Returns `None` unless the value is exactly [`SHORT_CODE_LENGTH`] ASCII
    /// letters or digits.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::ShortCode;
    ///
    /// assert!(ShortCode::parse("a1B2c3").is_some());
    /// assert!(ShortCode::parse("a1-2c3").is_none());
    /// assert!(ShortCode::parse("abc").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let valid =
            raw.len() == SHORT_CODE_LENGTH && raw.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| Self(raw.to_owned()))
    }

    /// Wrap a code loaded from storage without re-validating it.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path component served by the redirect endpoint.
    pub fn path(&self) -> String {
        format!("/s/{}/", self.0)
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Thread-local RNG backed [`ShortCodeSource`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomShortCodes;

impl ShortCodeSource for RandomShortCodes {
    fn next_code(&self) -> ShortCode {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SHORT_CODE_LENGTH)
            .map(char::from)
            .collect();
        ShortCode(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_codes_are_well_formed() {
        for _ in 0..32 {
            let code = RandomShortCodes.next_code();
            assert!(ShortCode::parse(code.as_str()).is_some(), "{code}");
        }
    }

    #[test]
    fn path_wraps_code() {
        let code = ShortCode::parse("Ab12Cd").expect("valid code");
        assert_eq!(code.path(), "/s/Ab12Cd/");
    }
}
