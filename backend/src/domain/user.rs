//! User accounts and profile projections.

use std::fmt;

use super::ids::UserId;
use super::image::StoredImage;

/// Maximum e-mail length in characters.
pub const EMAIL_MAX: usize = 254;
/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;
/// Maximum first/last name length in characters.
pub const PERSON_NAME_MAX: usize = 128;

/// Validation errors for account fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    ReservedUsername,
    EmptyName { field: &'static str },
    NameTooLong { field: &'static str, max: usize },
}

impl UserValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::EmptyUsername
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters
            | Self::ReservedUsername => "username",
            Self::EmptyName { field } | Self::NameTooLong { field, .. } => field,
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, digits, and the characters . @ + - _",
            ),
            Self::ReservedUsername => write!(f, "username 'me' is reserved"),
            Self::EmptyName { field } => write!(f, "{field} must not be empty"),
            Self::NameTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Validated e-mail address used as the login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and construct an address. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if value.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let Some((local, domain)) = value.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let domain_ok = !domain.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.');
        if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated public handle matching `^[\w.@+-]+$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if value.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !value.chars().all(is_username_char) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        if value.eq_ignore_ascii_case("me") {
            return Err(UserValidationError::ReservedUsername);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')
}

/// Validated first or last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name for the request field `field`.
    pub fn new(field: &'static str, raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyName { field });
        }
        if value.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A registered account as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<StoredImage>,
    pub is_superuser: bool,
}

/// A user as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    /// Whether the viewer follows this user; always `false` for anonymous
    /// viewers and for the viewer's own profile.
    pub is_subscribed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cook@example.com", true)]
    #[case("  cook@example.com ", true)]
    #[case("", false)]
    #[case("no-at-sign", false)]
    #[case("@example.com", false)]
    #[case("cook@localhost", false)]
    #[case("two@@example.com", false)]
    #[case("spaced out@example.com", false)]
    fn email_validation(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Email::new(raw).is_ok(), valid, "{raw}");
    }

    #[rstest]
    #[case("chef.anna", true)]
    #[case("повар_1", true)]
    #[case("a+b@c-d", true)]
    #[case("with space", false)]
    #[case("semi;colon", false)]
    #[case("me", false)]
    #[case("ME", false)]
    fn username_validation(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Username::new(raw).is_ok(), valid, "{raw}");
    }

    #[rstest]
    fn username_length_is_bounded() {
        let err = Username::new("x".repeat(USERNAME_MAX + 1)).expect_err("too long");
        assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        assert_eq!(err.field(), "username");
    }

    #[rstest]
    fn names_report_their_field() {
        let err = PersonName::new("last_name", "   ").expect_err("blank");
        assert_eq!(err.field(), "last_name");
        assert_eq!(err.to_string(), "last_name must not be empty");
    }
}
