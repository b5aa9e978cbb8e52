//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors report typed validation failures; these helpers turn
//! them into `400 Bad Request` payloads whose `details` name the offending
//! request field.

use serde_json::json;

use crate::domain::{
    CatalogueValidationError, CredentialsValidationError, Error, ImageValidationError,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
    InvalidImage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid",
            ErrorCode::InvalidImage => "invalid_image",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

/// Unwrap an optional payload field or report it as missing.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn user_field_error(err: &UserValidationError) -> Error {
    field_error(err.field(), ErrorCode::InvalidValue, err.to_string())
}

pub(crate) fn credentials_error(err: &CredentialsValidationError, password: FieldName) -> Error {
    match err {
        CredentialsValidationError::Email(inner) => user_field_error(inner),
        other => field_error(password.as_str(), ErrorCode::InvalidValue, other.to_string()),
    }
}

pub(crate) fn catalogue_field_error(err: &CatalogueValidationError) -> Error {
    field_error(err.field(), ErrorCode::InvalidValue, err.to_string())
}

pub(crate) fn image_error(field: FieldName, err: &ImageValidationError) -> Error {
    field_error(field.as_str(), ErrorCode::InvalidImage, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, Username};
    use rstest::rstest;

    fn details(err: &Error) -> (&str, &str) {
        let details = err.details().expect("details present");
        (
            details.get("field").and_then(|v| v.as_str()).expect("field"),
            details.get("code").and_then(|v| v.as_str()).expect("code"),
        )
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = required::<String>(None, FieldName::new("email")).expect_err("missing");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(details(&err), ("email", "missing_field"));
    }

    #[rstest]
    fn present_fields_pass_through() {
        let value = required(Some(5), FieldName::new("amount")).expect("present");
        assert_eq!(value, 5);
    }

    #[rstest]
    fn username_errors_point_at_username() {
        let err = Username::new("me").expect_err("reserved");
        let mapped = user_field_error(&err);
        assert_eq!(details(&mapped), ("username", "invalid"));
    }

    #[rstest]
    #[case(CredentialsValidationError::EmptyPassword, "new_password")]
    #[case(
        CredentialsValidationError::Email(UserValidationError::InvalidEmail),
        "email"
    )]
    fn credential_errors_point_at_the_right_field(
        #[case] err: CredentialsValidationError,
        #[case] field: &str,
    ) {
        let mapped = credentials_error(&err, FieldName::new("new_password"));
        assert_eq!(details(&mapped).0, field);
    }

    #[rstest]
    fn image_errors_carry_their_own_code() {
        let mapped = image_error(FieldName::new("avatar"), &ImageValidationError::Empty);
        assert_eq!(details(&mapped), ("avatar", "invalid_image"));
    }
}
