//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! Paginated envelopes are generic in the `pagination` crate, so each listing
//! gets a concrete schema here.

use utoipa::ToSchema;

use crate::inbound::http::projections::{RecipeResponse, SubscriptionResponse, UserResponse};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The resource does not support the requested method.
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A required dependency is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "recipe must list at least one ingredient")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "01HZY8B2W6X5Y7Z9ABCD1234")]
    trace_id: Option<String>,
    /// Field-level detail such as `{"field": "name", "code": "invalid"}`.
    details: Option<serde_json::Value>,
}

/// Page of user profiles.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPageSchema {
    /// Total matching users.
    count: u64,
    /// Absolute URL of the next page.
    next: Option<String>,
    /// Absolute URL of the previous page.
    previous: Option<String>,
    results: Vec<UserResponse>,
}

/// Page of recipes.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecipePageSchema {
    /// Total matching recipes.
    count: u64,
    /// Absolute URL of the next page.
    next: Option<String>,
    /// Absolute URL of the previous page.
    previous: Option<String>,
    results: Vec<RecipeResponse>,
}

/// Page of followed authors.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubscriptionPageSchema {
    /// Total followed authors.
    count: u64,
    /// Absolute URL of the next page.
    next: Option<String>,
    /// Absolute URL of the previous page.
    previous: Option<String>,
    results: Vec<SubscriptionResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_has_expected_name() {
        let schema_json = schema_to_json::<ErrorSchema>();
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("message"));
        assert!(schema_json.contains("trace_id"));
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("unauthorized")]
    #[case("forbidden")]
    #[case("not_found")]
    #[case("method_not_allowed")]
    #[case("conflict")]
    #[case("service_unavailable")]
    #[case("internal_error")]
    fn error_code_schema_lists_variant(#[case] code: &str) {
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        assert!(schema_json.contains(code), "missing {code}");
    }

    #[test]
    fn error_code_schema_matches_serialised_codes() {
        let serialised = serde_json::to_string(&crate::domain::ErrorCode::ServiceUnavailable)
            .expect("code serialises");
        assert_eq!(serialised, "\"service_unavailable\"");
    }

    #[test]
    fn page_schemas_carry_envelope_fields() {
        for schema_json in [
            schema_to_json::<UserPageSchema>(),
            schema_to_json::<RecipePageSchema>(),
            schema_to_json::<SubscriptionPageSchema>(),
        ] {
            for field in ["count", "next", "previous", "results"] {
                assert!(schema_json.contains(field), "missing {field}");
            }
        }
    }
}
