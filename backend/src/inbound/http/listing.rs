//! Limit/offset query parameters and page envelopes for list endpoints.

use actix_web::HttpRequest;
use pagination::{Page, PageLimits, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::Counted;

/// `limit`/`offset` query parameters.
///
/// Kept as raw strings so malformed values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page size, capped by the server maximum.
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
    /// Number of items to skip.
    #[param(value_type = Option<u64>)]
    pub offset: Option<String>,
}

impl PageParams {
    pub fn request(&self, limits: PageLimits) -> PageRequest {
        PageRequest::from_query(self.limit.as_deref(), self.offset.as_deref(), limits)
    }
}

/// Wrap a counted slice in the `{count, next, previous, results}` envelope.
///
/// Links are built from the request URL so other query parameters survive.
pub fn page_of<T, U>(
    req: &HttpRequest,
    counted: Counted<T>,
    request: PageRequest,
    project: impl FnMut(T) -> U,
) -> Page<U> {
    let Counted { items, total } = counted;
    let results = items.into_iter().map(project).collect();
    Page::new(results, total, request, &req.full_url())
}
