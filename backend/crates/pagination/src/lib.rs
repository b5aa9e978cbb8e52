//! Limit/offset pagination primitives shared by Foodgram list endpoints.
//!
//! A [`PageRequest`] is parsed leniently from `limit`/`offset` query values:
//! malformed or zero limits fall back to the configured default and oversized
//! limits are clamped to the maximum. A [`Page`] is the JSON envelope
//! `{count, next, previous, results}` whose links are derived from the
//! request URL.
//!
//! # Example
//!
//! ```
//! use pagination::{Page, PageLimits, PageRequest};
//! use url::Url;
//!
//! let request = PageRequest::from_query(Some("2"), Some("2"), PageLimits::default());
//! let base = Url::parse("http://localhost/api/recipes/?tags=lunch").expect("valid url");
//! let page = Page::new(vec!["c", "d"], 5, request, &base);
//!
//! assert_eq!(page.count, 5);
//! assert_eq!(
//!     page.next.as_deref(),
//!     Some("http://localhost/api/recipes/?tags=lunch&limit=2&offset=4")
//! );
//! assert_eq!(
//!     page.previous.as_deref(),
//!     Some("http://localhost/api/recipes/?tags=lunch&limit=2")
//! );
//! ```

mod envelope;
mod request;

pub use envelope::Page;
pub use request::{DEFAULT_LIMIT, MAX_LIMIT, PageLimits, PageRequest};
