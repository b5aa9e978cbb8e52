//! Count envelope returned by paginated endpoints.

use serde::Serialize;
use url::Url;

use crate::PageRequest;

/// Paginated response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Absolute URL of the following page, if any.
    pub next: Option<String>,
    /// Absolute URL of the preceding page, if any.
    pub previous: Option<String>,
    /// Items in this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap one page of results, deriving navigation links from `base`.
    ///
    /// Query parameters other than `limit` and `offset` are preserved.
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, request: PageRequest, base: &Url) -> Self {
        Self {
            count,
            next: next_link(count, request, base),
            previous: previous_link(request, base),
            results,
        }
    }

    /// Transform every item while keeping the envelope.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn next_link(count: u64, request: PageRequest, base: &Url) -> Option<String> {
    let next_offset = request.offset().saturating_add(u64::from(request.limit()));
    if next_offset >= count {
        return None;
    }
    Some(with_window(base, request.limit(), Some(next_offset)))
}

fn previous_link(request: PageRequest, base: &Url) -> Option<String> {
    if request.offset() == 0 {
        return None;
    }
    let limit = u64::from(request.limit());
    if request.offset() <= limit {
        return Some(with_window(base, request.limit(), None));
    }
    Some(with_window(
        base,
        request.limit(),
        Some(request.offset() - limit),
    ))
}

fn with_window(base: &Url, limit: u32, offset: Option<u64>) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "limit" && key != "offset")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("limit", &limit.to_string());
        if let Some(offset) = offset {
            pairs.append_pair("offset", &offset.to_string());
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PageLimits;
    use rstest::{fixture, rstest};

    #[fixture]
    fn base() -> Url {
        Url::parse("http://testserver/api/users/").expect("valid url")
    }

    fn request(limit: u32, offset: u64) -> PageRequest {
        PageRequest::new(Some(limit), Some(offset), PageLimits::default())
    }

    #[rstest]
    fn first_page_has_no_previous(base: Url) {
        let page = Page::new(vec![1, 2], 5, request(2, 0), &base);
        assert!(page.previous.is_none());
        assert_eq!(
            page.next.as_deref(),
            Some("http://testserver/api/users/?limit=2&offset=2")
        );
    }

    #[rstest]
    fn last_page_has_no_next(base: Url) {
        let page = Page::new(vec![5], 5, request(2, 4), &base);
        assert!(page.next.is_none());
        assert_eq!(
            page.previous.as_deref(),
            Some("http://testserver/api/users/?limit=2&offset=2")
        );
    }

    #[rstest]
    fn previous_drops_offset_when_reaching_start(base: Url) {
        let page = Page::new(vec![2, 3], 5, request(2, 1), &base);
        assert_eq!(
            page.previous.as_deref(),
            Some("http://testserver/api/users/?limit=2")
        );
    }

    #[rstest]
    fn repeated_filters_are_preserved() {
        let base = Url::parse("http://testserver/api/recipes/?tags=a&tags=b&limit=1")
            .expect("valid url");
        let page = Page::new(vec![1], 3, request(1, 0), &base);
        assert_eq!(
            page.next.as_deref(),
            Some("http://testserver/api/recipes/?tags=a&tags=b&limit=1&offset=1")
        );
    }

    #[rstest]
    fn serialises_envelope(base: Url) {
        let page = Page::new(vec!["a"], 1, request(6, 0), &base).map(str::to_uppercase);
        let value = serde_json::to_value(&page).expect("serialise page");
        assert_eq!(
            value,
            serde_json::json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": ["A"],
            })
        );
    }
}
