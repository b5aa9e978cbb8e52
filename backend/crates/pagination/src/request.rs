//! Page request parsing.

/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 6;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Default and maximum page sizes for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_limit: u32,
    max_limit: u32,
}

impl PageLimits {
    /// Build limits, raising `max_limit` to `default_limit` when smaller and
    /// treating zero as one.
    #[must_use]
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        let default_limit = default_limit.max(1);
        Self {
            default_limit,
            max_limit: max_limit.max(default_limit),
        }
    }

    /// Page size applied when the client omits `limit`.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Upper bound applied to client supplied limits.
    #[must_use]
    pub const fn max_limit(&self) -> u32 {
        self.max_limit
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, MAX_LIMIT)
    }
}

/// A validated window into an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    /// Build a request from already parsed values.
    #[must_use]
    pub fn new(limit: Option<u32>, offset: Option<u64>, limits: PageLimits) -> Self {
        let limit = match limit {
            Some(0) | None => limits.default_limit,
            Some(value) => value.min(limits.max_limit),
        };
        Self {
            limit,
            offset: offset.unwrap_or(0),
        }
    }

    /// Build a request from raw query string values.
    ///
    /// Values that do not parse as non-negative integers are ignored.
    #[must_use]
    pub fn from_query(limit: Option<&str>, offset: Option<&str>, limits: PageLimits) -> Self {
        let limit = limit.and_then(|raw| raw.trim().parse::<u32>().ok());
        let offset = offset.and_then(|raw| raw.trim().parse::<u64>().ok());
        Self::new(limit, offset, limits)
    }

    /// Number of items in the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for PageRequest {
    /// First page using [`PageLimits::default`].
    fn default() -> Self {
        Self::new(None, None, PageLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, DEFAULT_LIMIT)]
    #[case(Some("0"), DEFAULT_LIMIT)]
    #[case(Some("abc"), DEFAULT_LIMIT)]
    #[case(Some("-3"), DEFAULT_LIMIT)]
    #[case(Some("10"), 10)]
    #[case(Some("1000"), MAX_LIMIT)]
    fn limit_is_lenient(#[case] raw: Option<&str>, #[case] expected: u32) {
        let request = PageRequest::from_query(raw, None, PageLimits::default());
        assert_eq!(request.limit(), expected);
    }

    #[rstest]
    #[case(None, 0)]
    #[case(Some("x"), 0)]
    #[case(Some("12"), 12)]
    fn offset_is_lenient(#[case] raw: Option<&str>, #[case] expected: u64) {
        let request = PageRequest::from_query(None, raw, PageLimits::default());
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    fn limits_never_invert() {
        let limits = PageLimits::new(20, 5);
        assert_eq!(limits.default_limit(), 20);
        assert_eq!(limits.max_limit(), 20);
    }
}
