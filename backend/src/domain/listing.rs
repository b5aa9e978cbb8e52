//! A page of rows together with the total number of matches.

/// Rows of one page plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counted<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Counted<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Transform every row while keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Counted<U> {
        Counted {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

impl<T> Default for Counted<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}
