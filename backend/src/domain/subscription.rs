//! Author subscriptions.

use super::recipe::RecipeSummary;
use super::user::UserProfile;

/// A followed author together with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSubscription {
    pub author: UserProfile,
    /// Newest first, truncated to the requested limit.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author.
    pub recipes_count: u64,
}

/// Optional cap on the number of recipes embedded per author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipesLimit(Option<u32>);

impl RecipesLimit {
    /// No cap.
    pub const UNLIMITED: Self = Self(None);

    /// Parse the `recipes_limit` query value. Non-numeric values mean no cap.
    pub fn from_query(raw: Option<&str>) -> Self {
        Self(raw.and_then(|value| value.trim().parse::<u32>().ok()))
    }

    pub fn get(self) -> Option<u32> {
        self.0
    }
}

impl From<Option<u32>> for RecipesLimit {
    fn from(value: Option<u32>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some("3"), Some(3))]
    #[case(Some("0"), Some(0))]
    #[case(Some("many"), None)]
    fn recipes_limit_parsing(#[case] raw: Option<&str>, #[case] expected: Option<u32>) {
        assert_eq!(RecipesLimit::from_query(raw).get(), expected);
    }
}
