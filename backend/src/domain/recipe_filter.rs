//! Recipe list filtering.
//!
//! Criteria combine with AND; repeated tag slugs combine with OR. The
//! viewer-relative flags only apply when the request is authenticated.

use super::auth::Principal;
use super::ids::UserId;

/// Raw filter values taken from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilterQuery {
    pub author: Option<UserId>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Resolved filter handed to the recipe repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

impl RecipeFilter {
    /// Resolve query values for `viewer`.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{RecipeFilter, RecipeFilterQuery};
    ///
    /// let query = RecipeFilterQuery { is_favorited: true, ..Default::default() };
    /// // Anonymous viewers cannot filter by their favorites.
    /// assert_eq!(RecipeFilter::resolve(query, None).favorited_by, None);
    /// ```
    pub fn resolve(query: RecipeFilterQuery, viewer: Option<&Principal>) -> Self {
        let viewer_id = viewer.map(|principal| principal.id);
        let mut tag_slugs: Vec<String> = query
            .tags
            .into_iter()
            .map(|slug| slug.trim().to_owned())
            .filter(|slug| !slug.is_empty())
            .collect();
        tag_slugs.sort();
        tag_slugs.dedup();
        Self {
            author: query.author,
            tag_slugs,
            favorited_by: viewer_id.filter(|_| query.is_favorited),
            in_cart_of: viewer_id.filter(|_| query.is_in_shopping_cart),
        }
    }
}

/// Interpret a query flag; `1` and `true` enable it.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| {
        let value = value.trim();
        value == "1" || value.eq_ignore_ascii_case("true")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, false)]
    #[case(Some("1"), true)]
    #[case(Some("true"), true)]
    #[case(Some("True"), true)]
    #[case(Some("0"), false)]
    #[case(Some("yes"), false)]
    fn flags(#[case] raw: Option<&str>, #[case] expected: bool) {
        assert_eq!(parse_flag(raw), expected);
    }

    #[rstest]
    fn viewer_flags_bind_to_the_viewer() {
        let viewer = Principal::user(UserId::new(9));
        let query = RecipeFilterQuery {
            is_favorited: true,
            is_in_shopping_cart: true,
            ..RecipeFilterQuery::default()
        };
        let filter = RecipeFilter::resolve(query, Some(&viewer));
        assert_eq!(filter.favorited_by, Some(UserId::new(9)));
        assert_eq!(filter.in_cart_of, Some(UserId::new(9)));
    }

    #[rstest]
    fn flags_are_ignored_for_anonymous_viewers() {
        let query = RecipeFilterQuery {
            is_favorited: true,
            is_in_shopping_cart: true,
            ..RecipeFilterQuery::default()
        };
        let filter = RecipeFilter::resolve(query, None);
        assert_eq!(filter, RecipeFilter::default());
    }

    #[rstest]
    fn tag_slugs_are_normalised() {
        let query = RecipeFilterQuery {
            tags: vec!["lunch".into(), " breakfast ".into(), "lunch".into(), String::new()],
            ..RecipeFilterQuery::default()
        };
        let filter = RecipeFilter::resolve(query, None);
        assert_eq!(filter.tag_slugs, vec!["breakfast".to_owned(), "lunch".to_owned()]);
    }
}
