//! Field limits mirroring the catalogue tables.

/// Maximum tag name length in characters.
pub const TAG_NAME_MAX: usize = 32;

/// Maximum tag slug length in characters.
pub const TAG_SLUG_MAX: usize = 32;

/// Maximum ingredient name length in characters.
pub const INGREDIENT_NAME_MAX: usize = 128;

/// Maximum measurement unit length in characters.
pub const MEASUREMENT_UNIT_MAX: usize = 64;

/// Returns `true` when `slug` matches `^[-a-zA-Z0-9_]+$` and fits the column.
///
/// # Examples
///
/// ```
/// use catalogue_data::is_valid_slug;
///
/// assert!(is_valid_slug("quick-dinner_2"));
/// assert!(!is_valid_slug("with space"));
/// assert!(!is_valid_slug(""));
/// ```
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.chars().count() <= TAG_SLUG_MAX
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Check a trimmed text field against a maximum length.
pub(crate) fn check_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} must not be blank"));
    }
    if value.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("breakfast", true)]
    #[case("Late_Night-1", true)]
    #[case("тег", false)]
    #[case("a/b", false)]
    #[case("abcdefghijklmnopqrstuvwxyz0123456", false)]
    fn slug_rules(#[case] slug: &str, #[case] expected: bool) {
        assert_eq!(is_valid_slug(slug), expected);
    }

    #[rstest]
    fn check_text_rejects_overlong_values() {
        let long = "x".repeat(TAG_NAME_MAX + 1);
        let err = check_text("name", &long, TAG_NAME_MAX).expect_err("too long");
        assert_eq!(err, "name must be at most 32 characters");
    }
}
