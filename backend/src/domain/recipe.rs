//! Recipes: drafts, validation, and read projections.
//!
//! A [`RecipeDraft`] is the validated form of a create or update payload. It
//! guarantees non-empty, duplicate-free ingredient and tag lists and that
//! every numeric value sits inside the configured [`RecipeLimits`]. Whether
//! referenced tags and ingredients exist is checked by the recipe service
//! against the catalogue.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::catalogue::{Ingredient, Tag};
use super::error::Error;
use super::ids::{IngredientId, RecipeId, TagId, UserId};
use super::image::{ImageUpload, StoredImage};
use super::short_link::ShortCode;
use super::user::UserProfile;

/// Maximum recipe name length in characters.
pub const RECIPE_NAME_MAX: usize = 256;
/// Smallest cooking time and ingredient amount accepted by default.
pub const DEFAULT_MIN_VALUE: u32 = 1;
/// Largest cooking time and ingredient amount accepted by default.
pub const DEFAULT_MAX_VALUE: u32 = 32_000;

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueBounds {
    min: u32,
    max: u32,
}

impl ValueBounds {
    /// Build a range, swapping the ends when given in reverse and lifting
    /// a zero minimum to one.
    pub fn new(min: u32, max: u32) -> Self {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min: low.max(1),
            max: high.max(1),
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    fn check(&self, value: i64) -> Option<u32> {
        u32::try_from(value)
            .ok()
            .filter(|v| (self.min..=self.max).contains(v))
    }
}

/// Configurable bounds for recipe numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeLimits {
    pub cooking_time: ValueBounds,
    pub amount: ValueBounds,
}

impl Default for RecipeLimits {
    fn default() -> Self {
        let bounds = ValueBounds::new(DEFAULT_MIN_VALUE, DEFAULT_MAX_VALUE);
        Self {
            cooking_time: bounds,
            amount: bounds,
        }
    }
}

/// Reasons a recipe payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    Missing { field: &'static str },
    BlankName,
    NameTooLong { max: usize },
    BlankText,
    CookingTimeOutOfRange { min: u32, max: u32 },
    NoIngredients,
    DuplicateIngredient { id: IngredientId },
    AmountOutOfRange { id: IngredientId, min: u32, max: u32 },
    UnknownIngredients { ids: Vec<IngredientId> },
    NoTags,
    DuplicateTag { id: TagId },
    UnknownTags { ids: Vec<TagId> },
    MissingImage,
    InvalidImage { reason: String },
}

impl RecipeValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } => field,
            Self::BlankName | Self::NameTooLong { .. } => "name",
            Self::BlankText => "text",
            Self::CookingTimeOutOfRange { .. } => "cooking_time",
            Self::NoIngredients
            | Self::DuplicateIngredient { .. }
            | Self::AmountOutOfRange { .. }
            | Self::UnknownIngredients { .. } => "ingredients",
            Self::NoTags | Self::DuplicateTag { .. } | Self::UnknownTags { .. } => "tags",
            Self::MissingImage | Self::InvalidImage { .. } => "image",
        }
    }

    /// Machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_field",
            Self::BlankName | Self::BlankText => "blank",
            Self::NameTooLong { .. } => "too_long",
            Self::CookingTimeOutOfRange { .. } | Self::AmountOutOfRange { .. } => "out_of_range",
            Self::NoIngredients | Self::NoTags => "empty",
            Self::DuplicateIngredient { .. } | Self::DuplicateTag { .. } => "duplicate",
            Self::UnknownIngredients { .. } | Self::UnknownTags { .. } => "unknown",
            Self::MissingImage => "required",
            Self::InvalidImage { .. } => "invalid_image",
        }
    }
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "missing required field: {field}"),
            Self::BlankName => write!(f, "name must not be blank"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::BlankText => write!(f, "text must not be blank"),
            Self::CookingTimeOutOfRange { min, max } => {
                write!(f, "cooking_time must be between {min} and {max}")
            }
            Self::NoIngredients => write!(f, "at least one ingredient is required"),
            Self::DuplicateIngredient { id } => write!(f, "ingredient {id} is listed twice"),
            Self::AmountOutOfRange { id, min, max } => {
                write!(f, "amount of ingredient {id} must be between {min} and {max}")
            }
            Self::UnknownIngredients { ids } => write!(f, "unknown ingredients: {}", join(ids)),
            Self::NoTags => write!(f, "at least one tag is required"),
            Self::DuplicateTag { id } => write!(f, "tag {id} is listed twice"),
            Self::UnknownTags { ids } => write!(f, "unknown tags: {}", join(ids)),
            Self::MissingImage => write!(f, "image is required"),
            Self::InvalidImage { reason } => write!(f, "{reason}"),
        }
    }
}

fn join<T: fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::error::Error for RecipeValidationError {}

impl From<RecipeValidationError> for Error {
    fn from(value: RecipeValidationError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

/// One `{id, amount}` pair as submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmountInput {
    pub id: i64,
    pub amount: i64,
}

/// A validated ingredient line of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: u32,
}

/// Raw values of a recipe payload after JSON decoding.
///
/// Every field is optional here so that missing fields are reported through
/// the same validation path as malformed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraftInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
    /// Base64 data URL.
    pub image: Option<String>,
    pub ingredients: Option<Vec<IngredientAmountInput>>,
    pub tags: Option<Vec<i64>>,
}

/// A validated recipe payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    text: String,
    cooking_time: u32,
    image: Option<ImageUpload>,
    ingredients: Vec<IngredientAmount>,
    tags: Vec<TagId>,
}

impl RecipeDraft {
    /// Validate a payload against `limits`.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{
    ///     RecipeDraft, RecipeDraftInput, RecipeLimits, RecipeValidationError,
    /// };
    ///
    /// let input = RecipeDraftInput {
    ///     name: Some("Porridge".into()),
    ///     text: Some("Boil oats.".into()),
    ///     cooking_time: Some(10),
    ///     image: None,
    ///     ingredients: Some(vec![]),
    ///     tags: Some(vec![1]),
    /// };
    /// let err = RecipeDraft::new(input, &RecipeLimits::default()).unwrap_err();
    /// assert_eq!(err, RecipeValidationError::NoIngredients);
    /// ```
    pub fn new(input: RecipeDraftInput, limits: &RecipeLimits) -> Result<Self, RecipeValidationError> {
        let RecipeDraftInput {
            name,
            text,
            cooking_time,
            image,
            ingredients,
            tags,
        } = input;

        let name = name.ok_or(RecipeValidationError::Missing { field: "name" })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(RecipeValidationError::BlankName);
        }
        if name.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            });
        }
        let text = text.ok_or(RecipeValidationError::Missing { field: "text" })?;
        let text = text.trim();
        if text.is_empty() {
            return Err(RecipeValidationError::BlankText);
        }
        let cooking_time = cooking_time.ok_or(RecipeValidationError::Missing {
            field: "cooking_time",
        })?;
        let cooking_time = limits.cooking_time.check(cooking_time).ok_or(
            RecipeValidationError::CookingTimeOutOfRange {
                min: limits.cooking_time.min(),
                max: limits.cooking_time.max(),
            },
        )?;

        let ingredients = ingredients.ok_or(RecipeValidationError::Missing {
            field: "ingredients",
        })?;
        let ingredients = validate_ingredients(&ingredients, limits)?;
        let tags = tags.ok_or(RecipeValidationError::Missing { field: "tags" })?;
        let tags = validate_tags(&tags)?;

        let image = image
            .map(|raw| {
                ImageUpload::from_data_url(&raw).map_err(|err| RecipeValidationError::InvalidImage {
                    reason: err.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            name: name.to_owned(),
            text: text.to_owned(),
            cooking_time,
            image,
            ingredients,
            tags,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cooking_time(&self) -> u32 {
        self.cooking_time
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn ingredients(&self) -> &[IngredientAmount] {
        &self.ingredients
    }

    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Distinct ingredient ids in submission order.
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredients.iter().map(|line| line.ingredient_id).collect()
    }
}

fn validate_ingredients(
    raw: &[IngredientAmountInput],
    limits: &RecipeLimits,
) -> Result<Vec<IngredientAmount>, RecipeValidationError> {
    if raw.is_empty() {
        return Err(RecipeValidationError::NoIngredients);
    }
    let mut seen = HashSet::with_capacity(raw.len());
    raw.iter()
        .map(|line| {
            let id = IngredientId::new(line.id);
            if !seen.insert(id) {
                return Err(RecipeValidationError::DuplicateIngredient { id });
            }
            let amount = limits.amount.check(line.amount).ok_or(
                RecipeValidationError::AmountOutOfRange {
                    id,
                    min: limits.amount.min(),
                    max: limits.amount.max(),
                },
            )?;
            Ok(IngredientAmount {
                ingredient_id: id,
                amount,
            })
        })
        .collect()
}

fn validate_tags(raw: &[i64]) -> Result<Vec<TagId>, RecipeValidationError> {
    if raw.is_empty() {
        return Err(RecipeValidationError::NoTags);
    }
    let mut seen = HashSet::with_capacity(raw.len());
    raw.iter()
        .map(|value| {
            let id = TagId::new(*value);
            if seen.insert(id) {
                Ok(id)
            } else {
                Err(RecipeValidationError::DuplicateTag { id })
            }
        })
        .collect()
}

/// A stored recipe row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub image: StoredImage,
    pub text: String,
    pub cooking_time: u32,
    pub short_code: ShortCode,
    pub created_at: DateTime<Utc>,
}

/// An ingredient line of a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientLine {
    pub ingredient: Ingredient,
    pub amount: u32,
}

/// Related rows of a recipe, resolved for one viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeRelations {
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Full recipe projection returned by read endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author: UserProfile,
    pub relations: RecipeRelations,
}

/// Minimal projection `{id, name, image, cooking_time}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: StoredImage,
    pub cooking_time: u32,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Everything needed to insert a recipe and its join rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub author_id: UserId,
    pub name: String,
    pub image: StoredImage,
    pub text: String,
    pub cooking_time: u32,
    pub short_code: ShortCode,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<TagId>,
}

/// Replacement values for an existing recipe.
///
/// `image` is `None` when the stored image is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeChanges {
    pub name: String,
    pub image: Option<StoredImage>,
    pub text: String,
    pub cooking_time: u32,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<TagId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn input() -> RecipeDraftInput {
        RecipeDraftInput {
            name: Some("Shakshuka".to_owned()),
            text: Some("Simmer tomatoes, add eggs.".to_owned()),
            cooking_time: Some(25),
            image: None,
            ingredients: Some(vec![
                IngredientAmountInput { id: 1, amount: 3 },
                IngredientAmountInput { id: 2, amount: 400 },
            ]),
            tags: Some(vec![1, 2]),
        }
    }

    fn draft(input: RecipeDraftInput) -> Result<RecipeDraft, RecipeValidationError> {
        RecipeDraft::new(input, &RecipeLimits::default())
    }

    #[rstest]
    fn valid_input_produces_draft(input: RecipeDraftInput) {
        let draft = draft(input).expect("valid draft");
        assert_eq!(draft.name(), "Shakshuka");
        assert_eq!(draft.cooking_time(), 25);
        assert!(draft.image().is_none());
        assert_eq!(draft.tags(), &[TagId::new(1), TagId::new(2)]);
        assert_eq!(
            draft.ingredient_ids(),
            vec![IngredientId::new(1), IngredientId::new(2)]
        );
    }

    #[rstest]
    fn image_is_decoded(mut input: RecipeDraftInput) {
        input.image = Some("data:image/png;base64,aGVsbG8=".to_owned());
        let draft = draft(input).expect("valid draft");
        assert_eq!(draft.image().map(ImageUpload::extension), Some("png"));
    }

    #[rstest]
    fn undecodable_image_is_rejected(mut input: RecipeDraftInput) {
        input.image = Some("not an image".to_owned());
        let err = draft(input).expect_err("bad image");
        assert_eq!(err.field(), "image");
    }

    #[rstest]
    fn empty_ingredients_are_rejected(mut input: RecipeDraftInput) {
        input.ingredients = Some(Vec::new());
        let err = draft(input).expect_err("no ingredients");
        assert_eq!(err, RecipeValidationError::NoIngredients);
        assert_eq!(err.field(), "ingredients");
    }

    #[rstest]
    fn empty_tags_are_rejected(mut input: RecipeDraftInput) {
        input.tags = Some(Vec::new());
        assert_eq!(draft(input), Err(RecipeValidationError::NoTags));
    }

    #[rstest]
    fn duplicate_ingredients_are_rejected(mut input: RecipeDraftInput) {
        input.ingredients = Some(vec![
            IngredientAmountInput { id: 1, amount: 3 },
            IngredientAmountInput { id: 1, amount: 5 },
        ]);
        assert_eq!(
            draft(input),
            Err(RecipeValidationError::DuplicateIngredient {
                id: IngredientId::new(1)
            })
        );
    }

    #[rstest]
    fn duplicate_tags_are_rejected(mut input: RecipeDraftInput) {
        input.tags = Some(vec![2, 1, 2]);
        assert_eq!(
            draft(input),
            Err(RecipeValidationError::DuplicateTag { id: TagId::new(2) })
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[case(32_001)]
    fn cooking_time_outside_bounds_is_rejected(mut input: RecipeDraftInput, #[case] value: i64) {
        input.cooking_time = Some(value);
        let err = draft(input).expect_err("out of range");
        assert_eq!(err.field(), "cooking_time");
        assert_eq!(err.code(), "out_of_range");
    }

    #[rstest]
    fn amount_bounds_follow_configuration(mut input: RecipeDraftInput) {
        input.ingredients = Some(vec![IngredientAmountInput { id: 1, amount: 11 }]);
        let limits = RecipeLimits {
            amount: ValueBounds::new(1, 10),
            ..RecipeLimits::default()
        };
        assert_eq!(
            RecipeDraft::new(input, &limits),
            Err(RecipeValidationError::AmountOutOfRange {
                id: IngredientId::new(1),
                min: 1,
                max: 10,
            })
        );
    }

    #[rstest]
    fn missing_fields_are_named(mut input: RecipeDraftInput) {
        input.tags = None;
        let err = draft(input).expect_err("missing tags");
        assert_eq!(err, RecipeValidationError::Missing { field: "tags" });
        assert_eq!(err.code(), "missing_field");
    }

    #[rstest]
    fn blank_name_is_rejected(mut input: RecipeDraftInput) {
        input.name = Some("   ".to_owned());
        assert_eq!(draft(input), Err(RecipeValidationError::BlankName));
    }

    #[rstest]
    fn validation_errors_carry_field_details() {
        let error = Error::from(RecipeValidationError::NoTags);
        let details = error.details().expect("details present");
        assert_eq!(details.get("field").and_then(|v| v.as_str()), Some("tags"));
        assert_eq!(details.get("code").and_then(|v| v.as_str()), Some("empty"));
    }

    #[rstest]
    fn bounds_normalise_reversed_input() {
        let bounds = ValueBounds::new(50, 0);
        assert_eq!((bounds.min(), bounds.max()), (1, 50));
    }
}
