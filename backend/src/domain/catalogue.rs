//! Tags and ingredients.
//!
//! Both are admin-managed reference data. Field limits are shared with the
//! `catalogue-data` fixture loader so imported rows always satisfy them.

use std::fmt;

use catalogue_data::{
    INGREDIENT_NAME_MAX, MEASUREMENT_UNIT_MAX, TAG_NAME_MAX, TAG_SLUG_MAX, is_valid_slug,
};

use super::ids::{IngredientId, TagId};

/// A recipe label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

/// A catalogue ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Validation failures for catalogue writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueValidationError {
    Blank { field: &'static str },
    TooLong { field: &'static str, max: usize },
    InvalidSlug,
}

impl CatalogueValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } => field,
            Self::InvalidSlug => "slug",
        }
    }
}

impl fmt::Display for CatalogueValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::TooLong { field, max } => write!(f, "{field} must be at most {max} characters"),
            Self::InvalidSlug => write!(
                f,
                "slug may only contain letters, digits, hyphens, or underscores (max {TAG_SLUG_MAX})"
            ),
        }
    }
}

impl std::error::Error for CatalogueValidationError {}

fn bounded(field: &'static str, raw: &str, max: usize) -> Result<String, CatalogueValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CatalogueValidationError::Blank { field });
    }
    if value.chars().count() > max {
        return Err(CatalogueValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

/// Validated tag ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    name: String,
    slug: String,
}

impl NewTag {
    /// Validate a tag name and slug.
    pub fn new(name: &str, slug: &str) -> Result<Self, CatalogueValidationError> {
        let name = bounded("name", name, TAG_NAME_MAX)?;
        let slug = slug.trim();
        if !is_valid_slug(slug) {
            return Err(CatalogueValidationError::InvalidSlug);
        }
        Ok(Self {
            name,
            slug: slug.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// Validated ingredient ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    name: String,
    measurement_unit: String,
}

impl NewIngredient {
    /// Validate an ingredient name and unit.
    pub fn new(name: &str, measurement_unit: &str) -> Result<Self, CatalogueValidationError> {
        Ok(Self {
            name: bounded("name", name, INGREDIENT_NAME_MAX)?,
            measurement_unit: bounded("measurement_unit", measurement_unit, MEASUREMENT_UNIT_MAX)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn measurement_unit(&self) -> &str {
        &self.measurement_unit
    }
}
