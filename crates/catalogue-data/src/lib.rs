//! Tag and ingredient fixtures for seeding the Foodgram catalogue.
//!
//! This crate loads catalogue fixtures from JSON or CSV, validates every entry
//! against the limits the backend enforces, and drops duplicates so the
//! importer only sees unique rows. It is independent of backend domain types.
//!
//! Two fixture shapes are accepted:
//!
//! - a bare array of ingredients: `[{"name": "salt", "measurement_unit": "g"}]`
//! - a versioned bundle with `tags` and `ingredients` arrays
//! - a headed `tags.csv` (`name,slug`) or `ingredients.csv`
//!   (`name,measurement_unit`) export of a single table
//!
//! # Example
//!
//! ```
//! use catalogue_data::CatalogueFixture;
//!
//! let json = r#"{
//!     "version": 1,
//!     "tags": [{"name": "Breakfast", "slug": "breakfast"}],
//!     "ingredients": [
//!         {"name": "oats", "measurement_unit": "g"},
//!         {"name": "oats", "measurement_unit": "g"}
//!     ]
//! }"#;
//!
//! let fixture = CatalogueFixture::from_json(json).expect("valid fixture");
//! assert_eq!(fixture.tags().len(), 1);
//! assert_eq!(fixture.ingredients().len(), 1);
//! assert_eq!(fixture.duplicates_skipped(), 1);
//! ```

mod error;
mod fixture;
mod validation;

pub use error::FixtureError;
pub use fixture::{CatalogueFixture, CsvTable, IngredientSeed, TagSeed};
pub use validation::{
    INGREDIENT_NAME_MAX, MEASUREMENT_UNIT_MAX, TAG_NAME_MAX, TAG_SLUG_MAX, is_valid_slug,
};
