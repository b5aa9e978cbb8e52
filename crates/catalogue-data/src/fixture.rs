//! Fixture parsing, validation, and de-duplication.

use std::collections::HashSet;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::FixtureError;
use crate::validation::{
    INGREDIENT_NAME_MAX, MEASUREMENT_UNIT_MAX, TAG_NAME_MAX, check_text, is_valid_slug,
};

const SUPPORTED_VERSION: u32 = 1;

/// A validated tag entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSeed {
    /// Display name.
    pub name: String,
    /// Unique URL-safe identifier.
    pub slug: String,
}

/// A validated ingredient entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientSeed {
    /// Ingredient name.
    pub name: String,
    /// Unit the ingredient is measured in.
    pub measurement_unit: String,
}

/// Validated, de-duplicated catalogue content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueFixture {
    tags: Vec<TagSeed>,
    ingredients: Vec<IngredientSeed>,
    duplicates_skipped: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFixture {
    Bundle {
        version: u32,
        #[serde(default)]
        tags: Vec<RawTag>,
        #[serde(default)]
        ingredients: Vec<RawIngredient>,
    },
    Ingredients(Vec<RawIngredient>),
}

/// Table a headed CSV file feeds, named after the file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvTable {
    /// `name,slug` rows.
    Tags,
    /// `name,measurement_unit` rows.
    Ingredients,
}

impl CsvTable {
    /// Resolve `tags` or `ingredients`.
    #[must_use]
    pub fn from_stem(stem: &str) -> Option<Self> {
        match stem {
            "tags" => Some(Self::Tags),
            "ingredients" => Some(Self::Ingredients),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTag {
    name: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
struct RawIngredient {
    name: String,
    measurement_unit: String,
}

impl CatalogueFixture {
    /// Parse a fixture from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the JSON is malformed, the bundle version
    /// is unsupported, an entry is invalid, or nothing remains to import.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let raw: RawFixture = serde_json::from_str(json).map_err(|e| FixtureError::Parse {
            message: e.to_string(),
        })?;

        let (tags, ingredients) = match raw {
            RawFixture::Bundle {
                version,
                tags,
                ingredients,
            } => {
                if version != SUPPORTED_VERSION {
                    return Err(FixtureError::UnsupportedVersion {
                        expected: SUPPORTED_VERSION,
                        actual: version,
                    });
                }
                (tags, ingredients)
            }
            RawFixture::Ingredients(ingredients) => (Vec::new(), ingredients),
        };

        Self::from_raw(tags, ingredients)
    }

    /// Parse a headed CSV export of one catalogue table.
    ///
    /// Columns are matched by header name, so extra columns are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Csv`] for malformed rows, or the validation
    /// errors [`CatalogueFixture::from_json`] reports.
    pub fn from_csv(table: CsvTable, csv: &str) -> Result<Self, FixtureError> {
        match table {
            CsvTable::Tags => Self::from_raw(read_rows(csv)?, Vec::new()),
            CsvTable::Ingredients => Self::from_raw(Vec::new(), read_rows(csv)?),
        }
    }

    fn from_raw(tags: Vec<RawTag>, ingredients: Vec<RawIngredient>) -> Result<Self, FixtureError> {
        if tags.is_empty() && ingredients.is_empty() {
            return Err(FixtureError::Empty);
        }

        let mut duplicates_skipped = 0;
        let mut seen_slugs = HashSet::new();
        let mut unique_tags = Vec::with_capacity(tags.len());
        for (index, raw_tag) in tags.into_iter().enumerate() {
            let tag = validate_tag(index, raw_tag)?;
            if seen_slugs.insert(tag.slug.clone()) {
                unique_tags.push(tag);
            } else {
                duplicates_skipped += 1;
            }
        }

        let mut seen_pairs = HashSet::new();
        let mut unique_ingredients = Vec::with_capacity(ingredients.len());
        for (index, raw_ingredient) in ingredients.into_iter().enumerate() {
            let ingredient = validate_ingredient(index, raw_ingredient)?;
            let key = (ingredient.name.clone(), ingredient.measurement_unit.clone());
            if seen_pairs.insert(key) {
                unique_ingredients.push(ingredient);
            } else {
                duplicates_skipped += 1;
            }
        }

        Ok(Self {
            tags: unique_tags,
            ingredients: unique_ingredients,
            duplicates_skipped,
        })
    }

    /// Load a fixture file through a capability directory rooted at the
    /// file's parent.
    ///
    /// `.csv` files are read with [`CatalogueFixture::from_csv`], taking the
    /// table from the file stem (`tags.csv`, `ingredients.csv`). Anything
    /// else is parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Io`] when the file cannot be read,
    /// [`FixtureError::UnknownCsvTable`] for an unrecognised CSV stem, or any
    /// parse or validation error.
    pub fn from_file(path: &Utf8Path) -> Result<Self, FixtureError> {
        let io_error = |message: String| FixtureError::Io {
            path: path.to_path_buf(),
            message,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("path does not name a file".to_owned()))?;
        let dir = Dir::open_ambient_dir(parent.as_std_path(), ambient_authority())
            .map_err(|e| io_error(e.to_string()))?;
        let contents = dir
            .read_to_string(file_name)
            .map_err(|e| io_error(e.to_string()))?;

        if path.extension() != Some("csv") {
            return Self::from_json(&contents);
        }
        let stem = path.file_stem().unwrap_or_default();
        let table = CsvTable::from_stem(stem).ok_or_else(|| FixtureError::UnknownCsvTable {
            stem: stem.to_owned(),
        })?;
        Self::from_csv(table, &contents)
    }

    /// Unique tags in file order.
    #[must_use]
    pub fn tags(&self) -> &[TagSeed] {
        &self.tags
    }

    /// Unique ingredients in file order.
    #[must_use]
    pub fn ingredients(&self) -> &[IngredientSeed] {
        &self.ingredients
    }

    /// Number of entries dropped as duplicates.
    #[must_use]
    pub const fn duplicates_skipped(&self) -> usize {
        self.duplicates_skipped
    }
}

fn read_rows<T: DeserializeOwned>(csv: &str) -> Result<Vec<T>, FixtureError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv.as_bytes());
    reader
        .deserialize()
        .collect::<Result<_, _>>()
        .map_err(|e| FixtureError::Csv {
            message: e.to_string(),
        })
}

fn validate_tag(index: usize, raw: RawTag) -> Result<TagSeed, FixtureError> {
    let invalid = |reason: String| FixtureError::InvalidTag { index, reason };
    let name = raw.name.trim().to_owned();
    let slug = raw.slug.trim().to_owned();
    check_text("name", &name, TAG_NAME_MAX).map_err(invalid)?;
    if !is_valid_slug(&slug) {
        return Err(invalid(format!("slug '{slug}' is not a valid slug")));
    }
    Ok(TagSeed { name, slug })
}

fn validate_ingredient(index: usize, raw: RawIngredient) -> Result<IngredientSeed, FixtureError> {
    let invalid = |reason: String| FixtureError::InvalidIngredient { index, reason };
    let name = raw.name.trim().to_owned();
    let measurement_unit = raw.measurement_unit.trim().to_owned();
    check_text("name", &name, INGREDIENT_NAME_MAX).map_err(invalid)?;
    check_text("measurement_unit", &measurement_unit, MEASUREMENT_UNIT_MAX).map_err(invalid)?;
    Ok(IngredientSeed {
        name,
        measurement_unit,
    })
}
