//! Error types for fixture loading.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating a catalogue fixture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("failed to read fixture at '{path}': {message}")]
    Io {
        /// Path to the fixture file.
        path: Utf8PathBuf,
        /// Description of the I/O failure.
        message: String,
    },

    /// The fixture is not valid JSON or has the wrong shape.
    #[error("invalid fixture JSON: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// A CSV row is malformed or misses a column.
    #[error("invalid fixture CSV: {message}")]
    Csv {
        /// Description of the parse failure.
        message: String,
    },

    /// A CSV file stem names no catalogue table.
    #[error("no catalogue table named '{stem}', expected 'tags' or 'ingredients'")]
    UnknownCsvTable {
        /// File stem that was read.
        stem: String,
    },

    /// The bundle version is not understood.
    #[error("unsupported fixture version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Version this crate reads.
        expected: u32,
        /// Version found in the file.
        actual: u32,
    },

    /// A tag entry breaks a catalogue rule.
    #[error("invalid tag at index {index}: {reason}")]
    InvalidTag {
        /// Position of the entry in the `tags` array.
        index: usize,
        /// Rule that was broken.
        reason: String,
    },

    /// An ingredient entry breaks a catalogue rule.
    #[error("invalid ingredient at index {index}: {reason}")]
    InvalidIngredient {
        /// Position of the entry in the `ingredients` array.
        index: usize,
        /// Rule that was broken.
        reason: String,
    },

    /// The fixture holds neither tags nor ingredients.
    #[error("fixture contains no tags or ingredients")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = FixtureError::Io {
            path: Utf8PathBuf::from("data/ingredients.json"),
            message: "not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read fixture at 'data/ingredients.json': not found"
        );
    }

    #[test]
    fn invalid_ingredient_names_index() {
        let err = FixtureError::InvalidIngredient {
            index: 4,
            reason: "name must not be blank".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid ingredient at index 4: name must not be blank"
        );
    }
}
