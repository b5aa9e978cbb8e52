//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled behind the `test-support` feature, which the crate's own
//! dev-dependency enables.

pub mod cap_fs {
    //! Capability-safe file inspection for media tests.
    //!
    //! Stored images are checked through `cap_std::fs::Dir` handles rather
    //! than ambient `std::fs` calls.

    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    fn open_parent(path: &Path) -> io::Result<(Dir, &Path)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "path must name a file")
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        Ok((dir, Path::new(name)))
    }

    /// Read a stored file's bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foodgram::test_support::cap_fs::read_bytes;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("pixel.png");
    /// cap_std::fs::Dir::open_ambient_dir(dir.path(), cap_std::ambient_authority())?
    ///     .write("pixel.png", b"png")?;
    /// assert_eq!(read_bytes(&path)?, b"png");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
        let (dir, name) = open_parent(path)?;
        dir.read(name)
    }

    /// Whether `path` exists. Unreadable parents count as missing.
    pub fn path_exists(path: &Path) -> bool {
        open_parent(path).is_ok_and(|(dir, name)| dir.exists(name))
    }
}

pub mod memory;

pub mod openapi {
    //! Helpers for inspecting utoipa schemas in tests.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Return the inline `Object` behind `schema`, panicking with the schema
    /// name and actual kind otherwise.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        let kind = match schema {
            RefOr::T(Schema::Object(object)) => return object,
            RefOr::Ref(reference) => format!("a $ref to '{}'", reference.ref_location),
            RefOr::T(Schema::AllOf(_)) => "an allOf composition".to_owned(),
            RefOr::T(Schema::OneOf(_)) => "a oneOf composition".to_owned(),
            RefOr::T(Schema::AnyOf(_)) => "an anyOf composition".to_owned(),
            RefOr::T(Schema::Array(_)) => "an array".to_owned(),
            _ => "an unexpected kind".to_owned(),
        };
        panic!("schema '{name}' is {kind}, not an inline object");
    }

    /// Return the named property, panicking when it is absent.
    pub fn get_property<'a>(object: &'a Object, field: &str) -> &'a RefOr<Schema> {
        object
            .properties
            .get(field)
            .unwrap_or_else(|| panic!("property '{field}' not found"))
    }
}
