//! Base64 data-URL image payloads and stored image references.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Largest decoded image accepted, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Reasons an image payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageValidationError {
    NotDataUrl,
    UnsupportedFormat { format: String },
    InvalidBase64,
    Empty,
    TooLarge { max: usize },
}

impl fmt::Display for ImageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDataUrl => write!(f, "image must be a data:image/<format>;base64 URL"),
            Self::UnsupportedFormat { format } => {
                write!(f, "image format '{format}' is not supported")
            }
            Self::InvalidBase64 => write!(f, "image payload is not valid base64"),
            Self::Empty => write!(f, "image payload must not be empty"),
            Self::TooLarge { max } => write!(f, "image must be at most {max} bytes"),
        }
    }
}

impl std::error::Error for ImageValidationError {}

/// Decoded image ready to be written to the media store.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    extension: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Decode `data:image/<ext>;base64,<payload>`.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::ImageUpload;
    ///
    /// let upload = ImageUpload::from_data_url("data:image/png;base64,iVBORw0KGgo=")
    ///     .expect("valid image");
    /// assert_eq!(upload.extension(), "png");
    /// ```
    pub fn from_data_url(raw: &str) -> Result<Self, ImageValidationError> {
        let rest = raw
            .trim()
            .strip_prefix("data:image/")
            .ok_or(ImageValidationError::NotDataUrl)?;
        let (format, payload) = rest
            .split_once(";base64,")
            .ok_or(ImageValidationError::NotDataUrl)?;
        let format = format.to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&format.as_str()) {
            return Err(ImageValidationError::UnsupportedFormat { format });
        }
        if payload.len() > MAX_IMAGE_BYTES.saturating_mul(4) / 3 + 4 {
            return Err(ImageValidationError::TooLarge {
                max: MAX_IMAGE_BYTES,
            });
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| ImageValidationError::InvalidBase64)?;
        if bytes.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageValidationError::TooLarge {
                max: MAX_IMAGE_BYTES,
            });
        }
        let extension = if format == "jpeg" {
            "jpg".to_owned()
        } else {
            format
        };
        Ok(Self { extension, bytes })
    }

    /// File extension derived from the MIME subtype.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Decoded file content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Media folder an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    RecipeImage,
    Avatar,
}

impl ImageKind {
    /// Folder below the media root.
    pub fn folder(self) -> &'static str {
        match self {
            Self::RecipeImage => "recipes/images",
            Self::Avatar => "users/avatars",
        }
    }
}

/// Path of a stored image relative to the media root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredImage(String);

impl StoredImage {
    /// Wrap a relative media path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Borrow the relative path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
