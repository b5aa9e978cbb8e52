//! Port for uploaded image storage.
use async_trait::async_trait;

use crate::domain::{ImageKind, ImageUpload, StoredImage};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Reading or writing the media directory failed.
        Io { message: String } => InternalError: "image store failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `upload` under a fresh name inside the folder for `kind`.
    async fn save(
        &self,
        kind: ImageKind,
        upload: &ImageUpload,
    ) -> Result<StoredImage, ImageStoreError>;

    /// Delete a stored file. Missing files are not an error.
    async fn remove(&self, image: &StoredImage) -> Result<(), ImageStoreError>;

    /// Public URL for a stored file.
    fn url(&self, image: &StoredImage) -> String;
}
