//! Image storage rooted at a capability directory.
//!
//! Every path is resolved relative to the media root handle, so stored paths
//! read back from the database cannot reach outside it.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImageKind, ImageUpload, StoredImage};

/// [`ImageStore`] writing files below a media root directory.
#[derive(Clone)]
pub struct CapStdImageStore {
    root: Arc<Dir>,
    url_prefix: String,
}

impl CapStdImageStore {
    /// Open (creating when absent) the media root.
    ///
    /// `url_prefix` is prepended to stored paths when building public URLs,
    /// for example `/media/` or `https://cdn.example.com/media/`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while creating or opening the directory.
    pub fn open(root: impl AsRef<Path>, url_prefix: impl Into<String>) -> io::Result<Self> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        let mut url_prefix = url_prefix.into();
        if !url_prefix.ends_with('/') {
            url_prefix.push('/');
        }
        Ok(Self {
            root: Arc::new(dir),
            url_prefix,
        })
    }

    async fn blocking<T, F>(&self, task: F) -> Result<T, ImageStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || task(&root))
            .await
            .map_err(|err| ImageStoreError::io(format!("image task failed: {err}")))?
            .map_err(|err| ImageStoreError::io(err.to_string()))
    }
}

fn file_path(kind: ImageKind, extension: &str) -> PathBuf {
    Path::new(kind.folder()).join(format!("{}.{extension}", Uuid::new_v4().simple()))
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn save(
        &self,
        kind: ImageKind,
        upload: &ImageUpload,
    ) -> Result<StoredImage, ImageStoreError> {
        let relative = file_path(kind, upload.extension());
        let stored = relative.to_string_lossy().replace('\\', "/");
        let bytes = upload.bytes().to_vec();

        self.blocking(move |root| {
            root.create_dir_all(kind.folder())?;
            root.write(&relative, bytes)
        })
        .await?;

        debug!(path = %stored, "stored image");
        Ok(StoredImage::new(stored))
    }

    async fn remove(&self, image: &StoredImage) -> Result<(), ImageStoreError> {
        let relative = PathBuf::from(image.as_str());
        self.blocking(move |root| match root.remove_file(&relative) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
    }

    fn url(&self, image: &StoredImage) -> String {
        format!(
            "{}{}",
            self.url_prefix,
            image.as_str().trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cap_fs::{path_exists, read_bytes};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn media() -> (TempDir, CapStdImageStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = CapStdImageStore::open(dir.path().join("media"), "/media").expect("open store");
        (dir, store)
    }

    fn upload() -> ImageUpload {
        ImageUpload::from_data_url("data:image/png;base64,aGVsbG8=").expect("valid image")
    }

    #[rstest]
    #[tokio::test]
    async fn save_writes_below_kind_folder(media: (TempDir, CapStdImageStore)) {
        let (dir, store) = media;
        let stored = store
            .save(ImageKind::RecipeImage, &upload())
            .await
            .expect("saved");

        assert!(stored.as_str().starts_with("recipes/images/"));
        assert!(stored.as_str().ends_with(".png"));
        let on_disk =
            read_bytes(&dir.path().join("media").join(stored.as_str())).expect("file exists");
        assert_eq!(on_disk, b"hello");
    }

    #[rstest]
    #[tokio::test]
    async fn remove_deletes_and_tolerates_missing_files(media: (TempDir, CapStdImageStore)) {
        let (dir, store) = media;
        let stored = store.save(ImageKind::Avatar, &upload()).await.expect("saved");

        store.remove(&stored).await.expect("removed");
        assert!(!path_exists(&dir.path().join("media").join(stored.as_str())));
        store.remove(&stored).await.expect("second remove is a no-op");
    }

    #[rstest]
    fn urls_join_prefix_and_path(media: (TempDir, CapStdImageStore)) {
        let (_dir, store) = media;
        assert_eq!(
            store.url(&StoredImage::new("users/avatars/a.png")),
            "/media/users/avatars/a.png"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn paths_cannot_escape_the_root(media: (TempDir, CapStdImageStore)) {
        let (_dir, store) = media;
        let err = store
            .remove(&StoredImage::new("../outside.png"))
            .await
            .expect_err("escape rejected");
        assert!(err.to_string().contains("image store failed"));
    }
}
