//! Uploaded media storage.

mod cap_std_image_store;

pub use cap_std_image_store::CapStdImageStore;
