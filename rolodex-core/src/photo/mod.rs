//! On-disk storage for contact photos.

pub mod extension;
pub mod store;

pub use extension::{
    DEFAULT_PHOTO_EXTENSION, content_type_for, photo_extension, stored_filename,
    validate_filename,
};
pub use store::{DEFAULT_PHOTO_URL_PREFIX, Photo, PhotoStore, StoredPhoto};
