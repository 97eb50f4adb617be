use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::extension::{content_type_for, stored_filename, validate_filename};
use crate::error::{ContactError, Result};

/// Path namespace photos are served under unless configured otherwise.
pub const DEFAULT_PHOTO_URL_PREFIX: &str = "/contacts/image/";

/// Outcome of a successful photo write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub filename: String,
    pub path: PathBuf,
    pub url: String,
}

/// A photo read back from the store.
#[derive(Debug, Clone)]
pub struct Photo {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub modified: Option<SystemTime>,
}

/// Writes and reads contact photos in a single directory.
///
/// Files are named `<contact id><extension>`; a second upload for the same
/// contact and extension replaces the first. The URL returned for a stored
/// file is `<public base url><url prefix><filename>`, so the prefix must match
/// the route the photos are served from.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    directory: PathBuf,
    url_prefix: String,
    public_base_url: Option<Url>,
}

impl PhotoStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            url_prefix: DEFAULT_PHOTO_URL_PREFIX.to_string(),
            public_base_url: None,
        }
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_public_base_url(mut self, base: Option<Url>) -> Self {
        self.public_base_url = base;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Creates the photo directory and any missing parents. Safe to call
    /// repeatedly and from concurrent tasks.
    pub async fn ensure_directory(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.directory).await
    }

    /// Retrieval URL for a stored filename.
    pub fn photo_url(&self, filename: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!(
                "{}{}{}",
                base.as_str().trim_end_matches('/'),
                self.url_prefix,
                filename
            ),
            None => format!("{}{}", self.url_prefix, filename),
        }
    }

    /// Stored filename referenced by a URL this store produced, if any.
    pub fn filename_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let (_, filename) = url.rsplit_once(self.url_prefix.as_str())?;
        validate_filename(filename).ok()
    }

    /// Stores `content` as the photo for contact `id`.
    ///
    /// The directory is created on demand and the file is replaced
    /// atomically, so readers observe either the previous or the new bytes.
    pub async fn store(
        &self,
        id: &str,
        original_name: Option<&str>,
        content: &[u8],
    ) -> io::Result<StoredPhoto> {
        let filename = stored_filename(id, original_name);
        validate_filename(&filename).map_err(|err| {
            io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
        })?;

        self.ensure_directory().await?;

        let path = self.directory.join(&filename);
        atomic_write(&path, content).await?;
        debug!(
            filename = %filename,
            bytes = content.len(),
            "stored contact photo"
        );

        Ok(StoredPhoto {
            url: self.photo_url(&filename),
            filename,
            path,
        })
    }

    /// Reads the whole file `<directory>/<filename>`.
    pub async fn read(&self, filename: &str) -> Result<Photo> {
        let filename = validate_filename(filename)?;
        let path = self.directory.join(filename);

        let bytes = tokio::fs::read(&path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ContactError::NotFound(format!("photo {filename}"))
            } else {
                ContactError::Io(err)
            }
        })?;

        let modified = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.modified().ok(),
            Err(err) => {
                warn!("No metadata for {:?}: {}", path, err);
                None
            }
        };

        Ok(Photo {
            filename: filename.to_string(),
            content_type: content_type_for(filename),
            bytes,
            modified,
        })
    }

    /// Removes a stored photo. Returns `false` when there was nothing to
    /// remove.
    pub async fn remove(&self, filename: &str) -> Result<bool> {
        let filename = validate_filename(filename)?;
        match tokio::fs::remove_file(self.directory.join(filename)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(ContactError::Io(err)),
        }
    }
}

/// Writes to a uniquely named sibling temp file, syncs it, then renames it
/// over `path`. Concurrent writers each use their own temp file; the last
/// rename wins.
async fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path =
        parent.join(format!(".{name}.{}.tmp", Uuid::new_v4().simple()));

    let written = async {
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(content).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;

    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }
    written
}
