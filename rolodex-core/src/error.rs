use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Invalid photo filename: {0}")]
    InvalidFilename(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unable to upload photo: {0}")]
    UploadFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContactError {
    pub fn contact_not_found(id: &str) -> Self {
        Self::NotFound(format!("contact {id}"))
    }

    pub fn upload_failed(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::UploadFailed(source.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for ContactError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("row".to_string()),
            other => Self::Storage(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
