#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed cache entry: {0}")]
    Parse(String),
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("no connection")]
    NoConnection,
    #[error("unexpected response: {0}")]
    Status(String),
    #[error("malformed response: {0}")]
    Parse(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<SnapshotError> for FetchError {
    fn from(value: SnapshotError) -> Self {
        FetchError::Parse(value.to_string())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SnapshotError {
    #[error("duplicate exercise ID {0}")]
    DuplicateID(String),
}
