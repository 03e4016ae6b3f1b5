//! StoreRepository port - persistence of the build metadata stores
//!
//! Stores are pure data; repositories know where and how they are kept.

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store persistence errors
#[derive(Debug)]
pub enum StoreError {
    /// Nothing persisted yet
    NotFound,
    /// Persisted data could not be parsed
    InvalidFormat(String),
    /// I/O error
    Io(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "Store not found"),
            StoreError::InvalidFormat(msg) => write!(f, "Invalid store format: {}", msg),
            StoreError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<crate::domain::ports::FsError> for StoreError {
    fn from(err: crate::domain::ports::FsError) -> Self {
        if err.is_not_found() {
            StoreError::NotFound
        } else {
            StoreError::Io(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidFormat(err.to_string())
    }
}

/// Abstract repository for one metadata store
pub trait StoreRepository {
    type Store;

    /// Load the persisted store
    fn load(&self) -> StoreResult<Self::Store>;

    /// Persist the store, replacing what was there
    fn save(&self, store: &Self::Store) -> StoreResult<()>;
}
