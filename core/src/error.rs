use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid reference catalog: {reason}")]
    InvalidCatalog { reason: String },

    #[error("Invalid generator config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Business name space exhausted after {attempts} attempts")]
    NameSpaceExhausted { attempts: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenError {
    pub fn catalog(reason: impl Into<String>) -> Self {
        Self::InvalidCatalog { reason: reason.into() }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }
}

pub type GenResult<T> = Result<T, GenError>;
