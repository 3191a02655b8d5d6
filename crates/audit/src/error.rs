use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("audit store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, Error>;
