//! Error types for catalog loading and recommendation queries

use thiserror::Error;

/// Result type used throughout reelpick
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// No record survived load-time cleaning. Fatal at startup.
    #[error("catalog is empty: no record has a title, genre, release year, IMDb score and vote count")]
    EmptyCatalog,

    /// Query issued without a usable mode. Nothing was computed.
    #[error("no recommendation mode selected")]
    ModeNotSelected,

    /// The filters ran and nothing qualified.
    #[error("no titles match the given filters")]
    NoResults,

    /// Year bound that is neither empty nor an integer
    #[error("invalid year '{0}': expected a whole number or an empty value")]
    InvalidYear(String),

    /// Genre that is not one of the supported tags
    #[error("unknown genre '{0}'")]
    UnknownGenre(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Conditions the user can fix by changing the query.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ModeNotSelected | Error::NoResults | Error::InvalidYear(_) | Error::UnknownGenre(_)
        )
    }

    /// Process exit code used by the CLI for this condition
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ModeNotSelected | Error::InvalidYear(_) | Error::UnknownGenre(_) => 2,
            Error::NoResults => 3,
            _ => 1,
        }
    }
}
