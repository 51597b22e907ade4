use buffett_core::input::{FetchError, InputError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] buffett_core::ValidationError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("failed to fetch data: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to set up http client: {0}")]
    Http(#[from] buffett_core::HttpError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Input(InputError::Io(_)) => 10,
            Self::Input(_) => 2,
            Self::Fetch(_) | Self::Http(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
