use thiserror::Error;

/// Errors produced while configuring or running an agent
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A key addresses storage outside the configured shape
    ///
    /// This is fatal for the run that produced it.
    #[error("key {key} is out of range for shape {shape}")]
    KeyOutOfRange { key: String, shape: String },

    /// A parameter was rejected before any sampling took place
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    pub(crate) fn out_of_range(key: impl std::fmt::Debug, shape: impl std::fmt::Debug) -> Self {
        Self::KeyOutOfRange {
            key: format!("{key:?}"),
            shape: format!("{shape:?}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
