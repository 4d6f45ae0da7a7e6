use permfs_hal::HalError;
use std::io;
use thiserror::Error;

pub type PermfsResult<T> = std::result::Result<T, PermfsError>;

#[derive(Error, Debug)]
pub enum PermfsError {
    #[error(transparent)]
    Hal(#[from] HalError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("reading config file {file}: {source}")]
    Config {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid value in config file {file}: {reason}")]
    ConfigValue { file: String, reason: String },

    #[error("invalid payload file name {0:?}")]
    InvalidPayloadName(String),

    #[error("payload does not contain {0}")]
    MissingPayloadFile(String),

    #[error("target device path is empty")]
    EmptyDevice,

    #[error("invalid device API address: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("device API returned {status}: {body}")]
    Api { status: u16, body: String },
}
