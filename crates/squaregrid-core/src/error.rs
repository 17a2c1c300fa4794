use thiserror::Error;

use crate::grid::TileId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid grid item {id}: {reason}")]
    InvalidItem { id: TileId, reason: String },

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    pub(crate) fn invalid_item(id: TileId, reason: impl Into<String>) -> Self {
        Self::InvalidItem {
            id,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
