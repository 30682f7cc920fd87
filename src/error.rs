use std::{io, path::PathBuf};

use qrencode::types::QrError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid file extension `{0}`")]
    InvalidExtension(String),

    #[error("QR Code encoding failed: {0}")]
    Encode(#[from] QrError),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("writing {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("input closed while waiting for {0}")]
    InputClosed(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
