use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Errors that can occur while sniffing or reading a PLY stream.
///
/// Every variant except [`PlyError::NotPly`] aborts the read. The importer may
/// already have received calls when one of them is returned, so whatever it
/// built must be discarded.
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("Stream is not a PLY file")]
    NotPly,

    #[error("Invalid PLY header: {0}")]
    MalformedHeader(String),

    #[error("Unsupported PLY encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid value: {0}")]
    ValueFormat(String),

    #[error("Unexpected end of stream")]
    UnexpectedEof,

    #[error("IO error: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for PlyError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => PlyError::UnexpectedEof,
            _ => PlyError::Io(err),
        }
    }
}

impl From<ParseIntError> for PlyError {
    fn from(err: ParseIntError) -> Self {
        PlyError::ValueFormat(format!("Error parsing integer: {err}"))
    }
}

impl From<ParseFloatError> for PlyError {
    fn from(err: ParseFloatError) -> Self {
        PlyError::ValueFormat(format!("Error parsing float: {err}"))
    }
}
