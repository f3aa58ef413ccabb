use crate::{decode::DecodeError, Ceremony, Curve};
use ark_serialize::SerializationError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Convenience result alias
pub type SetupResult<T> = std::result::Result<T, SetupError>;

#[derive(Debug, Error)]
/// Fatal errors while translating a ceremony. Any of them aborts the whole
/// ceremony; no partial SRS is produced.
pub enum SetupError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed field element in {} at byte offset {offset}: {reason}", .path.display())]
    MalformedElement {
        path: PathBuf,
        offset: u64,
        #[source]
        reason: DecodeError,
    },
    #[error("malformed header in {}: {reason}", .path.display())]
    MalformedHeader { path: PathBuf, reason: String },
    #[error("point {index} in {} (byte offset {offset}) is off the curve or the identity", .path.display())]
    OffCurveOrIdentityPoint {
        path: PathBuf,
        index: u64,
        offset: u64,
    },
    #[error("missing chunk file for chunk {0}")]
    MissingChunk(usize),
    #[error("missing {what} in {}", .dir.display())]
    MissingFile { dir: PathBuf, what: &'static str },
    #[error("no setup file provided the τ·G2 point")]
    MissingTauG2,
    #[error("τ·G2 was already set when {} provided another one", .path.display())]
    DuplicateTauG2 { path: PathBuf },
    #[error("unsupported ceremony/curve pair: {ceremony} {curve}")]
    Unsupported { ceremony: Ceremony, curve: Curve },
    #[error("unknown ceremony `{0}`")]
    UnknownCeremony(String),
    #[error("unknown curve `{0}`")]
    UnknownCurve(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

impl SetupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SetupError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn header(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SetupError::MalformedHeader {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
