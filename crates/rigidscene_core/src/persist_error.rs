//! Persistence error types
//!
//! Errors produced while saving or loading scene objects in the binary format.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::{Marker, MeshError};

/// Error type for object persistence
#[derive(Debug)]
pub enum PersistError {
    /// IO error other than a missing file
    Io(io::Error),
    /// The file to load does not exist (no object is produced)
    NotFound(PathBuf),
    /// The byte stream is not a valid object
    Corrupt(CorruptKind),
}

/// Why a byte stream was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum CorruptKind {
    /// A marker value outside the known set
    UnknownMarker { marker: u32, offset: usize },
    /// The stream ended inside a record
    Truncated { marker: Marker, offset: usize },
    /// A record count needs more bytes than the stream has left
    CountExceedsStream { marker: Marker, count: u32, available: usize },
    /// The stream ended before an END record
    MissingEnd,
    /// The decoded vertices and indices do not form a valid mesh
    InvalidGeometry(MeshError),
}

impl fmt::Display for CorruptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorruptKind::UnknownMarker { marker, offset } => {
                write!(f, "unknown marker {} at offset {}", marker, offset)
            }
            CorruptKind::Truncated { marker, offset } => {
                write!(f, "{:?} record truncated at offset {}", marker, offset)
            }
            CorruptKind::CountExceedsStream { marker, count, available } => write!(
                f,
                "{:?} count {} needs more than the {} bytes remaining",
                marker, count, available
            ),
            CorruptKind::MissingEnd => write!(f, "stream ended without an END marker"),
            CorruptKind::InvalidGeometry(err) => write!(f, "invalid geometry: {}", err),
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(err) => write!(f, "Persistence IO error: {}", err),
            PersistError::NotFound(path) => write!(f, "Object file not found: {}", path.display()),
            PersistError::Corrupt(kind) => write!(f, "Corrupt object data: {}", kind),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(err) => Some(err),
            PersistError::Corrupt(CorruptKind::InvalidGeometry(err)) => Some(err),
            PersistError::NotFound(_) | PersistError::Corrupt(_) => None,
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(err: io::Error) -> Self {
        PersistError::Io(err)
    }
}

impl From<CorruptKind> for PersistError {
    fn from(kind: CorruptKind) -> Self {
        PersistError::Corrupt(kind)
    }
}
