//! Place store: durable collection, persistence and change notification.
//!
//! # Responsibility
//! - Own the in-memory place list and its JSON file.
//! - Publish change events for the presentation layer.
//!
//! # Invariants
//! - Store operations recover locally; persistence errors never propagate
//!   out of the non-`try_` entry points.
//! - Mutation happens only through `&mut PlaceStore` on one context.

use crate::model::place::PlaceId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod events;
pub mod file;
pub mod place_store;

pub type PersistResult<T> = Result<T, PersistError>;

/// Backing-file load/save errors.
#[derive(Debug)]
pub enum PersistError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode(serde_json::Error),
    Encode(serde_json::Error),
    /// JSON has no NaN/infinity; saving would write `null` and corrupt the file.
    NonFiniteCoordinate(PlaceId),
}

impl PersistError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error means "no file yet" rather than a broken file.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Decode(err) => write!(f, "corrupt place file: {err}"),
            Self::Encode(err) => write!(f, "failed to encode places: {err}"),
            Self::NonFiniteCoordinate(id) => {
                write!(f, "place {id} has a non-finite coordinate")
            }
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::NonFiniteCoordinate(_) => None,
        }
    }
}
