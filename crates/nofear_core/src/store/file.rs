//! JSON file backing for the place collection.
//!
//! # Responsibility
//! - Decode the persisted place array, treating any deviation as corruption.
//! - Replace the file atomically with owner-only permissions on save.
//!
//! # Invariants
//! - The target path never holds a partially written document.
//! - A save that cannot round-trip (non-finite coordinate) leaves the
//!   previous file untouched.
//! - A decoded collection never contains two places with the same id; later
//!   repeats of an id are dropped, earlier records stay reachable.

use crate::config::StoreConfig;
use crate::model::place::Place;
use crate::store::{PersistError, PersistResult};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Handle to the single on-disk place file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceFile {
    path: PathBuf,
}

impl PlaceFile {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::at(config.save_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the stored collection.
    ///
    /// # Errors
    /// - `PersistError::Io` when the file is missing or unreadable.
    /// - `PersistError::Decode` when the content is not a place array.
    pub fn load(&self) -> PersistResult<Vec<Place>> {
        let bytes = fs::read(&self.path).map_err(|err| PersistError::io(&self.path, err))?;
        let decoded: Vec<Place> = serde_json::from_slice(&bytes).map_err(PersistError::Decode)?;

        let decoded_len = decoded.len();
        let mut seen = HashSet::with_capacity(decoded_len);
        let places: Vec<Place> = decoded
            .into_iter()
            .filter(|place| seen.insert(place.id))
            .collect();
        if places.len() != decoded_len {
            warn!(
                "event=file_read module=store status=degraded reason=duplicate_id dropped={}",
                decoded_len - places.len()
            );
        }

        debug!(
            "event=file_read module=store status=ok bytes={} count={}",
            bytes.len(),
            places.len()
        );
        Ok(places)
    }

    /// Encodes `places` and atomically replaces the file.
    ///
    /// Writes to a randomly named sibling temp file, syncs it, then renames
    /// it over the target. On unix the file is created `0o600`.
    ///
    /// # Errors
    /// - `PersistError::NonFiniteCoordinate` before anything is written, since
    ///   JSON cannot carry NaN or infinity.
    pub fn save(&self, places: &[Place]) -> PersistResult<()> {
        let started_at = Instant::now();
        if let Some(place) = places.iter().find(|place| !place.coordinate().is_finite()) {
            return Err(PersistError::NonFiniteCoordinate(place.id));
        }
        let bytes = serde_json::to_vec(places).map_err(PersistError::Encode)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|err| PersistError::io(&dir, err))?;

        if let Err(err) = write_atomic(&dir, &self.path, &bytes) {
            error!(
                "event=file_write module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }

        info!(
            "event=file_write module=store status=ok bytes={} count={} duration_ms={}",
            bytes.len(),
            places.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> PersistResult<()> {
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| PersistError::io(dir, err))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|err| PersistError::io(temp.path(), err))?;
    }

    temp.as_file_mut()
        .write_all(bytes)
        .map_err(|err| PersistError::io(temp.path(), err))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| PersistError::io(temp.path(), err))?;
    temp.persist(target)
        .map_err(|err| PersistError::io(target, err.error))?;
    Ok(())
}
