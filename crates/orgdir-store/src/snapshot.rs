//! Portable dump of every table

use crate::error::StoreError;
use crate::records::{ActivityLink, Building, Organization, Phone};
use orgdir_taxonomy::ActivityNode;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Every row of the directory, ordered by identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Buildings
    #[serde(default)]
    pub buildings: Vec<Building>,
    /// Organizations
    #[serde(default)]
    pub organizations: Vec<Organization>,
    /// Phones
    #[serde(default)]
    pub phones: Vec<Phone>,
    /// Activities
    #[serde(default)]
    pub activities: Vec<ActivityNode>,
    /// Organization ↔ activity associations
    #[serde(default)]
    pub links: Vec<ActivityLink>,
}

impl Snapshot {
    /// Parse from JSON
    ///
    /// # Errors
    /// Returns [`StoreError::Serialization`] on malformed input, including
    /// activity paths that do not parse
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as pretty JSON
    ///
    /// # Errors
    /// Returns [`StoreError::Serialization`] if rendering fails
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a snapshot file; a missing file is an empty snapshot
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] or [`StoreError::Serialization`]
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no snapshot file, starting empty");
                Ok(Self::default())
            }
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write a snapshot file
    ///
    /// The JSON goes to a temporary file beside `path` which is then renamed
    /// over it, so readers see either the old or the new snapshot in full.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] or [`StoreError::Serialization`]
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = self.to_json()?;
        let io = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(io)?;
        staged.write_all(json.as_bytes()).map_err(io)?;
        staged.as_file().sync_all().map_err(io)?;
        staged.persist(path).map_err(|err| io(err.error))?;
        Ok(())
    }

    /// Total row count
    #[must_use]
    pub fn rows(&self) -> usize {
        self.buildings.len()
            + self.organizations.len()
            + self.phones.len()
            + self.activities.len()
            + self.links.len()
    }
}
