//! Error types for storage backends

use std::fmt;
use std::path::PathBuf;

/// Logical table of the directory schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Activity taxonomy nodes
    Activities,
    /// Organizations
    Organizations,
    /// Buildings
    Buildings,
    /// Phone numbers
    Phones,
    /// Organization ↔ activity association
    Links,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activities => "activities",
            Self::Organizations => "organizations",
            Self::Buildings => "buildings",
            Self::Phones => "phones",
            Self::Links => "organizations_activities",
        })
    }
}

/// Constraint enforced by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Row identifier unique within its table
    PrimaryKey(Table),
    /// Activity path unique across all activities
    ActivityPath,
    /// Activity path at most [`orgdir_taxonomy::MAX_DEPTH`] segments deep
    ActivityDepth,
    /// Parent path of an activity must belong to an existing activity
    ActivityParent,
    /// Association pair unique
    LinkPair,
    /// Association references an existing organization
    LinkOrganization,
    /// Association references an existing activity
    LinkActivity,
    /// Organization references an existing building
    OrganizationBuilding,
    /// Phone references an existing organization
    PhoneOrganization,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryKey(table) => write!(f, "{table}_pkey"),
            Self::ActivityPath => f.write_str("activities_path_key"),
            Self::ActivityDepth => f.write_str("activities_path_depth_check"),
            Self::ActivityParent => f.write_str("activities_parent_path_fkey"),
            Self::LinkPair => f.write_str("organizations_activities_pkey"),
            Self::LinkOrganization => f.write_str("organizations_activities_organization_id_fkey"),
            Self::LinkActivity => f.write_str("organizations_activities_activity_id_fkey"),
            Self::OrganizationBuilding => f.write_str("organizations_building_id_fkey"),
            Self::PhoneOrganization => f.write_str("phones_organization_id_fkey"),
        }
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint rejected a write
    #[error("unique constraint {constraint} violated by {key}")]
    UniqueViolation {
        /// Violated constraint
        constraint: Constraint,
        /// Offending key
        key: String,
    },

    /// Foreign-key constraint rejected a write
    #[error("foreign key constraint {constraint} violated by {key}")]
    ForeignKeyViolation {
        /// Violated constraint
        constraint: Constraint,
        /// Offending key
        key: String,
    },

    /// Check constraint rejected a row
    #[error("check constraint {constraint} violated by {key}")]
    CheckViolation {
        /// Violated constraint
        constraint: Constraint,
        /// Offending key
        key: String,
    },

    /// Update or delete addressed a missing row
    #[error("{table} row not found: {key}")]
    RowNotFound {
        /// Table addressed
        table: Table,
        /// Key addressed
        key: String,
    },

    /// Snapshot (de)serialization failed
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file could not be read or written
    #[error("io error on {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Backend cannot serve requests
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create unique violation
    pub fn unique(constraint: Constraint, key: impl fmt::Display) -> Self {
        Self::UniqueViolation {
            constraint,
            key: key.to_string(),
        }
    }

    /// Create foreign-key violation
    pub fn foreign_key(constraint: Constraint, key: impl fmt::Display) -> Self {
        Self::ForeignKeyViolation {
            constraint,
            key: key.to_string(),
        }
    }

    /// Create check violation
    pub fn check(constraint: Constraint, key: impl fmt::Display) -> Self {
        Self::CheckViolation {
            constraint,
            key: key.to_string(),
        }
    }

    /// Create missing-row error
    pub fn row_not_found(table: Table, key: impl fmt::Display) -> Self {
        Self::RowNotFound {
            table,
            key: key.to_string(),
        }
    }

    /// Whether this error is a constraint violation
    #[inline]
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::UniqueViolation { .. }
                | Self::ForeignKeyViolation { .. }
                | Self::CheckViolation { .. }
        )
    }
}
