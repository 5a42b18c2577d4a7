//! Error types for the directory service
//!
//! Every operation fails with exactly one [`DirectoryError`]. Transports map
//! [`ErrorKind`] to whatever response scheme they speak.

use orgdir_store::{Constraint, StoreError, Table};
use orgdir_taxonomy::{TaxonomyError, MAX_DEPTH};
use std::fmt;

/// Entity addressed by a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Activity node
    Activity,
    /// Organization
    Organization,
    /// Building
    Building,
    /// Phone
    Phone,
    /// Organization ↔ activity association
    Link,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activity => "activity",
            Self::Organization => "organization",
            Self::Building => "building",
            Self::Phone => "phone",
            Self::Link => "link",
        })
    }
}

impl From<Table> for Entity {
    fn from(table: Table) -> Self {
        match table {
            Table::Activities => Self::Activity,
            Table::Organizations => Self::Organization,
            Table::Buildings => Self::Building,
            Table::Phones => Self::Phone,
            Table::Links => Self::Link,
        }
    }
}

/// Main directory error type
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Referenced entity absent
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity
        entity: Entity,
        /// Identifier or path looked up
        key: String,
    },

    /// Tree would exceed the depth limit
    #[error("activity '{path}' would exceed maximum depth {max}")]
    DepthExceeded {
        /// Offending path
        path: String,
        /// Depth limit
        max: usize,
    },

    /// Path collision, detected in code or by the storage constraint
    #[error("activity path already exists: {0}")]
    DuplicatePath(String),

    /// Duplicate association pair
    #[error("conflict: {0} already exists")]
    Conflict(String),

    /// Query legitimately matched nothing
    #[error("no results: {0}")]
    EmptyResult(String),

    /// Input rejected before touching storage
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// API key missing or wrong
    #[error("unauthorized: invalid or missing api key")]
    Unauthorized,

    /// Backend failure that is not a constraint violation
    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

/// Flat error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`DirectoryError::NotFound`]
    NotFound,
    /// See [`DirectoryError::DepthExceeded`]
    DepthExceeded,
    /// See [`DirectoryError::DuplicatePath`]
    DuplicatePath,
    /// See [`DirectoryError::Conflict`]
    Conflict,
    /// See [`DirectoryError::EmptyResult`]
    EmptyResult,
    /// See [`DirectoryError::InvalidInput`]
    InvalidInput,
    /// See [`DirectoryError::Unauthorized`]
    Unauthorized,
    /// See [`DirectoryError::Storage`]
    Storage,
    /// See [`DirectoryError::Config`]
    Config,
}

impl ErrorKind {
    /// Stable snake_case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::DepthExceeded => "depth_exceeded",
            Self::DuplicatePath => "duplicate_path",
            Self::Conflict => "conflict",
            Self::EmptyResult => "empty_result",
            Self::InvalidInput => "invalid_input",
            Self::Unauthorized => "unauthorized",
            Self::Storage => "storage",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DirectoryError {
    /// Create not-found error
    pub fn not_found(entity: Entity, key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Create empty-result error
    pub fn empty(query: impl Into<String>) -> Self {
        Self::EmptyResult(query.into())
    }

    /// Create invalid-input error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Classification of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            Self::DuplicatePath(_) => ErrorKind::DuplicatePath,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::EmptyResult(_) => ErrorKind::EmptyResult,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Check if the caller can fix the request and retry
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Config(_))
    }
}

impl From<TaxonomyError> for DirectoryError {
    fn from(err: TaxonomyError) -> Self {
        match err {
            TaxonomyError::DepthExceeded { path, max } => Self::DepthExceeded { path, max },
            TaxonomyError::DuplicatePath(path) => Self::DuplicatePath(path),
            TaxonomyError::RootNotFound(path) => Self::not_found(Entity::Activity, path),
            TaxonomyError::InvalidInput(reason) => Self::InvalidInput(reason),
            other @ (TaxonomyError::EmptyPath
            | TaxonomyError::EmptySegment
            | TaxonomyError::InvalidSegment(_)) => Self::InvalidInput(other.to_string()),
        }
    }
}

/// Constraint violations are translated here and nowhere else
impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation {
                constraint: Constraint::ActivityPath,
                key,
            } => Self::DuplicatePath(key),
            StoreError::UniqueViolation {
                constraint: Constraint::LinkPair,
                key,
            } => Self::Conflict(format!("link {key}")),
            StoreError::CheckViolation {
                constraint: Constraint::ActivityDepth,
                key,
            } => Self::DepthExceeded {
                path: key,
                max: MAX_DEPTH,
            },
            StoreError::ForeignKeyViolation { constraint, key } => match constraint {
                Constraint::ActivityParent | Constraint::LinkActivity => {
                    Self::not_found(Entity::Activity, key)
                }
                Constraint::LinkOrganization | Constraint::PhoneOrganization => {
                    Self::not_found(Entity::Organization, key)
                }
                Constraint::OrganizationBuilding => Self::not_found(Entity::Building, key),
                Constraint::PrimaryKey(table) => Self::not_found(table.into(), key),
                Constraint::ActivityPath | Constraint::ActivityDepth | Constraint::LinkPair => {
                    Self::Storage(StoreError::foreign_key(constraint, key))
                }
            },
            StoreError::RowNotFound { table, key } => Self::not_found(table.into(), key),
            other => Self::Storage(other),
        }
    }
}
