//! Materialized activity paths
//!
//! Provides [`ActivityPath`], the full lineage of an activity node encoded as
//! a dot-delimited sequence of segments.

use crate::error::TaxonomyError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between path segments
pub const SEPARATOR: char = '.';

/// Maximum number of segments a stored activity path may have
pub const MAX_DEPTH: usize = 3;

/// Path of an activity in the taxonomy forest
///
/// Always holds at least one segment. Every segment is a codec-produced slug:
/// lowercase ASCII letters, digits and underscores, with at least one letter
/// or digit.
///
/// # Examples
/// - `["perevozki"]` → `perevozki` (depth 1, a root)
/// - `["perevozki", "gruzovye"]` → `perevozki.gruzovye` (depth 2)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActivityPath(Vec<String>);

impl ActivityPath {
    /// Create path from segments
    ///
    /// # Errors
    /// Returns error if there are no segments or a segment is malformed
    pub fn new(segments: Vec<String>) -> Result<Self, TaxonomyError> {
        if segments.is_empty() {
            return Err(TaxonomyError::EmptyPath);
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Create a depth-1 path
    ///
    /// # Errors
    /// Returns error if the segment is malformed
    pub fn root(segment: impl Into<String>) -> Result<Self, TaxonomyError> {
        let segment = segment.into();
        validate_segment(&segment)?;
        Ok(Self(vec![segment]))
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this path has no parent
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Whether the depth is within [`MAX_DEPTH`]
    #[inline]
    #[must_use]
    pub fn within_max_depth(&self) -> bool {
        self.depth() <= MAX_DEPTH
    }

    /// Parent path, obtained by dropping the final segment
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// First segment, i.e. the segment of the tree root
    #[inline]
    #[must_use]
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    /// Last segment
    #[inline]
    #[must_use]
    pub fn last(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    /// Path of the depth-1 ancestor (or self for a root)
    #[must_use]
    pub fn root_path(&self) -> Self {
        Self(vec![self.0[0].clone()])
    }

    /// Append a segment, returning the child path
    ///
    /// Depth is not checked here; callers that persist paths must.
    ///
    /// # Errors
    /// Returns error if the segment is malformed
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, TaxonomyError> {
        let segment = segment.into();
        validate_segment(&segment)?;
        let mut segments = self.0.clone();
        segments.push(segment);
        Ok(Self(segments))
    }

    /// Check if this path equals `other` or is one of its ancestors
    ///
    /// Comparison is segment-wise, so `retail` is a prefix of
    /// `retail.food` but not of `retailer`.
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Check if this path is a strict ancestor of `other`
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Key used by prefix indexes
    ///
    /// Every segment is followed by the separator (`a.b.`), so a plain
    /// string-prefix scan for `a.` matches `a` and its descendants but never
    /// a sibling such as `ab`.
    #[must_use]
    pub fn index_key(&self) -> String {
        let mut key = String::with_capacity(self.0.iter().map(|s| s.len() + 1).sum());
        for segment in &self.0 {
            key.push_str(segment);
            key.push(SEPARATOR);
        }
        key
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Validate a single path segment
///
/// # Errors
/// Returns [`TaxonomyError::EmptySegment`] for an empty segment and
/// [`TaxonomyError::InvalidSegment`] for any other malformed one
pub fn validate_segment(segment: &str) -> Result<(), TaxonomyError> {
    if segment.is_empty() {
        return Err(TaxonomyError::EmptySegment);
    }
    let allowed = segment
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    let has_alnum = segment.bytes().any(|b| b.is_ascii_alphanumeric());
    if allowed && has_alnum {
        Ok(())
    } else {
        Err(TaxonomyError::InvalidSegment(segment.to_string()))
    }
}

impl Display for ActivityPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ActivityPath {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TaxonomyError::EmptyPath);
        }
        Self::new(s.split(SEPARATOR).map(str::to_string).collect())
    }
}

impl TryFrom<String> for ActivityPath {
    type Error = TaxonomyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActivityPath> for String {
    fn from(path: ActivityPath) -> Self {
        path.to_string()
    }
}
