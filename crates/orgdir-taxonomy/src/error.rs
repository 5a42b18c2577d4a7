//! Error types for the taxonomy crate

/// Errors produced by path construction, encoding and tree assembly
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    /// Name reduced to nothing usable by the codec
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Path with no segments
    #[error("path must have at least one segment")]
    EmptyPath,

    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Segment with characters outside the slug alphabet
    #[error("invalid segment: '{0}' (must be lowercase ascii alphanumeric or underscore)")]
    InvalidSegment(String),

    /// Path would be deeper than allowed
    #[error("path '{path}' would exceed maximum depth {max}")]
    DepthExceeded {
        /// Candidate path
        path: String,
        /// Depth limit
        max: usize,
    },

    /// Two nodes claim the same path
    #[error("duplicate path: {0}")]
    DuplicatePath(String),

    /// Requested root is not among the assembled nodes
    #[error("root path not found: {0}")]
    RootNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_error_display() {
        let err = TaxonomyError::DepthExceeded {
            path: "a.b.c.d".to_string(),
            max: 3,
        };
        assert!(err.to_string().contains("maximum depth 3"));
        assert!(TaxonomyError::RootNotFound("x".into())
            .to_string()
            .contains("root path not found"));
    }
}
