//! Error types for project loading and pose resolution

/// Errors surfaced by the loader, the pose engine and the project store.
///
/// Field-level problems in a project document never show up here: the
/// loader substitutes defaults for those. What remains are documents that
/// cannot be read at all and internal-consistency violations met while
/// resolving a pose.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CutoutError {
    /// The document is not valid JSON
    #[error("Failed to parse project document: {reason}")]
    Parse { reason: String },

    /// The document root is valid JSON but not an object
    #[error("Project document root must be an object, got {found}")]
    InvalidDocument { found: &'static str },

    /// A mainline reference resolved to a timeline whose object kind the
    /// resolver cannot handle
    #[error("Timeline '{timeline}' has unsupported object kind '{kind}'")]
    UnsupportedObjectKind { timeline: String, kind: String },

    /// A mainline reference points past the timeline or keyframe arrays
    #[error("Broken {what} reference {index} in animation '{animation}'")]
    BrokenReference {
        animation: String,
        what: &'static str,
        index: i32,
    },

    /// No project stored under the requested key
    #[error("Project not found: {key}")]
    ProjectNotFound { key: String },
}

impl CutoutError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse { .. } | Self::InvalidDocument { .. } => "load",
            Self::UnsupportedObjectKind { .. } | Self::BrokenReference { .. } => "resolve",
            Self::ProjectNotFound { .. } => "store",
        }
    }
}

impl From<serde_json::Error> for CutoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = CutoutError::InvalidDocument { found: "array" };
        assert_eq!(err.category(), "load");

        let err = CutoutError::UnsupportedObjectKind {
            timeline: "arm".to_string(),
            kind: "mesh".to_string(),
        };
        assert_eq!(err.category(), "resolve");
        assert!(err.to_string().contains("mesh"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: CutoutError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, CutoutError::Parse { .. }));
    }
}
