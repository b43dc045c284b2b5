//! Error types for descriptor parsing and specification compilation

use thiserror::Error;

/// Errors raised while turning a raw dataset entry into a [`PlotDescriptor`](crate::PlotDescriptor)
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Descriptor has no 'type' tag")]
    MissingTag,

    #[error("Unsupported descriptor type: {kind}")]
    Unsupported { kind: String },

    #[error("Malformed {kind} descriptor: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DescriptorError {
    pub fn unsupported<S: Into<String>>(kind: S) -> Self {
        Self::Unsupported { kind: kind.into() }
    }

    pub fn malformed<S: Into<String>>(kind: S, source: serde_json::Error) -> Self {
        Self::Malformed {
            kind: kind.into(),
            source,
        }
    }

    /// True when the entry should be skipped rather than reported as broken input
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Errors raised by the specification compiler
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Descriptor {id} ({kind}) cannot be compiled into a chart")]
    UnsupportedDescriptor { id: String, kind: String },

    #[error("Embedded specification of {id} is not a JSON object")]
    InvalidSpec { id: String },
}

impl CompileError {
    pub fn unsupported<S: Into<String>>(id: S, kind: S) -> Self {
        Self::UnsupportedDescriptor {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while loading a report data file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid report data: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    pub fn io<P: AsRef<std::path::Path>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DescriptorError::unsupported("Sankey");
        assert!(err.is_unsupported());
        assert_eq!(err.to_string(), "Unsupported descriptor type: Sankey");

        let err = CompileError::unsupported("dl-1", "DownloadHelper");
        assert_eq!(
            err.to_string(),
            "Descriptor dl-1 (DownloadHelper) cannot be compiled into a chart"
        );
    }

    #[test]
    fn test_malformed_keeps_source() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = DescriptorError::malformed("Bar", source);
        assert!(!err.is_unsupported());
        assert!(std::error::Error::source(&err).is_some());
    }
}
