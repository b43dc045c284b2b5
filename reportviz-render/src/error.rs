//! Error types for the render layer

use reportviz_core::CompileError;
use thiserror::Error;

/// Failures reported by the host environment through the host traits
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Element not found: {id}")]
    ElementNotFound { id: String },

    #[error("Embedding failed: {message}")]
    Embed { message: String },

    #[error("Image encoding failed: {message}")]
    Encoding { message: String },

    #[error("Saving {name} failed: {message}")]
    Save { name: String, message: String },
}

impl HostError {
    pub fn embed<S: Into<String>>(message: S) -> Self {
        Self::Embed { message: message.into() }
    }

    pub fn encoding<S: Into<String>>(message: S) -> Self {
        Self::Encoding { message: message.into() }
    }

    pub fn save<S: Into<String>>(name: S, message: S) -> Self {
        Self::Save {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Main error type for render operations
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Target {target} for plot {id} is not in the document")]
    MissingTarget { id: String, target: String },

    #[error("Target {target} is already owned by another session")]
    TargetInUse { target: String },

    #[error("Unknown plot: {id}")]
    UnknownPlot { id: String },

    #[error("Unknown table: {name}")]
    UnknownTable { name: String },

    #[error("Export unavailable: {reason}")]
    ExportUnavailable { reason: String },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Host(#[from] HostError),
}

impl RenderError {
    pub fn missing_target<S: Into<String>>(id: S, target: S) -> Self {
        Self::MissingTarget {
            id: id.into(),
            target: target.into(),
        }
    }

    pub fn unknown_plot<S: Into<String>>(id: S) -> Self {
        Self::UnknownPlot { id: id.into() }
    }

    pub fn export_unavailable<S: Into<String>>(reason: S) -> Self {
        Self::ExportUnavailable { reason: reason.into() }
    }

    /// Errors that only disable one control instead of failing the action
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::ExportUnavailable { .. })
    }
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::missing_target("7", "chart-bar-7");
        assert_eq!(err.to_string(), "Target chart-bar-7 for plot 7 is not in the document");
        assert!(!err.is_degraded());

        let err = RenderError::from(HostError::encoding("canvas tainted"));
        assert_eq!(err.to_string(), "Image encoding failed: canvas tainted");
        assert!(RenderError::export_unavailable("popup blocked").is_degraded());
    }
}
