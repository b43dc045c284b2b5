//! Error handling for the reportviz CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reportviz CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid report data in {file}: {message}")]
    InvalidReport { file: String, message: String },

    #[error("No {kind} named '{name}' in the report")]
    NotInReport { kind: String, name: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_report<S: Into<String>>(file: S, message: S) -> Self {
        Self::InvalidReport {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn not_in_report<S: Into<String>>(kind: S, name: S) -> Self {
        Self::NotInReport {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::InvalidReport { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • The report file must be a JSON object with 'datasets' and 'tables'\n\
                 • Ensure the file is not truncated",
            );
        }

        CliError::NotInReport { kind, .. } if kind == "plot" => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Plot ids are the 'id' fields of the report's datasets\n\
                 • Only Hexbin plots have node lists",
            );
        }

        CliError::NotInReport { .. } => {
            message.push_str("\n\nSuggestions:\n • Table names are the keys of the report's 'tables' object");
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your reportviz.toml configuration file\n\
                 • Use 'reportviz config --example' to generate a sample configuration",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("report.json"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));

        let err = CliError::not_in_report("plot", "hx");
        assert!(format_error_with_suggestions(&err).contains("Hexbin"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io { .. }));
    }
}
