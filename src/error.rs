use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sheetcut operations
#[derive(Error, Diagnostic, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    #[diagnostic(code(sheetcut::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(sheetcut::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Failed to decode {path}: {message}")]
    #[diagnostic(code(sheetcut::decode))]
    Decode {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(sheetcut::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Pipeline error: {message}")]
    #[diagnostic(code(sheetcut::pipeline))]
    Pipeline {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SheetError>;
