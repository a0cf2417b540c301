//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

use query_engine_metadata::metadata::TemplateError;

/// The errors that can be thrown when parsing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    // This is a workaround for not being able to keep the path next to an I/O error.
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

/// The errors that can be thrown when writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum WriteParsedConfigurationError {
    #[error("Not allowed to write to '{file}' outside destination dir '{dir}'")]
    WritingOutsideDestinationDir { dir: PathBuf, file: PathBuf },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The errors that can be thrown when turning parsed configuration into runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("unsupported configuration version {0}, expected 1")]
    UnsupportedVersion(u32),

    #[error("invalid configuration: {message}")]
    MissingEnvironmentVariable { message: String },

    #[error("the query template file '{}' was not read during parsing", file.display())]
    TemplateNotRead { file: PathBuf },

    #[error("invalid query template: {0}")]
    InvalidTemplate(#[from] TemplateError),
}
