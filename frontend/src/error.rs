use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {details}")]
    ConfigParse { path: PathBuf, details: String },

    #[error("failed to write config: {0}")]
    ConfigWrite(String),

    #[error("failed to encode settings record: {0}")]
    RecordEncode(#[from] bincode::Error),

    #[error("failed to spawn emulator {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to signal emulator: {0}")]
    Signal(#[source] std::io::Error),

    #[error("sdl: {0}")]
    Sdl(String),

    #[error("font: {0}")]
    Font(String),
}

impl ShellError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShellError::Io {
            path: path.into(),
            source,
        }
    }
}
