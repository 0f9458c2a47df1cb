//! Error types for makeinfo conversions

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ConvertError {
    /// The configured program could not be resolved to an executable.
    ProgramNotFound {
        program: String,
        source: which::Error,
    },
    /// The program was found but could not be started.
    Spawn(io::Error),
    /// Standard output exceeded the configured limit.
    OutputTooLarge { limit: u64 },
    /// makeinfo exited unsuccessfully; `log` holds what it reported.
    Rejected { log: String },
    /// Writing the converted document failed.
    Io(io::Error),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::ProgramNotFound { program, source } => {
                write!(f, "cannot find makeinfo program '{}': {}", program, source)
            }
            ConvertError::Spawn(err) => write!(f, "failed to run makeinfo: {}", err),
            ConvertError::OutputTooLarge { limit } => {
                write!(f, "makeinfo output exceeds the limit of {} bytes", limit)
            }
            ConvertError::Rejected { log } => write!(f, "makeinfo failed:\n{}", log.trim_end()),
            ConvertError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::ProgramNotFound { source, .. } => Some(source),
            ConvertError::Spawn(err) | ConvertError::Io(err) => Some(err),
            ConvertError::OutputTooLarge { .. } | ConvertError::Rejected { .. } => None,
        }
    }
}

impl From<io::Error> for ConvertError {
    fn from(err: io::Error) -> Self {
        ConvertError::Io(err)
    }
}
