//! Error type shared by detection, state and host plumbing

use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum ExtError {
    /// Directory listing failed at the OS level
    Probe { path: String, reason: String },
    /// Neither build marker was found under the game folder
    Classification { managed_dir: String, il2cpp_dir: String },
    /// The host could not locate the game
    GameNotFound { game: String },
    /// Persisted state could not be read or written
    State { reason: String },
    /// A host capability failed
    Host { context: String, reason: String },
}

impl ExtError {
    pub fn probe(path: &Path, err: impl std::fmt::Display) -> Self {
        ExtError::Probe {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn host(context: &str, err: impl std::fmt::Display) -> Self {
        ExtError::Host {
            context: context.to_string(),
            reason: err.to_string(),
        }
    }
}

impl std::fmt::Display for ExtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtError::Probe { path, reason } => {
                write!(f, "Failed to read directory '{}': {}", path, reason)
            }
            ExtError::Classification { managed_dir, il2cpp_dir } => write!(
                f,
                "Couldn't find \"{}\" or \"{}\" under the game folder, is the game installed correctly?",
                managed_dir, il2cpp_dir
            ),
            ExtError::GameNotFound { game } => {
                write!(f, "Could not locate an installation of {}", game)
            }
            ExtError::State { reason } => write!(f, "State store error: {}", reason),
            ExtError::Host { context, reason } => write!(f, "{}: {}", context, reason),
        }
    }
}

impl std::error::Error for ExtError {}
