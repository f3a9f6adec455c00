//! Shared error types for resolution and relocation

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One entry of a rename collision: an original module name and the
/// flattened name it would receive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollidingPair {
    pub old_name: String,
    pub new_name: String,
}

impl fmt::Display for CollidingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.old_name, self.new_name)
    }
}

/// Main error type for modreloc operations
#[derive(Debug, Error)]
pub enum Error {
    /// Entry point could not be located or has no source file
    #[error("Cannot resolve entry point '{entry}': {message}")]
    Resolution { entry: String, message: String },

    /// Two or more modules flatten to the same new name
    #[error(
        "There is a collision between two or more module names: {}. You need to rename these modules to have unique names.",
        format_pairs(.pairs)
    )]
    Collision { pairs: Vec<CollidingPair> },

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Source could not be parsed for imports
    #[error("Parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid project root pattern
    #[error(transparent)]
    Pattern(#[from] regex::Error),

    /// Two sequences expected to be the same length were not
    #[error("Length mismatch: left has {left} elements, right has {right}")]
    LengthMismatch { left: usize, right: usize },
}

fn format_pairs(pairs: &[CollidingPair]) -> String {
    pairs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a resolution error for an entry point
    pub fn resolution(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with path context and the underlying cause
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Path associated with the error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileSystem { path, .. } => path.as_ref(),
            Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether the error was raised before anything was written to the
    /// destination directory.
    pub fn is_pre_mutation(&self) -> bool {
        matches!(
            self,
            Self::Resolution { .. }
                | Self::Collision { .. }
                | Self::Configuration(_)
                | Self::Pattern(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
