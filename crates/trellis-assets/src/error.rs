use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failures while loading assets.
#[derive(Debug)]
pub enum AssetError {
    Io { path: PathBuf, source: io::Error },
    /// The bytes registered for `family` are not a font we can read.
    InvalidFont { family: String, reason: &'static str },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            AssetError::InvalidFont { family, reason } => {
                write!(f, "invalid font for family {family:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::InvalidFont { .. } => None,
        }
    }
}
