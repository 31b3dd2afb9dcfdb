//! Error types for catalog construction, scheduling and export

use crate::spatial::direction::Direction;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all world generation operations
///
/// Local contradictions during a solve are not errors: they resolve to empty
/// cells. Everything here is either a startup failure or an I/O failure.
#[derive(Debug)]
pub enum WorldError {
    /// A neighbour list references a tile name missing from the catalog
    UnknownNeighbor {
        /// Tile whose neighbour list is malformed
        tile: String,
        /// Direction of the offending list
        direction: Direction,
        /// The unresolved neighbour name
        neighbor: String,
    },

    /// Two definitions share the same name
    DuplicateTile {
        /// The repeated name
        name: String,
    },

    /// The catalog contains no tiles
    EmptyCatalog,

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A background solve could not be started
    TaskSpawn {
        /// Name of the task that failed to start
        task: String,
        /// Underlying thread creation error
        source: std::io::Error,
    },

    /// Failed to save an exported image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNeighbor {
                tile,
                direction,
                neighbor,
            } => {
                write!(
                    f,
                    "Tile '{tile}' lists unknown neighbor '{neighbor}' to the {direction}"
                )
            }
            Self::DuplicateTile { name } => write!(f, "Tile '{name}' is defined more than once"),
            Self::EmptyCatalog => write!(f, "Tile catalog contains no tiles"),
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::TaskSpawn { task, source } => {
                write!(f, "Failed to start task '{task}': {source}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::TaskSpawn { source, .. } | Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for world generation results
pub type Result<T> = std::result::Result<T, WorldError>;

impl From<std::io::Error> for WorldError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> WorldError {
    WorldError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
