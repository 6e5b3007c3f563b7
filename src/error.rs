use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by transforms.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when extracting a coordinate from a patch filename
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordParseError {
    /// Path has no final component to parse
    #[error("path has no file name")]
    MissingFileName,

    /// Stem did not split into exactly two `_`-separated fields
    #[error("expected 2 '_'-separated fields, found {found}")]
    FieldCount { found: usize },

    /// A field is not a non-negative integer
    #[error("{field} field is not a non-negative integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
}

/// Errors raised while building or reading a patch dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The patch directory could not be listed
    #[error("Cannot list patch directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Requested index is not in `[0, len)`
    #[error("Index {index} out of range for dataset of {len} patches")]
    IndexOutOfRange { index: usize, len: usize },

    /// Filename does not follow the `<x>_<y>.jpg` convention
    #[error("Malformed patch filename {path}: {source}")]
    MalformedFilename {
        path: PathBuf,
        #[source]
        source: CoordParseError,
    },

    /// Patch file is missing, unreadable or not a valid image
    #[error("Failed to decode patch {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A caller-supplied transform failed
    #[error("Transform '{name}' failed: {source}")]
    Transform {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Decoded-image cache must hold at least one entry
    #[error("Cache capacity must be greater than 0")]
    InvalidCacheCapacity,
}

impl DatasetError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DatasetError::DirectoryAccess { .. } => "directory_access",
            DatasetError::IndexOutOfRange { .. } => "index_out_of_range",
            DatasetError::MalformedFilename { .. } => "malformed_filename",
            DatasetError::ImageDecode { .. } => "image_decode",
            DatasetError::Transform { .. } => "transform",
            DatasetError::InvalidCacheCapacity => "invalid_cache_capacity",
        }
    }
}
