//! Patch coordinates encoded in filenames.
//!
//! Patches are written by the tiler as `<x>_<y>.<ext>`, where `(x, y)` is the
//! pixel-space origin of the patch on the level-0 slide. Everything after the
//! first `.` is ignored, so `512_1024.jpg` and `512_1024.q80.jpg` both parse
//! to `(512, 1024)`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoordParseError;

/// Separator between the x and y fields of a patch filename.
pub const COORD_SEPARATOR: char = '_';

/// Pixel-space origin of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    /// X coordinate in pixels (0 at the left edge)
    pub x: u32,

    /// Y coordinate in pixels (0 at the top edge)
    pub y: u32,
}

impl TileCoord {
    /// Create a coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Parse the coordinate embedded in a patch path.
    ///
    /// Only the file name is considered; parent directories may contain
    /// anything, including `_` and `.`.
    pub fn from_path(path: &Path) -> Result<Self, CoordParseError> {
        let name = path
            .file_name()
            .ok_or(CoordParseError::MissingFileName)?
            .to_string_lossy();

        let stem = name.split('.').next().unwrap_or_default();
        stem.parse()
    }

    /// The coordinate as an `[x, y]` vector.
    pub fn to_array(self) -> [u32; 2] {
        [self.x, self.y]
    }

    /// File name this coordinate would be stored under.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self, extension)
    }
}

impl FromStr for TileCoord {
    type Err = CoordParseError;

    /// Parse a bare `<x>_<y>` stem.
    fn from_str(stem: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = stem.split(COORD_SEPARATOR).collect();
        let [x, y] = fields.as_slice() else {
            return Err(CoordParseError::FieldCount {
                found: fields.len(),
            });
        };

        Ok(Self {
            x: parse_field("x", x)?,
            y: parse_field("y", y)?,
        })
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<u32, CoordParseError> {
    value
        .parse()
        .map_err(|_| CoordParseError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.x, COORD_SEPARATOR, self.y)
    }
}

impl From<TileCoord> for [u32; 2] {
    fn from(coord: TileCoord) -> Self {
        coord.to_array()
    }
}

impl From<(u32, u32)> for TileCoord {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}
