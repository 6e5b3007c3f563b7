//! Directory-backed patch dataset.
//!
//! # Design Decisions
//!
//! - **List once**: the directory is listed when the dataset is built. Files
//!   added or removed afterwards are not observed.
//!
//! - **Sorted listing**: entries are sorted by path so that index `i` names
//!   the same patch on every platform and every run.
//!
//! - **Decode per call**: nothing is cached; every retrieval reopens and
//!   decodes the file. See [`CachedPatchDataset`](super::CachedPatchDataset)
//!   for the opt-in cached variant.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageReader};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::DatasetError;
use crate::transform::TransformRegistry;

use super::coord::TileCoord;
use super::indexed::{DatasetIter, IndexedDataset};

/// File extension of indexed patches.
pub const PATCH_EXTENSION: &str = "jpg";

// =============================================================================
// Patch Sample
// =============================================================================

/// Result of retrieving one patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchSample<T> {
    /// Transform outputs keyed by transform name, in registry order
    pub outputs: IndexMap<String, T>,

    /// Pixel-space origin parsed from the filename
    pub coord: TileCoord,
}

impl<T> PatchSample<T> {
    /// Output of the transform registered under `name`.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.outputs.get(name)
    }

    /// Coordinate as an `[x, y]` vector.
    pub fn coords(&self) -> [u32; 2] {
        self.coord.to_array()
    }

    /// Split into the output map and the `[x, y]` vector.
    pub fn into_parts(self) -> (IndexMap<String, T>, [u32; 2]) {
        (self.outputs, self.coord.to_array())
    }
}

// =============================================================================
// Patch Dataset
// =============================================================================

/// Random-access dataset over a directory of `<x>_<y>.jpg` patches.
///
/// # Example
///
/// ```no_run
/// use patch_dataset::patch::PatchDataset;
/// use patch_dataset::transform::{Representation, Resize, ToTensor, TransformRegistry};
///
/// let transforms: TransformRegistry<Representation> = TransformRegistry::new()
///     .with("thumb", Resize::new(64, 64))
///     .with("tensor", ToTensor);
///
/// let dataset = PatchDataset::new("patches/slide-001", transforms)?;
/// for index in 0..dataset.len() {
///     let sample = dataset.get(index)?;
///     println!("{:?} -> {:?}", sample.coords(), sample.outputs.keys());
/// }
/// # Ok::<(), patch_dataset::DatasetError>(())
/// ```
pub struct PatchDataset<T> {
    /// Directory the patches were listed from
    dir: PathBuf,

    /// Patch paths in index order
    patches: Vec<PathBuf>,

    /// Transforms applied on every retrieval
    transforms: TransformRegistry<T>,
}

impl<T> PatchDataset<T> {
    /// List `dir` and build a dataset applying `transforms` on retrieval.
    ///
    /// Every entry with the `.jpg` extension is indexed, whatever its file
    /// type. No image is opened here, so unreadable entries fail on retrieval.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DirectoryAccess`] if the directory or one of
    /// its entries cannot be read.
    pub fn new(dir: impl AsRef<Path>, transforms: TransformRegistry<T>) -> Result<Self, DatasetError> {
        let dir = dir.as_ref().to_path_buf();
        let patches = list_patches(&dir)?;

        debug!(
            dir = %dir.display(),
            patches = patches.len(),
            transforms = transforms.len(),
            "Indexed patch directory"
        );

        Ok(Self {
            dir,
            patches,
            transforms,
        })
    }

    /// List `dir` and build a dataset with no transforms.
    ///
    /// Retrievals return an empty output map alongside the coordinate.
    pub fn without_transforms(dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        Self::new(dir, TransformRegistry::new())
    }

    /// Number of indexed patches.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Returns true if the directory held no patches.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Directory the dataset was built from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All patch paths in index order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.patches
    }

    /// Path of the patch at `index`.
    pub fn path(&self, index: usize) -> Option<&Path> {
        self.patches.get(index).map(PathBuf::as_path)
    }

    pub fn transforms(&self) -> &TransformRegistry<T> {
        &self.transforms
    }

    /// Parse the coordinate of the patch at `index` without decoding it.
    pub fn coord(&self, index: usize) -> Result<TileCoord, DatasetError> {
        let path = self.checked_path(index)?;
        TileCoord::from_path(path).map_err(|source| DatasetError::MalformedFilename {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse the coordinate and decode the patch at `index`.
    ///
    /// Transforms are not applied.
    pub fn decode(&self, index: usize) -> Result<(DynamicImage, TileCoord), DatasetError> {
        let coord = self.coord(index)?;
        let image = decode_patch(&self.patches[index])?;
        Ok((image, coord))
    }

    /// Retrieve the patch at `index`.
    ///
    /// Parses the coordinate, decodes the image, then applies every
    /// registered transform in order. Any failure aborts the retrieval;
    /// there are no partial results.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::IndexOutOfRange`] if `index >= len()`
    /// - [`DatasetError::MalformedFilename`] if the name is not `<x>_<y>.jpg`
    /// - [`DatasetError::ImageDecode`] if the file cannot be read or decoded
    /// - [`DatasetError::Transform`] if a transform fails
    pub fn get(&self, index: usize) -> Result<PatchSample<T>, DatasetError> {
        let (image, coord) = self.decode(index)?;
        self.finish(index, &image, coord)
    }

    /// Iterate over every patch in index order.
    pub fn iter(&self) -> DatasetIter<'_, Self> {
        DatasetIter::new(self)
    }

    /// Apply the transforms to an already decoded patch.
    pub(crate) fn finish(
        &self,
        index: usize,
        image: &DynamicImage,
        coord: TileCoord,
    ) -> Result<PatchSample<T>, DatasetError> {
        let outputs = self.transforms.apply_all(image)?;

        trace!(
            index = index,
            x = coord.x,
            y = coord.y,
            outputs = outputs.len(),
            "Retrieved patch"
        );

        Ok(PatchSample { outputs, coord })
    }

    fn checked_path(&self, index: usize) -> Result<&Path, DatasetError> {
        self.path(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.patches.len(),
        })
    }
}

impl<T> IndexedDataset for PatchDataset<T> {
    type Item = PatchSample<T>;

    fn len(&self) -> usize {
        PatchDataset::len(self)
    }

    fn get(&self, index: usize) -> Result<Self::Item, DatasetError> {
        PatchDataset::get(self, index)
    }
}

impl<'a, T> IntoIterator for &'a PatchDataset<T> {
    type Item = Result<PatchSample<T>, DatasetError>;
    type IntoIter = DatasetIter<'a, PatchDataset<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for PatchDataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchDataset")
            .field("dir", &self.dir)
            .field("patches", &self.patches.len())
            .field("transforms", &self.transforms)
            .finish()
    }
}

// =============================================================================
// Filesystem Helpers
// =============================================================================

/// List the `.jpg` files directly inside `dir`, sorted by path.
pub fn list_patches(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let access_error = |source: std::io::Error| DatasetError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    };

    let mut patches = Vec::new();
    for entry in fs::read_dir(dir).map_err(access_error)? {
        let path = entry.map_err(access_error)?.path();
        let is_patch = path
            .extension()
            .is_some_and(|ext| ext == PATCH_EXTENSION);

        if is_patch {
            patches.push(path);
        }
    }

    patches.sort();
    Ok(patches)
}

/// Decode a patch file, sniffing the format from its content.
pub(crate) fn decode_patch(path: &Path) -> Result<DynamicImage, DatasetError> {
    let decode_error = |source: ImageError| DatasetError::ImageDecode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(ImageError::IoError(e)))?;

    reader.decode().map_err(decode_error)
}

// =============================================================================
// Tests
// =============================================================================
