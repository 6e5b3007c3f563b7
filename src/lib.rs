//! # Patch Dataset
//!
//! Indexed access to pre-extracted Whole Slide Image patches.
//!
//! A slide tiler writes each patch as `<x>_<y>.jpg`, where `(x, y)` is the
//! pixel origin of the patch on the full-resolution slide. This library lists
//! such a directory once and serves the patches by position, decoding each
//! one on demand, running a set of named transforms over it, and returning
//! the outputs together with the coordinate.
//!
//! ## Features
//!
//! - **Deterministic indexing**: the listing is sorted, so index `i` names the same file everywhere
//! - **Named transforms**: closures or built-ins (resize, RGB, channel-first tensors)
//! - **Opt-in caching**: an LRU of decoded images for multi-epoch loops
//! - **Thread-safe reads**: datasets are `Sync` and can be shared across workers
//!
//! ## Architecture
//!
//! - [`patch`] - Directory listing, coordinate parsing, datasets
//! - [`transform`] - Transform trait, registry and built-in transforms
//! - [`report`] - Scan/check reports used by the CLI
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use patch_dataset::{Identity, PatchDataset, ToTensor, TransformRegistry, Representation};
//!
//! let transforms: TransformRegistry<Representation> = TransformRegistry::new()
//!     .with("image", Identity)
//!     .with("tensor", ToTensor);
//!
//! let dataset = PatchDataset::new("patches/slide-001", transforms)?;
//! println!("{} patches", dataset.len());
//!
//! let sample = dataset.get(0)?;
//! let [x, y] = sample.coords();
//! println!("patch at ({}, {}) has outputs {:?}", x, y, sample.outputs.keys());
//! # Ok::<(), patch_dataset::DatasetError>(())
//! ```

pub mod config;
pub mod error;
pub mod patch;
pub mod report;
pub mod transform;

// Re-export commonly used types
pub use config::{CheckConfig, Cli, Command, OutputFormat, ScanConfig};
pub use error::{BoxError, CoordParseError, DatasetError};
pub use patch::{
    list_patches, CacheStats, CachedPatchDataset, DatasetIter, IndexedDataset, PatchDataset,
    PatchSample, TileCoord, DEFAULT_PATCH_CACHE_CAPACITY, PATCH_EXTENSION,
};
pub use report::{check_dataset, scan_dataset, CheckFailure, CheckReport, ScanEntry, ScanReport};
pub use transform::{
    Identity, Representation, Resize, TileTensor, ToRgb8, ToTensor, Transform, TransformRegistry,
};
