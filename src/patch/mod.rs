//! Patch dataset layer.
//!
//! This module indexes a directory of pre-extracted patches and serves them
//! by position to training and inference loops.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      Sampler / loader (caller side)     │
//! └────────────────────┬────────────────────┘
//!                      │  len(), get(i)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          IndexedDataset Trait           │
//! └────────────────────┬────────────────────┘
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │  PatchDataset   │◄───│ CachedPatchDataset  │
//! │ (decode/call)   │    │ (LRU of decodes)    │
//! └────────┬────────┘    └─────────────────────┘
//!          │
//!          ▼
//!   <dir>/<x>_<y>.jpg  ──►  TileCoord + TransformRegistry outputs
//! ```
//!
//! # Components
//!
//! - [`PatchDataset`]: lists the directory once and decodes on every retrieval
//! - [`CachedPatchDataset`]: opt-in LRU of decoded images over a `PatchDataset`
//! - [`TileCoord`]: coordinate parsed from a `<x>_<y>.jpg` filename
//! - [`PatchSample`]: transform outputs plus coordinate for one patch
//! - [`IndexedDataset`] / [`DatasetIter`]: the generic sized, indexed surface

mod cache;
mod coord;
mod dataset;
mod indexed;

pub use cache::{CacheStats, CachedPatchDataset, DEFAULT_PATCH_CACHE_CAPACITY};
pub use coord::{TileCoord, COORD_SEPARATOR};
pub use dataset::{list_patches, PatchDataset, PatchSample, PATCH_EXTENSION};
pub use indexed::{DatasetIter, IndexedDataset};
