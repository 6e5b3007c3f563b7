//! Patch transforms.
//!
//! A transform turns a decoded patch into whatever representation the
//! consuming loop wants (a resized image, a channel-first tensor, ...).
//! Transforms are registered under a name in a [`TransformRegistry`]; every
//! retrieval applies all of them and returns the outputs keyed by name.
//!
//! # Components
//!
//! - [`Transform`]: the single-method trait, implemented for closures
//! - [`TransformRegistry`]: insertion-ordered name to transform mapping
//! - [`Identity`], [`ToRgb8`], [`Resize`], [`ToTensor`]: built-in transforms
//! - [`Representation`]: output type for registries mixing images and tensors
//! - [`TileTensor`]: channel-first 8-bit pixel buffer

mod builtin;
mod registry;
mod tensor;

pub use builtin::{Identity, Representation, Resize, ToRgb8, ToTensor, DEFAULT_RESIZE_FILTER};
pub use registry::{Transform, TransformRegistry};
pub use tensor::TileTensor;
