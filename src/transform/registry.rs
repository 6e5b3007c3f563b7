//! Named transform registry.

use std::fmt;

use image::DynamicImage;
use indexmap::IndexMap;

use crate::error::{BoxError, DatasetError};

// =============================================================================
// Transform Trait
// =============================================================================

/// A unary conversion from a decoded patch to some output representation.
///
/// Any `Fn(&DynamicImage) -> Result<T, E>` closure is a transform, so most
/// callers never implement this trait by hand.
pub trait Transform<T>: Send + Sync {
    /// Apply the transform to a decoded patch.
    fn apply(&self, image: &DynamicImage) -> Result<T, BoxError>;
}

impl<F, T, E> Transform<T> for F
where
    F: Fn(&DynamicImage) -> Result<T, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn apply(&self, image: &DynamicImage) -> Result<T, BoxError> {
        self(image).map_err(Into::into)
    }
}

// =============================================================================
// Transform Registry
// =============================================================================

/// Insertion-ordered mapping from transform name to transform.
///
/// Every retrieval applies all registered transforms in the order they were
/// first inserted. Inserting under an existing name replaces the transform
/// but keeps its position.
///
/// # Example
///
/// ```
/// use image::DynamicImage;
/// use patch_dataset::transform::{Identity, Representation, ToTensor, TransformRegistry};
///
/// let registry: TransformRegistry<Representation> = TransformRegistry::new()
///     .with("image", Identity)
///     .with("tensor", ToTensor)
///     .with_fn("gray", |image: &DynamicImage| {
///         Ok::<_, std::convert::Infallible>(Representation::from(image.grayscale()))
///     });
///
/// assert_eq!(registry.names().collect::<Vec<_>>(), ["image", "tensor", "gray"]);
/// ```
pub struct TransformRegistry<T> {
    transforms: IndexMap<String, Box<dyn Transform<T>>>,
}

impl<T> TransformRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            transforms: IndexMap::new(),
        }
    }

    /// Register a transform, builder style.
    pub fn with(mut self, name: impl Into<String>, transform: impl Transform<T> + 'static) -> Self {
        self.insert(name, transform);
        self
    }

    /// Register a closure, builder style.
    ///
    /// Equivalent to [`with`](Self::with), but lets the compiler infer the
    /// closure's argument type from the `Fn` bound.
    pub fn with_fn<F, E>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&DynamicImage) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.with(name, f)
    }

    /// Register a transform, replacing any existing one with the same name.
    ///
    /// Returns the previous transform registered under `name`, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        transform: impl Transform<T> + 'static,
    ) -> Option<Box<dyn Transform<T>>> {
        self.transforms.insert(name.into(), Box::new(transform))
    }

    /// Number of registered transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true if no transforms are registered.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Returns true if a transform is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }

    /// Apply every transform to `image`, in registration order.
    ///
    /// Stops at the first failing transform; its error is returned tagged
    /// with the transform's name.
    pub fn apply_all(&self, image: &DynamicImage) -> Result<IndexMap<String, T>, DatasetError> {
        let mut outputs = IndexMap::with_capacity(self.transforms.len());

        for (name, transform) in &self.transforms {
            let output = transform
                .apply(image)
                .map_err(|source| DatasetError::Transform {
                    name: name.clone(),
                    source,
                })?;
            outputs.insert(name.clone(), output);
        }

        Ok(outputs)
    }
}

impl<T> Default for TransformRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TransformRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
