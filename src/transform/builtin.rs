//! Built-in transforms.
//!
//! Each transform is generic over its registry's output type: anything that
//! can be built from its natural output works. This lets the same
//! [`Identity`] feed a `TransformRegistry<DynamicImage>` and a
//! `TransformRegistry<Representation>`.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::BoxError;

use super::registry::Transform;
use super::tensor::TileTensor;

/// Default resampling filter for [`Resize`].
pub const DEFAULT_RESIZE_FILTER: FilterType = FilterType::Triangle;

// =============================================================================
// Representation
// =============================================================================

/// Output of a registry mixing image and tensor transforms.
#[derive(Debug, Clone, PartialEq)]
pub enum Representation {
    Image(DynamicImage),
    Tensor(TileTensor),
}

impl Representation {
    pub fn as_image(&self) -> Option<&DynamicImage> {
        match self {
            Representation::Image(image) => Some(image),
            Representation::Tensor(_) => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&TileTensor> {
        match self {
            Representation::Tensor(tensor) => Some(tensor),
            Representation::Image(_) => None,
        }
    }
}

impl From<DynamicImage> for Representation {
    fn from(image: DynamicImage) -> Self {
        Representation::Image(image)
    }
}

impl From<TileTensor> for Representation {
    fn from(tensor: TileTensor) -> Self {
        Representation::Tensor(tensor)
    }
}

// =============================================================================
// Transforms
// =============================================================================

/// Returns the decoded patch unmodified.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<T: From<DynamicImage>> Transform<T> for Identity {
    fn apply(&self, image: &DynamicImage) -> Result<T, BoxError> {
        Ok(T::from(image.clone()))
    }
}

/// Converts the patch to 8-bit RGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToRgb8;

impl<T: From<DynamicImage>> Transform<T> for ToRgb8 {
    fn apply(&self, image: &DynamicImage) -> Result<T, BoxError> {
        Ok(T::from(DynamicImage::ImageRgb8(image.to_rgb8())))
    }
}

/// Converts the patch to a channel-first [`TileTensor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl<T: From<TileTensor>> Transform<T> for ToTensor {
    fn apply(&self, image: &DynamicImage) -> Result<T, BoxError> {
        Ok(T::from(TileTensor::from_image(image)))
    }
}

/// Resizes the patch to an exact size, ignoring aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Resize {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl Resize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: DEFAULT_RESIZE_FILTER,
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl<T: From<DynamicImage>> Transform<T> for Resize {
    fn apply(&self, image: &DynamicImage) -> Result<T, BoxError> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "resize target must be non-zero, got {}x{}",
                self.width, self.height
            )
            .into());
        }

        Ok(T::from(image.resize_exact(
            self.width,
            self.height,
            self.filter,
        )))
    }
}
