//! Group a product's images by colour and pick each colour's default image

use std::collections::BTreeMap;
use tracing::debug;

use crate::entities::{Color, ColorImage};

/// A colour with its images in presentation order
#[derive(Debug, Clone)]
pub struct ColorBucket {
    pub color: Color,
    pub images: Vec<ColorImage>,
    /// Index of the default image; the last flagged image, else the first
    pub default_index: usize,
}

impl ColorBucket {
    fn new(color: Color) -> Self {
        Self {
            color,
            images: Vec::new(),
            default_index: 0,
        }
    }

    #[must_use]
    pub fn is_default(&self, index: usize) -> bool {
        self.default_index == index
    }
}

/// Colours of one product keyed by colour ID.
///
/// Iteration is in ascending colour ID. The product-level default/hover pair
/// is last-write-wins over this order, so the highest colour ID with a
/// usable medium image supplies it.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    buckets: BTreeMap<i64, ColorBucket>,
}

impl ColorMap {
    /// Attach images to their colours. Images whose colour is not among the
    /// product's colours are dropped.
    #[must_use]
    pub fn build(colors: Vec<Color>, images: Vec<ColorImage>) -> Self {
        let mut buckets: BTreeMap<i64, ColorBucket> = colors
            .into_iter()
            .map(|color| (color.id, ColorBucket::new(color)))
            .collect();

        for image in images {
            let Some(bucket) = buckets.get_mut(&image.color_id) else {
                debug!(
                    "Dropping image {} with unknown colour {}",
                    image.id, image.color_id
                );
                continue;
            };

            if image.is_flagged_default() {
                bucket.default_index = bucket.images.len();
            }
            bucket.images.push(image);
        }

        Self { buckets }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorBucket> {
        self.buckets.values()
    }

    #[cfg(test)]
    pub fn get(&self, color_id: i64) -> Option<&ColorBucket> {
        self.buckets.get(&color_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of images attached to a known colour
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.buckets.values().map(|b| b.images.len()).sum()
    }
}
