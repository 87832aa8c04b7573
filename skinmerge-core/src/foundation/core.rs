use std::sync::Arc;

use crate::foundation::error::{SkinMergeError, SkinMergeResult};

/// Input slot an image is loaded into.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// The base skin; defines the output size.
    Base,
    /// The transparent accessories layer drawn over the base.
    Overlay,
    /// The preview background image.
    Background,
}

impl Slot {
    /// All slots in load order.
    pub const ALL: [Slot; 3] = [Slot::Base, Slot::Overlay, Slot::Background];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Base => "base",
            Slot::Overlay => "overlay",
            Slot::Background => "background",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable decoded raster in straight (non-premultiplied) RGBA8.
///
/// Rows are tightly packed, top to bottom. Both dimensions are always non-zero. Clones share
/// the pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap a straight RGBA8 buffer, validating its dimensions and length.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> SkinMergeResult<Self> {
        if width == 0 || height == 0 {
            return Err(SkinMergeError::validation(format!(
                "bitmap dimensions must be non-zero, got {width}×{height}"
            )));
        }
        let expected = byte_len(width, height)?;
        if rgba8.len() != expected {
            return Err(SkinMergeError::validation(format!(
                "bitmap buffer is {} bytes, expected {expected} for {width}×{height} rgba8",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// A bitmap filled with one straight RGBA8 color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> SkinMergeResult<Self> {
        let len = byte_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Self::from_rgba8(width, height, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major straight RGBA8 bytes.
    pub fn as_rgba8(&self) -> &[u8] {
        self.rgba8.as_slice()
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.rgba8[i..i + 4];
        [p[0], p[1], p[2], p[3]]
    }

    /// Copy into an [`image::RgbaImage`] for encoding or resampling.
    pub fn to_rgba_image(&self) -> SkinMergeResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8.as_ref().clone())
            .ok_or_else(|| {
                SkinMergeError::validation(format!(
                    "bitmap buffer of {} bytes does not hold {}×{} RGBA8 pixels",
                    self.rgba8.len(),
                    self.width,
                    self.height
                ))
            })
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> SkinMergeResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| SkinMergeError::validation(format!("bitmap {width}×{height} is too large")))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
