use std::path::{Path, PathBuf};

use crate::foundation::{
    core::{Bitmap, Slot},
    error::{SkinMergeError, SkinMergeResult},
};

/// An encoded image payload from an upload, a catalog entry or a remote fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSource {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Advertised MIME type; may be empty.
    pub mime: String,
    /// Suggested file name, used to derive the download name.
    pub file_name: Option<String>,
}

impl ImageSource {
    /// Build a source from in-memory bytes.
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
            file_name,
        }
    }

    /// Read a source from disk, guessing the MIME type from the file extension.
    pub fn from_path(path: &Path, slot: Slot) -> SkinMergeResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| SkinMergeError::read(slot, e))?;
        Ok(Self {
            bytes,
            mime: mime_for_path(path).to_string(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
        })
    }
}

/// Loose MIME pre-check: empty, or containing `image` or `png` anywhere.
///
/// This does not sniff the bytes; the decoder is the real gate.
pub fn accepts_mime(mime: &str) -> bool {
    mime.is_empty() || mime.contains("image") || mime.contains("png")
}

/// MIME type advertised for a path, from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return "";
    };
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Decode encoded image bytes into a straight RGBA8 [`Bitmap`].
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_bitmap(bytes: &[u8], mime_hint: &str, slot: Slot) -> SkinMergeResult<Bitmap> {
    if !accepts_mime(mime_hint) {
        return Err(SkinMergeError::UnsupportedType {
            slot,
            mime: mime_hint.to_string(),
        });
    }

    let dyn_img =
        image::load_from_memory(bytes).map_err(|e| SkinMergeError::decode(slot, e.to_string()))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(SkinMergeError::decode(slot, "image has zero width or height"));
    }

    tracing::debug!(width, height, "decoded image");
    Bitmap::from_rgba8(width, height, rgba.into_raw())
}

/// Decode an [`ImageSource`].
pub fn decode_source(source: &ImageSource, slot: Slot) -> SkinMergeResult<Bitmap> {
    decode_bitmap(&source.bytes, &source.mime, slot)
}

/// Read and decode an image file.
pub fn load_bitmap(path: impl Into<PathBuf>, slot: Slot) -> SkinMergeResult<Bitmap> {
    let path = path.into();
    let source = ImageSource::from_path(&path, slot)?;
    decode_source(&source, slot)
}

/// Decode base and overlay concurrently, returning once both have finished.
pub fn decode_pair(
    base: &ImageSource,
    overlay: &ImageSource,
) -> (SkinMergeResult<Bitmap>, SkinMergeResult<Bitmap>) {
    rayon::join(
        || decode_source(base, Slot::Base),
        || decode_source(overlay, Slot::Overlay),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
