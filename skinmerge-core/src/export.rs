use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::foundation::{
    core::Bitmap,
    error::{SkinMergeError, SkinMergeResult},
};

/// Download name used when the base file name is not preserved.
pub const MERGED_FILE_STEM: &str = "merged_skin";

/// Base name used before any base skin file name is known.
pub const DEFAULT_BASE_NAME: &str = "base";

/// Encode a bitmap as PNG bytes.
pub fn encode_png(bitmap: &Bitmap) -> SkinMergeResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(bitmap.to_rgba_image()?)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Encode `bitmap` as PNG and write it to `path`, creating the parent directory.
pub fn write_png(path: &Path, bitmap: &Bitmap) -> SkinMergeResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let bytes = encode_png(bitmap)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write png '{}'", path.display()))
        .map_err(SkinMergeError::from)
}

/// Strip a trailing `.png` (any case) from an uploaded file name.
pub fn base_name_from_file_name(file_name: &str) -> String {
    let stem = match file_name.len().checked_sub(4) {
        Some(cut) if file_name.is_char_boundary(cut)
            && file_name[cut..].eq_ignore_ascii_case(".png") =>
        {
            &file_name[..cut]
        }
        _ => file_name,
    };
    if stem.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        stem.to_string()
    }
}

/// Base name for a skin fetched by player name: `<username>-skin`.
pub fn base_name_for_username(username: &str) -> String {
    format!("{}-skin", username.trim())
}

/// File name offered for the merged download.
pub fn output_file_name(preserve_filename: bool, base_name: &str) -> String {
    let stem = if preserve_filename && !base_name.is_empty() {
        base_name
    } else {
        MERGED_FILE_STEM
    };
    format!("{stem}.png")
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
