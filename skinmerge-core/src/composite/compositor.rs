use crate::{
    composite::blend::over_straight,
    foundation::{
        core::Bitmap,
        error::{SkinMergeError, SkinMergeResult},
    },
};

/// Inputs of one composite: both bitmaps fully decoded, plus the resize policy.
#[derive(Clone, Copy, Debug)]
pub struct CompositeRequest<'a> {
    /// Bottom layer; defines the output size.
    pub base: &'a Bitmap,
    /// Layer drawn over the base with source-over alpha.
    pub overlay: &'a Bitmap,
    /// Scale a differently sized overlay onto the base instead of failing.
    pub auto_resize: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OverlayPlacement {
    Native,
    Scaled,
}

/// Compositor owning a reusable output surface.
///
/// [`Compositor::composite`] takes `&mut self`, so only one composite can be drawing into the
/// surface at a time. Use [`composite`] for a fresh surface per call.
#[derive(Debug, Default)]
pub struct Compositor {
    surface: Vec<u8>,
}

impl Compositor {
    /// Create a compositor with an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `req.overlay` over `req.base` into a new bitmap of the base's size.
    ///
    /// Fails with [`SkinMergeError::SizeMismatch`] when sizes differ and auto-resize is off; the
    /// surface is left untouched in that case.
    #[tracing::instrument(
        skip_all,
        fields(
            base = ?req.base.dimensions(),
            overlay = ?req.overlay.dimensions(),
            auto_resize = req.auto_resize
        )
    )]
    pub fn composite(&mut self, req: &CompositeRequest<'_>) -> SkinMergeResult<Bitmap> {
        let placement = placement_for(req)?;
        let (bw, bh) = req.base.dimensions();

        self.surface.clear();
        self.surface.extend_from_slice(req.base.as_rgba8());

        match placement {
            OverlayPlacement::Native => draw_native(&mut self.surface, req.overlay),
            OverlayPlacement::Scaled => {
                tracing::debug!("scaling overlay onto base with nearest-neighbour sampling");
                draw_scaled(&mut self.surface, bw, bh, req.overlay)?;
            }
        }

        Bitmap::from_rgba8(bw, bh, self.surface.clone())
    }
}

/// Merge `overlay` over `base` using a fresh output surface.
pub fn composite(base: &Bitmap, overlay: &Bitmap, auto_resize: bool) -> SkinMergeResult<Bitmap> {
    Compositor::new().composite(&CompositeRequest {
        base,
        overlay,
        auto_resize,
    })
}

/// Standalone copy of the overlay layer at its native size, alpha preserved.
pub fn extract_overlay(overlay: &Bitmap) -> SkinMergeResult<Bitmap> {
    let (w, h) = overlay.dimensions();
    Bitmap::from_rgba8(w, h, overlay.as_rgba8().to_vec())
}

/// Scale `src` to `width × height` with nearest-neighbour sampling at pixel centers.
pub fn resize_nearest(src: &Bitmap, width: u32, height: u32) -> SkinMergeResult<Bitmap> {
    if width == 0 || height == 0 {
        return Err(SkinMergeError::validation(format!(
            "resize target must be non-empty, got {width}×{height}"
        )));
    }
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }

    let scaled = image::imageops::resize(
        &src.to_rgba_image()?,
        width,
        height,
        image::imageops::FilterType::Nearest,
    );
    Bitmap::from_rgba8(width, height, scaled.into_raw())
}

fn placement_for(req: &CompositeRequest<'_>) -> SkinMergeResult<OverlayPlacement> {
    let (bw, bh) = req.base.dimensions();
    let (ow, oh) = req.overlay.dimensions();

    if (ow, oh) == (bw, bh) {
        return Ok(OverlayPlacement::Native);
    }
    if req.auto_resize && ow > 0 && oh > 0 {
        return Ok(OverlayPlacement::Scaled);
    }
    Err(SkinMergeError::SizeMismatch {
        overlay_w: ow,
        overlay_h: oh,
        base_w: bw,
        base_h: bh,
    })
}

fn draw_native(dst: &mut [u8], overlay: &Bitmap) {
    for (d, s) in dst.chunks_exact_mut(4).zip(overlay.as_rgba8().chunks_exact(4)) {
        let out = over_straight([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
}

fn draw_scaled(dst: &mut [u8], bw: u32, bh: u32, overlay: &Bitmap) -> SkinMergeResult<()> {
    let scaled = resize_nearest(overlay, bw, bh)?;
    draw_native(dst, &scaled);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/compositor.rs"]
mod tests;
