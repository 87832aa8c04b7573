use crate::{
    composite::blend::{premultiply, unpremultiply},
    fit::transform::{SampleFilter, TextureTransform},
    foundation::{
        core::{Bitmap, byte_len},
        error::{SkinMergeError, SkinMergeResult},
    },
};

/// Render `image` as a viewport-sized background using `transform`, clamping UVs to the edge.
///
/// This reproduces on the CPU what the 3D viewer shows behind the model. Texture `v` runs
/// bottom-to-top, as in texture space.
#[tracing::instrument(skip(image, transform), fields(image = ?image.dimensions()))]
pub fn render_background(
    image: &Bitmap,
    viewport_w: u32,
    viewport_h: u32,
    transform: &TextureTransform,
    filter: SampleFilter,
) -> SkinMergeResult<Bitmap> {
    if viewport_w == 0 || viewport_h == 0 {
        return Err(SkinMergeError::validation(format!(
            "viewport must be non-empty, got {viewport_w}×{viewport_h}"
        )));
    }

    let mut out = vec![0u8; byte_len(viewport_w, viewport_h)?];
    for (y, row) in out.chunks_exact_mut(viewport_w as usize * 4).enumerate() {
        let v_view = 1.0 - (y as f64 + 0.5) / f64::from(viewport_h);
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let u_view = (x as f64 + 0.5) / f64::from(viewport_w);
            let (u, v) = transform.map_uv(u_view, v_view);
            let u = u.clamp(0.0, 1.0);
            let v = 1.0 - v.clamp(0.0, 1.0);
            let sampled = match filter {
                SampleFilter::Nearest => sample_nearest(image, u, v),
                SampleFilter::Linear => sample_bilinear(image, u, v),
            };
            px.copy_from_slice(&sampled);
        }
    }

    Bitmap::from_rgba8(viewport_w, viewport_h, out)
}

fn sample_nearest(image: &Bitmap, u: f64, v: f64) -> [u8; 4] {
    let (w, h) = image.dimensions();
    let x = ((u * f64::from(w)).floor() as u32).min(w - 1);
    let y = ((v * f64::from(h)).floor() as u32).min(h - 1);
    image.pixel(x, y)
}

fn sample_bilinear(image: &Bitmap, u: f64, v: f64) -> [u8; 4] {
    let (w, h) = image.dimensions();
    let fx = (u * f64::from(w) - 0.5).clamp(0.0, f64::from(w - 1));
    let fy = (v * f64::from(h) - 0.5).clamp(0.0, f64::from(h - 1));
    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let tx = fx - f64::from(x0);
    let ty = fy - f64::from(y0);

    let p00 = premultiply(image.pixel(x0, y0));
    let p10 = premultiply(image.pixel(x1, y0));
    let p01 = premultiply(image.pixel(x0, y1));
    let p11 = premultiply(image.pixel(x1, y1));

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f64::from(p00[i]) * (1.0 - tx) + f64::from(p10[i]) * tx;
        let bottom = f64::from(p01[i]) * (1.0 - tx) + f64::from(p11[i]) * tx;
        out[i] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    unpremultiply(out)
}

#[cfg(test)]
#[path = "../../tests/unit/fit/sample.rs"]
mod tests;
