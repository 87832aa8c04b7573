use crate::foundation::error::{SkinMergeError, SkinMergeResult};

/// Smallest repeat allowed in cover/contain modes, keeping the sampled window non-degenerate.
pub const MIN_REPEAT: f64 = 1e-4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// How a background image is scaled onto the viewport.
pub enum FitMode {
    /// Fill the viewport entirely, cropping overflow.
    #[default]
    Cover,
    /// Keep the whole image visible, letterboxed.
    Contain,
    /// Ignore aspect ratios; both axes scale by zoom.
    Stretch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Sampling hint for the background texture.
pub enum SampleFilter {
    /// Smooth bilinear sampling with mipmaps.
    #[default]
    Linear,
    /// Blocky point sampling.
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Magnification filter requested from the viewer.
pub enum MagFilter {
    /// Bilinear.
    Linear,
    /// Point.
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Minification filter requested from the viewer.
pub enum MinFilter {
    /// Trilinear: bilinear within and between mip levels.
    LinearMipmapLinear,
    /// Point sampling from the nearest mip level.
    NearestMipmapNearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Texture wrap mode requested from the viewer.
pub enum WrapMode {
    /// Coordinates outside `[0, 1]` repeat the edge texel.
    ClampToEdge,
}

impl SampleFilter {
    /// Viewer texture filters for this hint.
    pub fn texture_filters(self) -> (MagFilter, MinFilter) {
        match self {
            SampleFilter::Linear => (MagFilter::Linear, MinFilter::LinearMipmapLinear),
            SampleFilter::Nearest => (MagFilter::Nearest, MinFilter::NearestMipmapNearest),
        }
    }

    /// Wrap mode used for backgrounds on both axes.
    pub fn wrap_mode(self) -> WrapMode {
        WrapMode::ClampToEdge
    }
}

/// Strictly positive, finite zoom multiplier. Below 1 zooms out, above 1 zooms in.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Zoom(f64);

impl Zoom {
    /// No zoom.
    pub const ONE: Zoom = Zoom(1.0);

    /// Validate a zoom value.
    pub fn new(value: f64) -> SkinMergeResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(SkinMergeError::validation(format!(
                "zoom must be finite and > 0, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Clamp slider input into `[min, max]`, then validate.
    pub fn clamped(value: f64, min: f64, max: f64) -> SkinMergeResult<Self> {
        if !value.is_finite() {
            return Err(SkinMergeError::validation(format!(
                "zoom must be finite, got {value}"
            )));
        }
        if min.is_nan() || max.is_nan() || min > max {
            return Err(SkinMergeError::validation(format!(
                "zoom bounds are inverted: min {min} > max {max}"
            )));
        }
        Self::new(value.clamp(min, max))
    }

    /// The raw multiplier.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f64> for Zoom {
    type Error = SkinMergeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Zoom> for f64 {
    fn from(z: Zoom) -> Self {
        z.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Background fitting options.
pub struct FitOptions {
    /// Scaling mode.
    #[serde(default)]
    pub mode: FitMode,
    /// Zoom multiplier.
    #[serde(default)]
    pub zoom: Zoom,
    /// Sampling hint passed through to the viewer.
    #[serde(default)]
    pub filter: SampleFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// UV repeat/offset applied to the background texture.
///
/// `offset = (1 - repeat) / 2` on both axes and the center is always `(0.5, 0.5)`.
pub struct TextureTransform {
    /// Horizontal repeat.
    pub repeat_x: f64,
    /// Vertical repeat.
    pub repeat_y: f64,
    /// Horizontal pivot for the repeat.
    pub center_x: f64,
    /// Vertical pivot for the repeat.
    pub center_y: f64,
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
}

impl TextureTransform {
    fn centered(repeat_x: f64, repeat_y: f64) -> Self {
        Self {
            repeat_x,
            repeat_y,
            center_x: 0.5,
            center_y: 0.5,
            offset_x: (1.0 - repeat_x) / 2.0,
            offset_y: (1.0 - repeat_y) / 2.0,
        }
    }

    /// Map a viewport UV to a texture UV the way the viewer's UV matrix does: scale by the
    /// repeat about the center, then translate by the offset.
    pub fn map_uv(&self, u: f64, v: f64) -> (f64, f64) {
        (
            self.repeat_x * (u - self.center_x) + self.center_x + self.offset_x,
            self.repeat_y * (v - self.center_y) + self.center_y + self.offset_y,
        )
    }
}

/// Compute the background texture transform for an image shown in a viewport.
///
/// Pure; callers recompute it whenever the image, viewport size, mode or zoom changes.
#[tracing::instrument(level = "debug")]
pub fn compute_transform(
    image_w: u32,
    image_h: u32,
    viewport_w: f64,
    viewport_h: f64,
    options: &FitOptions,
) -> SkinMergeResult<TextureTransform> {
    if image_w == 0 || image_h == 0 {
        return Err(SkinMergeError::validation(format!(
            "background image must be non-empty, got {image_w}×{image_h}"
        )));
    }
    if !(viewport_w.is_finite() && viewport_h.is_finite() && viewport_w > 0.0 && viewport_h > 0.0)
    {
        return Err(SkinMergeError::validation(format!(
            "viewport must be finite and > 0, got {viewport_w}×{viewport_h}"
        )));
    }

    let z = options.zoom.get();
    let image_aspect = f64::from(image_w) / f64::from(image_h);
    let viewport_aspect = viewport_w / viewport_h;
    let image_wider = image_aspect > viewport_aspect;

    let (repeat_x, repeat_y) = match options.mode {
        FitMode::Stretch => return Ok(TextureTransform::centered(z, z)),
        FitMode::Cover if image_wider => {
            let ry = 1.0 / z;
            (image_aspect / viewport_aspect * ry, ry)
        }
        FitMode::Cover => {
            let rx = 1.0 / z;
            (rx, viewport_aspect / image_aspect * rx)
        }
        FitMode::Contain if image_wider => {
            let rx = 1.0 / z;
            (rx, viewport_aspect / image_aspect * rx)
        }
        FitMode::Contain => {
            let ry = 1.0 / z;
            (image_aspect / viewport_aspect * ry, ry)
        }
    };

    Ok(TextureTransform::centered(
        repeat_x.max(MIN_REPEAT),
        repeat_y.max(MIN_REPEAT),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/fit/transform.rs"]
mod tests;
