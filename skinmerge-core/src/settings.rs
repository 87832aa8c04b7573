use std::path::Path;

use anyhow::Context;

use crate::{
    catalog::CatalogRules,
    export::DEFAULT_BASE_NAME,
    fit::transform::{FitMode, FitOptions, SampleFilter, Zoom},
    foundation::error::{SkinMergeError, SkinMergeResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Merge and download behaviour.
pub struct MergeOptions {
    /// Scale a differently sized overlay onto the base instead of failing.
    pub auto_resize: bool,
    /// Name the download after the base skin instead of `merged_skin`.
    pub preserve_filename: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            auto_resize: false,
            preserve_filename: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Background preview controls.
pub struct PreviewSettings {
    /// Fit mode.
    pub fit: FitMode,
    /// Sampling hint.
    pub filter: SampleFilter,
    /// Zoom slider value.
    pub zoom: f64,
    /// Lower slider bound.
    pub min_zoom: f64,
    /// Upper slider bound.
    pub max_zoom: f64,
    /// Slider increment.
    pub zoom_step: f64,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            fit: FitMode::Cover,
            filter: SampleFilter::Linear,
            zoom: 1.0,
            min_zoom: 0.5,
            max_zoom: 2.0,
            zoom_step: 0.1,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

impl PreviewSettings {
    /// Fit options with the zoom clamped into the slider range.
    pub fn fit_options(&self) -> SkinMergeResult<FitOptions> {
        Ok(FitOptions {
            mode: self.fit,
            zoom: Zoom::clamped(self.zoom, self.min_zoom, self.max_zoom)?,
            filter: self.filter,
        })
    }

    /// Zoom after moving the slider by `steps` increments, clamped to the range.
    pub fn stepped_zoom(&self, steps: i32) -> f64 {
        (self.zoom + f64::from(steps) * self.zoom_step).clamp(self.min_zoom, self.max_zoom)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// User settings, loadable from JSON. Every field has a default.
pub struct Settings {
    /// Merge options.
    pub merge: MergeOptions,
    /// Preview options.
    pub preview: PreviewSettings,
    /// Overlay catalog rules.
    pub catalog: CatalogRules,
    /// Download stem used before a base skin name is known.
    pub default_base_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            merge: MergeOptions::default(),
            preview: PreviewSettings::default(),
            catalog: CatalogRules::default(),
            default_base_name: DEFAULT_BASE_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file.
    pub fn from_path(path: &Path) -> SkinMergeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate settings JSON.
    pub fn from_json_str(json: &str) -> SkinMergeResult<Self> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| SkinMergeError::validation(format!("invalid settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check slider bounds, viewport and names.
    pub fn validate(&self) -> SkinMergeResult<()> {
        let p = &self.preview;
        Zoom::new(p.min_zoom)?;
        Zoom::new(p.max_zoom)?;
        if p.min_zoom > p.max_zoom {
            return Err(SkinMergeError::validation(format!(
                "preview.min_zoom {} exceeds preview.max_zoom {}",
                p.min_zoom, p.max_zoom
            )));
        }
        if !p.zoom_step.is_finite() || p.zoom_step <= 0.0 {
            return Err(SkinMergeError::validation("preview.zoom_step must be > 0"));
        }
        p.fit_options()?;
        if p.viewport_width == 0 || p.viewport_height == 0 {
            return Err(SkinMergeError::validation(
                "preview viewport must be non-empty",
            ));
        }
        if self.default_base_name.trim().is_empty() {
            return Err(SkinMergeError::validation(
                "default_base_name must be non-empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
