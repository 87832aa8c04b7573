use crate::{
    assets::decode::{ImageSource, decode_source},
    composite::compositor::{CompositeRequest, Compositor, extract_overlay},
    export::{base_name_for_username, base_name_from_file_name, output_file_name},
    fit::transform::{FitOptions, TextureTransform, compute_transform},
    foundation::{
        core::{Bitmap, Slot},
        error::{SkinMergeError, SkinMergeResult},
    },
    settings::{MergeOptions, Settings},
};

/// Stamp identifying one load into a slot. Only the latest ticket per slot may store a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    slot: Slot,
    generation: u64,
}

impl LoadTicket {
    /// Slot this load targets.
    pub fn slot(self) -> Slot {
        self.slot
    }
}

#[derive(Clone, Debug, Default)]
struct SlotState {
    generation: u64,
    bitmap: Option<Bitmap>,
}

/// Explicit state of one merge workflow: the three image slots plus merge and fit options.
///
/// Loads are last-writer-wins: a result that arrives after a newer load (or a clear) of the
/// same slot was started is discarded.
#[derive(Debug)]
pub struct MergeSession {
    slots: [SlotState; 3],
    options: MergeOptions,
    fit: FitOptions,
    viewport: (f64, f64),
    base_name: String,
    compositor: Compositor,
}

impl MergeSession {
    /// Start an empty session from settings.
    pub fn new(settings: &Settings) -> SkinMergeResult<Self> {
        settings.validate()?;
        Ok(Self {
            slots: Default::default(),
            options: settings.merge,
            fit: settings.preview.fit_options()?,
            viewport: (
                f64::from(settings.preview.viewport_width),
                f64::from(settings.preview.viewport_height),
            ),
            base_name: settings.default_base_name.clone(),
            compositor: Compositor::new(),
        })
    }

    fn slot_state(&self, slot: Slot) -> &SlotState {
        &self.slots[slot_index(slot)]
    }

    fn slot_state_mut(&mut self, slot: Slot) -> &mut SlotState {
        &mut self.slots[slot_index(slot)]
    }

    /// Begin a load into `slot`, superseding any load still in flight.
    pub fn begin_load(&mut self, slot: Slot) -> LoadTicket {
        let state = self.slot_state_mut(slot);
        state.generation += 1;
        LoadTicket {
            slot,
            generation: state.generation,
        }
    }

    /// Store the outcome of the load identified by `ticket`.
    ///
    /// Returns `Ok(false)` when the ticket is stale and the result was discarded, `Ok(true)`
    /// when the bitmap was stored. A failed decode for a current ticket is returned as is.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: SkinMergeResult<Bitmap>,
        file_name: Option<&str>,
    ) -> SkinMergeResult<bool> {
        if self.slot_state(ticket.slot).generation != ticket.generation {
            tracing::debug!(slot = %ticket.slot, "discarding stale load result");
            return Ok(false);
        }

        let bitmap = result?;
        tracing::debug!(slot = %ticket.slot, dims = ?bitmap.dimensions(), "slot loaded");
        if let (Slot::Base, Some(name)) = (ticket.slot, file_name) {
            self.base_name = base_name_from_file_name(name);
        }
        self.slot_state_mut(ticket.slot).bitmap = Some(bitmap);
        Ok(true)
    }

    /// Decode `source` into `slot` synchronously.
    pub fn load(&mut self, slot: Slot, source: &ImageSource) -> SkinMergeResult<bool> {
        let ticket = self.begin_load(slot);
        let result = decode_source(source, slot);
        self.finish_load(ticket, result, source.file_name.as_deref())
    }

    /// Decode a base skin fetched for `username`. The download is then named
    /// `<username>-skin.png`.
    pub fn load_username_skin(
        &mut self,
        username: &str,
        bytes: Vec<u8>,
    ) -> SkinMergeResult<bool> {
        if username.trim().is_empty() {
            return Err(SkinMergeError::validation("Please enter a valid username"));
        }
        let file_name = format!("{}.png", base_name_for_username(username));
        let source = ImageSource::new(bytes, "image/png", Some(file_name));
        self.load(Slot::Base, &source)
    }

    /// Drop the bitmap in `slot` and invalidate loads in flight.
    pub fn clear(&mut self, slot: Slot) {
        let state = self.slot_state_mut(slot);
        state.generation += 1;
        state.bitmap = None;
    }

    /// Bitmap currently held in `slot`.
    pub fn bitmap(&self, slot: Slot) -> Option<&Bitmap> {
        self.slot_state(slot).bitmap.as_ref()
    }

    /// Merge options.
    pub fn options(&self) -> MergeOptions {
        self.options
    }

    /// Replace merge options.
    pub fn set_options(&mut self, options: MergeOptions) {
        self.options = options;
    }

    /// Background fit options.
    pub fn fit_options(&self) -> FitOptions {
        self.fit
    }

    /// Replace background fit options.
    pub fn set_fit_options(&mut self, fit: FitOptions) {
        self.fit = fit;
    }

    /// Resize the preview viewport.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> SkinMergeResult<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SkinMergeError::validation(format!(
                "viewport must be finite and > 0, got {width}×{height}"
            )));
        }
        self.viewport = (width, height);
        Ok(())
    }

    /// Current base name used for downloads.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Merge overlay over base with the session's resize policy.
    pub fn composite(&mut self) -> SkinMergeResult<Bitmap> {
        let base = self.slots[slot_index(Slot::Base)]
            .bitmap
            .as_ref()
            .ok_or_else(|| SkinMergeError::validation("Please load a base skin PNG."))?;
        let overlay = self.slots[slot_index(Slot::Overlay)]
            .bitmap
            .as_ref()
            .ok_or_else(|| SkinMergeError::validation("Please load an overlay PNG."))?;

        self.compositor.composite(&CompositeRequest {
            base,
            overlay,
            auto_resize: self.options.auto_resize,
        })
    }

    /// The overlay alone at native size.
    pub fn overlay_only(&self) -> SkinMergeResult<Bitmap> {
        let overlay = self
            .bitmap(Slot::Overlay)
            .ok_or_else(|| SkinMergeError::validation("Please load an overlay PNG."))?;
        extract_overlay(overlay)
    }

    /// Background transform for the current image, viewport and fit options, if a background
    /// is loaded.
    pub fn background_transform(&self) -> SkinMergeResult<Option<TextureTransform>> {
        let Some(bg) = self.bitmap(Slot::Background) else {
            return Ok(None);
        };
        let (vw, vh) = self.viewport;
        compute_transform(bg.width(), bg.height(), vw, vh, &self.fit).map(Some)
    }

    /// Download file name for the merged skin.
    pub fn output_file_name(&self) -> String {
        output_file_name(self.options.preserve_filename, &self.base_name)
    }
}

fn slot_index(slot: Slot) -> usize {
    match slot {
        Slot::Base => 0,
        Slot::Overlay => 1,
        Slot::Background => 2,
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
