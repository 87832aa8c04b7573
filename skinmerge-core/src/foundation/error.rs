use crate::foundation::core::Slot;

/// Convenience result type used across skinmerge.
pub type SkinMergeResult<T> = Result<T, SkinMergeError>;

/// Top-level error taxonomy used by the loader, compositor, fitter and catalog.
///
/// Every input-related variant names the [`Slot`] it concerns so callers can scope the message
/// to the base skin, the overlay or the background.
#[derive(thiserror::Error, Debug)]
pub enum SkinMergeError {
    /// The underlying byte source could not be read.
    #[error("{slot}: failed to read file: {source}")]
    Read {
        /// Slot the bytes were destined for.
        slot: Slot,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The bytes did not parse as a supported raster image.
    #[error("{slot}: failed to decode image: {reason}")]
    Decode {
        /// Slot the bytes were destined for.
        slot: Slot,
        /// Codec message.
        reason: String,
    },

    /// The advertised MIME type was rejected before decoding.
    #[error("{slot}: unsupported file type '{mime}', please select a PNG or image file")]
    UnsupportedType {
        /// Slot the bytes were destined for.
        slot: Slot,
        /// Advertised MIME type.
        mime: String,
    },

    /// Overlay and base dimensions differ and auto-resize is disabled.
    #[error(
        "Size mismatch: overlay is {overlay_w}×{overlay_h}, base is {base_w}×{base_h}. \
         Enable \"Auto-resize overlay\" or provide matching sizes."
    )]
    SizeMismatch {
        /// Overlay width in pixels.
        overlay_w: u32,
        /// Overlay height in pixels.
        overlay_h: u32,
        /// Base width in pixels.
        base_w: u32,
        /// Base height in pixels.
        base_h: u32,
    },

    /// The preview dependency failed to initialize. Compositing and export are unaffected.
    #[error("3D viewer unavailable: {0}")]
    ViewerUnavailable(String),

    /// Invalid user-provided parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Overlay catalog or repository listing problems.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SkinMergeError {
    /// Build a [`SkinMergeError::Read`] value.
    pub fn read(slot: Slot, source: std::io::Error) -> Self {
        Self::Read { slot, source }
    }

    /// Build a [`SkinMergeError::Decode`] value.
    pub fn decode(slot: Slot, reason: impl Into<String>) -> Self {
        Self::Decode {
            slot,
            reason: reason.into(),
        }
    }

    /// Build a [`SkinMergeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SkinMergeError::Catalog`] value.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Build a [`SkinMergeError::ViewerUnavailable`] value.
    pub fn viewer_unavailable(msg: impl Into<String>) -> Self {
        Self::ViewerUnavailable(msg.into())
    }

    /// Slot this error is attributable to, if any.
    ///
    /// A size mismatch is reported against the overlay, since the base defines the output size.
    pub fn slot(&self) -> Option<Slot> {
        match self {
            Self::Read { slot, .. }
            | Self::Decode { slot, .. }
            | Self::UnsupportedType { slot, .. } => Some(*slot),
            Self::SizeMismatch { .. } => Some(Slot::Overlay),
            Self::ViewerUnavailable(_)
            | Self::Validation(_)
            | Self::Catalog(_)
            | Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
