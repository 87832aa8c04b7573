//! skinmerge composites a base character skin with a transparent accessories overlay and
//! computes how a background image is fitted behind the 3D preview.
//!
//! # Pipeline overview
//!
//! 1. **Load**: encoded bytes -> [`Bitmap`] ([`decode_bitmap`], [`decode_pair`])
//! 2. **Composite**: base + overlay -> merged [`Bitmap`] ([`composite`], [`Compositor`])
//! 3. **Export**: merged bitmap -> PNG bytes and a download name ([`encode_png`],
//!    [`output_file_name`])
//! 4. **Fit** (preview only): background image + viewport -> [`TextureTransform`]
//!    ([`compute_transform`]), optionally rendered on the CPU with [`render_background`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pixel-exact**: no smoothing anywhere in compositing; scaling is nearest-neighbour.
//! - **Output size comes from the base**: the overlay never changes the merged dimensions.
//! - **Explicit state**: [`MergeSession`] holds the slots and options instead of globals.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composite;
mod fit;
mod foundation;

/// Overlay catalog built from bundles on disk or repository listings.
pub mod catalog;
/// PNG export and download naming.
pub mod export;
/// Merge workflow state.
pub mod session;
/// JSON settings.
pub mod settings;

pub use assets::decode::{
    ImageSource, accepts_mime, decode_bitmap, decode_pair, decode_source, load_bitmap,
    mime_for_path,
};
pub use catalog::{
    CatalogRules, OverlayCatalog, OverlayFile, OverlayFolder, contents_url, parse_repo_url,
    skin_url_for_username,
};
pub use composite::blend::{PremulRgba8, over, over_straight, premultiply, unpremultiply};
pub use composite::compositor::{
    CompositeRequest, Compositor, composite, extract_overlay, resize_nearest,
};
pub use export::{
    base_name_for_username, base_name_from_file_name, encode_png, output_file_name, write_png,
};
pub use fit::sample::render_background;
pub use fit::transform::{
    FitMode, FitOptions, MIN_REPEAT, MagFilter, MinFilter, SampleFilter, TextureTransform,
    WrapMode, Zoom, compute_transform,
};
pub use foundation::core::{Bitmap, Slot};
pub use foundation::error::{SkinMergeError, SkinMergeResult};
pub use session::{LoadTicket, MergeSession};
pub use settings::{MergeOptions, PreviewSettings, Settings};
