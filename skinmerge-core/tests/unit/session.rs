use std::io::Cursor;

use super::*;
use crate::fit::transform::{FitMode, Zoom};

fn png_source(w: u32, h: u32, rgba: [u8; 4], name: &str) -> ImageSource {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    ImageSource::new(buf, "image/png", Some(name.to_string()))
}

fn session() -> MergeSession {
    MergeSession::new(&Settings::default()).unwrap()
}

#[test]
fn composite_requires_both_slots() {
    let mut s = session();
    let err = s.composite().unwrap_err();
    assert!(err.to_string().contains("base skin"));

    s.load(Slot::Base, &png_source(4, 4, [0, 0, 0, 255], "steve.png"))
        .unwrap();
    let err = s.composite().unwrap_err();
    assert!(err.to_string().contains("overlay"));
    assert!(s.overlay_only().is_err());
}

#[test]
fn loading_base_sets_download_name() {
    let mut s = session();
    assert_eq!(s.output_file_name(), "base.png");
    s.load(Slot::Base, &png_source(4, 4, [0, 0, 0, 255], "Steve.PNG"))
        .unwrap();
    assert_eq!(s.base_name(), "Steve");
    assert_eq!(s.output_file_name(), "Steve.png");

    s.set_options(MergeOptions {
        preserve_filename: false,
        ..s.options()
    });
    assert_eq!(s.output_file_name(), "merged_skin.png");
}

#[test]
fn stale_load_results_are_discarded() {
    let mut s = session();
    let first = s.begin_load(Slot::Overlay);
    let second = s.begin_load(Slot::Overlay);
    assert_eq!(second.slot(), Slot::Overlay);

    let newer = Bitmap::filled(2, 2, [0, 255, 0, 255]).unwrap();
    let older = Bitmap::filled(2, 2, [255, 0, 0, 255]).unwrap();
    assert!(s.finish_load(second, Ok(newer.clone()), None).unwrap());
    assert!(!s.finish_load(first, Ok(older), None).unwrap());
    assert_eq!(s.bitmap(Slot::Overlay), Some(&newer));

    // Stale failures are discarded too.
    assert!(
        !s.finish_load(first, Err(SkinMergeError::decode(Slot::Overlay, "x")), None)
            .unwrap()
    );
}

#[test]
fn clear_invalidates_in_flight_loads() {
    let mut s = session();
    let ticket = s.begin_load(Slot::Background);
    s.clear(Slot::Background);
    let bmp = Bitmap::filled(1, 1, [0, 0, 0, 255]).unwrap();
    assert!(!s.finish_load(ticket, Ok(bmp), None).unwrap());
    assert!(s.bitmap(Slot::Background).is_none());
}

#[test]
fn current_decode_errors_are_returned_with_slot() {
    let mut s = session();
    let bad = ImageSource::new(b"nope".to_vec(), "image/png", None);
    let err = s.load(Slot::Overlay, &bad).unwrap_err();
    assert_eq!(err.slot(), Some(Slot::Overlay));
    assert!(s.bitmap(Slot::Overlay).is_none());
}

#[test]
fn composite_follows_session_resize_policy() {
    let mut s = session();
    s.load(Slot::Base, &png_source(8, 8, [0, 0, 0, 255], "b.png"))
        .unwrap();
    s.load(Slot::Overlay, &png_source(4, 4, [255, 0, 0, 255], "o.png"))
        .unwrap();
    assert!(matches!(
        s.composite().unwrap_err(),
        SkinMergeError::SizeMismatch { .. }
    ));

    s.set_options(MergeOptions {
        auto_resize: true,
        ..s.options()
    });
    let out = s.composite().unwrap();
    assert_eq!(out.dimensions(), (8, 8));
    assert_eq!(s.overlay_only().unwrap().dimensions(), (4, 4));
}

#[test]
fn background_transform_tracks_current_state() {
    let mut s = session();
    assert_eq!(s.background_transform().unwrap(), None);

    s.load(Slot::Background, &png_source(200, 50, [9, 9, 9, 255], "bg.png"))
        .unwrap();
    let cover = s.background_transform().unwrap().unwrap();
    assert!((cover.repeat_x - 2.25).abs() < 1e-9);

    s.set_fit_options(FitOptions {
        mode: FitMode::Stretch,
        zoom: Zoom::new(1.25).unwrap(),
        ..s.fit_options()
    });
    let stretch = s.background_transform().unwrap().unwrap();
    assert_eq!((stretch.repeat_x, stretch.repeat_y), (1.25, 1.25));

    s.set_viewport(100.0, 100.0).unwrap();
    assert!(s.set_viewport(0.0, 100.0).is_err());
    s.set_fit_options(FitOptions::default());
    let square = s.background_transform().unwrap().unwrap();
    assert!((square.repeat_x - 4.0).abs() < 1e-9);
}

#[test]
fn username_skin_names_the_download() {
    let mut s = session();
    let fetched = png_source(4, 4, [5, 5, 5, 255], "ignored.png").bytes;
    assert!(s.load_username_skin("Dinnerbone", fetched).unwrap());
    assert_eq!(s.base_name(), "Dinnerbone-skin");
    assert_eq!(s.output_file_name(), "Dinnerbone-skin.png");
    assert_eq!(s.bitmap(Slot::Base).unwrap().dimensions(), (4, 4));

    assert!(s.load_username_skin("  ", Vec::new()).is_err());
    let err = s.load_username_skin("Herobrine", b"404".to_vec()).unwrap_err();
    assert_eq!(err.slot(), Some(Slot::Base));
    assert_eq!(s.base_name(), "Dinnerbone-skin");
}
