use super::*;

const RED: [u8; 4] = [255, 0, 0, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn bitmap_from_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Bitmap {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&f(x, y));
        }
    }
    Bitmap::from_rgba8(w, h, data).unwrap()
}

#[test]
fn equal_sizes_draw_overlay_in_place() {
    let base = Bitmap::filled(4, 4, [0, 0, 255, 255]).unwrap();
    let overlay = bitmap_from_fn(4, 4, |x, y| if (x, y) == (1, 2) { RED } else { CLEAR });
    let out = composite(&base, &overlay, false).unwrap();
    assert_eq!(out.pixel(1, 2), RED);
    assert_eq!(out.pixel(0, 0), [0, 0, 255, 255]);
}

#[test]
fn mismatch_without_auto_resize_fails_with_all_dimensions() {
    let base = Bitmap::filled(64, 32, [0, 0, 0, 255]).unwrap();
    let overlay = Bitmap::filled(64, 64, CLEAR).unwrap();
    let err = composite(&base, &overlay, false).unwrap_err();
    assert!(matches!(
        err,
        SkinMergeError::SizeMismatch {
            overlay_w: 64,
            overlay_h: 64,
            base_w: 64,
            base_h: 32
        }
    ));
}

#[test]
fn auto_resize_keeps_base_dimensions() {
    let base = Bitmap::filled(8, 8, [0, 0, 0, 255]).unwrap();
    let overlay = Bitmap::filled(3, 5, RED).unwrap();
    let out = composite(&base, &overlay, true).unwrap();
    assert_eq!(out.dimensions(), (8, 8));
    assert!(out.as_rgba8().chunks_exact(4).all(|p| p == RED));
}

#[test]
fn downscaled_overlay_samples_pixel_centers() {
    let base = Bitmap::filled(2, 1, [0, 0, 0, 255]).unwrap();
    let overlay = bitmap_from_fn(4, 1, |x, _| [(x as u8 + 1) * 10, 0, 0, 255]);
    let out = composite(&base, &overlay, true).unwrap();
    assert_eq!(out.pixel(0, 0), [20, 0, 0, 255]);
    assert_eq!(out.pixel(1, 0), [40, 0, 0, 255]);
}

#[test]
fn scaled_overlay_matches_image_nearest_filter() {
    let overlay = bitmap_from_fn(7, 5, |x, y| [x as u8 * 30, y as u8 * 40, 9, 255]);
    for (w, h) in [(3, 2), (14, 10), (5, 9)] {
        let expected = image::imageops::resize(
            &overlay.to_rgba_image().unwrap(),
            w,
            h,
            image::imageops::FilterType::Nearest,
        );
        let out = resize_nearest(&overlay, w, h).unwrap();
        assert_eq!(out.as_rgba8(), expected.as_raw().as_slice(), "{w}×{h}");
    }
}

#[test]
fn reused_compositor_matches_fresh_surface() {
    let base = bitmap_from_fn(4, 4, |x, y| [x as u8 * 40, y as u8 * 40, 7, 255]);
    let overlay = bitmap_from_fn(2, 2, |x, _| if x == 0 { [9, 9, 9, 128] } else { CLEAR });
    let mut compositor = Compositor::new();
    let req = CompositeRequest {
        base: &base,
        overlay: &overlay,
        auto_resize: true,
    };
    let a = compositor.composite(&req).unwrap();
    let b = compositor.composite(&req).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, composite(&base, &overlay, true).unwrap());
}

#[test]
fn failed_composite_leaves_surface_reusable() {
    let base = Bitmap::filled(2, 2, [1, 1, 1, 255]).unwrap();
    let small = Bitmap::filled(1, 1, RED).unwrap();
    let mut compositor = Compositor::new();
    assert!(
        compositor
            .composite(&CompositeRequest {
                base: &base,
                overlay: &small,
                auto_resize: false,
            })
            .is_err()
    );
    let out = compositor
        .composite(&CompositeRequest {
            base: &base,
            overlay: &small,
            auto_resize: true,
        })
        .unwrap();
    assert!(out.as_rgba8().chunks_exact(4).all(|p| p == RED));
}

#[test]
fn extract_overlay_is_a_native_copy() {
    let overlay = bitmap_from_fn(3, 2, |x, y| [x as u8, y as u8, 0, (x * 50) as u8]);
    let copy = extract_overlay(&overlay).unwrap();
    assert_eq!(copy, overlay);
    assert_eq!(copy.pixel(2, 1), [2, 1, 0, 100]);
}

#[test]
fn resize_nearest_doubles_pixels() {
    let src = bitmap_from_fn(2, 1, |x, _| if x == 0 { RED } else { CLEAR });
    let out = resize_nearest(&src, 4, 2).unwrap();
    assert_eq!(out.pixel(1, 1), RED);
    assert_eq!(out.pixel(2, 0), CLEAR);
    assert!(resize_nearest(&src, 0, 2).is_err());
}
