use super::*;

#[test]
fn bitmap_rejects_zero_dimensions_and_bad_lengths() {
    assert!(Bitmap::from_rgba8(0, 4, vec![]).is_err());
    assert!(Bitmap::from_rgba8(4, 0, vec![]).is_err());
    assert!(Bitmap::from_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(Bitmap::from_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn bitmap_pixel_addresses_rows_top_to_bottom() {
    let mut data = vec![0u8; 2 * 2 * 4];
    data[12..16].copy_from_slice(&[1, 2, 3, 4]);
    let bmp = Bitmap::from_rgba8(2, 2, data).unwrap();
    assert_eq!(bmp.pixel(1, 1), [1, 2, 3, 4]);
    assert_eq!(bmp.pixel(0, 1), [0, 0, 0, 0]);
    assert_eq!(bmp.dimensions(), (2, 2));
}

#[test]
fn filled_bitmap_repeats_color() {
    let bmp = Bitmap::filled(3, 2, [9, 8, 7, 255]).unwrap();
    assert_eq!(bmp.as_rgba8().len(), 24);
    assert!(bmp.as_rgba8().chunks_exact(4).all(|p| p == [9, 8, 7, 255]));
}

#[test]
fn to_rgba_image_keeps_pixels() {
    let bmp = Bitmap::filled(2, 1, [10, 20, 30, 40]).unwrap();
    let img = bmp.to_rgba_image().unwrap();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 40]);
}

#[test]
fn slot_names_are_lowercase() {
    assert_eq!(Slot::Base.to_string(), "base");
    assert_eq!(Slot::Background.as_str(), "background");
    assert_eq!(serde_json::to_string(&Slot::Overlay).unwrap(), "\"overlay\"");
}

#[test]
fn to_rgba_image_reports_short_buffer() {
    let broken = Bitmap {
        width: 2,
        height: 2,
        rgba8: std::sync::Arc::new(vec![0u8; 4]),
    };
    let err = broken.to_rgba_image().unwrap_err();
    assert!(err.to_string().contains("2×2"));
}
