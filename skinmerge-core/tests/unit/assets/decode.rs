use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let bytes = png_bytes(3, 2, [100, 50, 200, 128]);
    let bmp = decode_bitmap(&bytes, "image/png", Slot::Overlay).unwrap();
    assert_eq!(bmp.dimensions(), (3, 2));
    assert_eq!(bmp.pixel(2, 1), [100, 50, 200, 128]);
}

#[test]
fn mime_check_is_loose() {
    assert!(accepts_mime(""));
    assert!(accepts_mime("image/png"));
    assert!(accepts_mime("image/jpeg"));
    assert!(accepts_mime("application/x-png"));
    assert!(!accepts_mime("text/plain"));
    assert!(!accepts_mime("application/octet-stream"));
}

#[test]
fn unsupported_mime_is_rejected_before_decode() {
    let bytes = png_bytes(1, 1, [0, 0, 0, 255]);
    let err = decode_bitmap(&bytes, "text/plain", Slot::Base).unwrap_err();
    assert!(matches!(
        err,
        SkinMergeError::UnsupportedType { slot: Slot::Base, ref mime } if mime == "text/plain"
    ));
}

#[test]
fn garbage_bytes_are_a_decode_error_for_the_slot() {
    let err = decode_bitmap(b"not an image", "image/png", Slot::Background).unwrap_err();
    assert!(matches!(
        err,
        SkinMergeError::Decode {
            slot: Slot::Background,
            ..
        }
    ));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_bitmap(dir.path().join("nope.png"), Slot::Overlay).unwrap_err();
    assert!(matches!(
        err,
        SkinMergeError::Read {
            slot: Slot::Overlay,
            ..
        }
    ));
}

#[test]
fn load_bitmap_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("steve.PNG");
    std::fs::write(&path, png_bytes(4, 4, [1, 2, 3, 255])).unwrap();

    let src = ImageSource::from_path(&path, Slot::Base).unwrap();
    assert_eq!(src.mime, "image/png");
    assert_eq!(src.file_name.as_deref(), Some("steve.PNG"));

    let bmp = load_bitmap(&path, Slot::Base).unwrap();
    assert_eq!(bmp.pixel(3, 3), [1, 2, 3, 255]);
}

#[test]
fn non_image_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, png_bytes(1, 1, [0, 0, 0, 255])).unwrap();
    assert!(matches!(
        load_bitmap(&path, Slot::Overlay).unwrap_err(),
        SkinMergeError::UnsupportedType { .. }
    ));
    assert_eq!(mime_for_path(Path::new("skin")), "");
}

#[test]
fn decode_pair_reports_each_slot_independently() {
    let base = ImageSource::new(png_bytes(2, 2, [0, 0, 0, 255]), "image/png", None);
    let overlay = ImageSource::new(b"junk".to_vec(), "image/png", None);
    let (b, o) = decode_pair(&base, &overlay);
    assert_eq!(b.unwrap().dimensions(), (2, 2));
    assert_eq!(o.unwrap_err().slot(), Some(Slot::Overlay));
}
