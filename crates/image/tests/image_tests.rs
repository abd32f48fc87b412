use base::Vec2;
use image::{Image, ImageError, PixelFormat};

#[test]
fn test_image_new_rgb8() {
    let size = Vec2::new(2, 3);
    let data: Vec<u8> = (0..18).collect();
    let image = Image::new(size, data.clone(), PixelFormat::Rgb8);

    assert_eq!(image.size, size);
    assert_eq!(image.data, data);
    assert!(!image.is_empty());
    assert!(image.check_len().is_ok());
}

#[test]
fn test_image_empty() {
    assert!(Image::empty(PixelFormat::Rgb8).is_empty());
    assert!(Image::new(Vec2::new(4, 0), vec![], PixelFormat::Yuyv).is_empty());
}

#[test]
fn test_check_len_mismatch() {
    let image = Image::new(Vec2::new(2, 2), vec![0; 7], PixelFormat::Yuyv);
    assert_eq!(
        image.check_len(),
        Err(ImageError::Size {
            expected: 8,
            got: 7
        })
    );
}

#[test]
fn test_yuyv_to_rgb() {
    let rgb = image::yuyv_to_rgb(Vec2::new(2, 1), &[128u8, 128, 128, 128]);

    assert_eq!(rgb.len(), 6);
    for &v in &rgb {
        assert!((126..=130).contains(&v));
    }
}

#[test]
fn test_to_rgb_from_yuyv() {
    let image = Image::new(Vec2::new(2, 2), vec![128u8; 8], PixelFormat::Yuyv);

    let rgb = image::to_rgb(&image).unwrap();

    assert_eq!(rgb.format, PixelFormat::Rgb8);
    assert_eq!(rgb.size, Vec2::new(2, 2));
    assert_eq!(rgb.data.len(), 12);
}

#[test]
fn test_to_rgb_from_jpeg() {
    let size = Vec2::new(4, 4);
    let jpeg = image::rgb_to_jpeg(size, &[200u8; 48], 90).unwrap();
    let image = Image::new(size, jpeg, PixelFormat::Jpeg);

    let rgb = image::to_rgb(&image).unwrap();

    assert_eq!(rgb.size, size);
    assert_eq!(rgb.data.len(), 48);
}

#[test]
fn test_scale_rgb_upscale_repeats_pixels() {
    // red, green
    let image = Image::new(
        Vec2::new(2, 1),
        vec![255, 0, 0, 0, 255, 0],
        PixelFormat::Rgb8,
    );

    let scaled = image::scale_rgb(&image, Vec2::new(4, 2)).unwrap();

    assert_eq!(scaled.size, Vec2::new(4, 2));
    assert_eq!(scaled.data.len(), 24);
    assert_eq!(&scaled.data[0..3], &[255, 0, 0]);
    assert_eq!(&scaled.data[3..6], &[255, 0, 0]);
    assert_eq!(&scaled.data[6..9], &[0, 255, 0]);
    assert_eq!(&scaled.data[12..15], &[255, 0, 0]);
}

#[test]
fn test_scale_rgb_downscale() {
    let data: Vec<u8> = (0..16u8).flat_map(|v| [v, v, v]).collect();
    let image = Image::new(Vec2::new(4, 4), data, PixelFormat::Rgb8);

    let scaled = image::scale_rgb(&image, Vec2::new(2, 2)).unwrap();

    assert_eq!(scaled.size, Vec2::new(2, 2));
    // picks source pixels (0,0), (2,0), (0,2), (2,2)
    let picked: Vec<u8> = scaled.data.chunks_exact(3).map(|c| c[0]).collect();
    assert_eq!(picked, vec![0, 2, 8, 10]);
}

#[test]
fn test_scale_rgb_empty_source_or_target() {
    let image = Image::new(Vec2::new(2, 1), vec![0; 6], PixelFormat::Rgb8);
    assert!(image::scale_rgb(&image, Vec2::new(0, 0)).unwrap().is_empty());

    let empty = Image::empty(PixelFormat::Rgb8);
    assert!(image::scale_rgb(&empty, Vec2::new(640, 480)).unwrap().is_empty());
}

#[test]
fn test_rgb_to_u32() {
    let buf = image::rgb_to_u32(Vec2::new(2, 1), &[255, 0, 0, 0, 255, 0]);

    assert_eq!(buf, vec![0xFFFF0000, 0xFF00FF00]);
}
