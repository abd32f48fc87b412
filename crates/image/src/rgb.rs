use crate::*;
use base::Vec2;

pub fn yuyv_to_rgb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(size.area() * 3);

    for chunk in data.chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }

    rgb
}

pub fn jpeg_to_rgb(image: &Image) -> Result<Image, ImageError> {
    image.format.ensure_format(PixelFormat::Jpeg)?;
    let decoded = crates_image::load_from_memory(&image.data)
        .map_err(|e| ImageError::Decode(format!("Failed to decode JPEG: {}", e)))?;

    let rgb_image = decoded.to_rgb8();
    let (width, height) = rgb_image.dimensions();
    let size = Vec2::new(width as usize, height as usize);

    Ok(Image::new(size, rgb_image.into_raw(), PixelFormat::Rgb8))
}

/// Convert any supported image into packed RGB8.
pub fn to_rgb(image: &Image) -> Result<Image, ImageError> {
    match image.format {
        PixelFormat::Rgb8 => {
            image.check_len()?;
            Ok(image.clone())
        }
        PixelFormat::Yuyv => {
            image.check_len()?;
            Ok(Image::new(
                image.size,
                yuyv_to_rgb(image.size, &image.data),
                PixelFormat::Rgb8,
            ))
        }
        PixelFormat::Jpeg => jpeg_to_rgb(image),
    }
}

/// Stretch an RGB8 image onto a `target`-sized canvas (nearest neighbour).
///
/// An empty source or an empty target gives an empty image.
pub fn scale_rgb(image: &Image, target: Vec2<usize>) -> Result<Image, ImageError> {
    image.format.ensure_format(PixelFormat::Rgb8)?;
    image.check_len()?;

    if image.size.is_empty() || target.is_empty() {
        return Ok(Image::empty(PixelFormat::Rgb8));
    }
    if image.size == target {
        return Ok(image.clone());
    }

    let src = image.size;
    let mut data = Vec::with_capacity(target.area() * 3);
    for ty in 0..target.y {
        let row = (ty * src.y / target.y) * src.x * 3;
        for tx in 0..target.x {
            let i = row + (tx * src.x / target.x) * 3;
            data.extend_from_slice(&image.data[i..i + 3]);
        }
    }

    Ok(Image::new(target, data, PixelFormat::Rgb8))
}
