use crate::*;
use base::Vec2;
use crates_image::ImageEncoder;

pub fn rgb_to_jpeg(size: Vec2<usize>, data: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    if size.is_empty() {
        return Err(ImageError::Encode("cannot encode an empty image".to_string()));
    }
    let expected = size.area() * 3;
    if data.len() != expected {
        return Err(ImageError::Size {
            expected,
            got: data.len(),
        });
    }

    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            data,
            size.x as u32,
            size.y as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// True if `data` starts with a JPEG SOI marker.
pub fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8])
}
