//! Image conversion and JPEG coding for the detection client.
//!
//! Frames come out of the camera as RGB8, YUYV or MJPEG. Everything is
//! normalized to packed RGB8 before scaling or encoding.

mod error;
pub use error::*;

mod image;
pub use image::*;

mod jpeg;
pub use jpeg::*;

mod pixelformat;
pub use pixelformat::*;

mod rgb;
pub use rgb::*;

mod framebuffer;
pub use framebuffer::*;

use base::Vec2;

fn decode_image_inner(data: &[u8]) -> Result<Image, ImageError> {
    let img = crates_image::load_from_memory(data)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Image::new(
        Vec2::new(width as usize, height as usize),
        rgb.into_raw(),
        PixelFormat::Rgb8,
    ))
}

fn encode_jpeg_inner(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    let rgb = to_rgb(image)?;
    rgb_to_jpeg(rgb.size, &rgb.data, quality)
}

/// Decodes an image from raw bytes into RGB8.
///
/// The format is auto-detected (JPEG, PNG, GIF, BMP, TIFF, WebP). The
/// CPU-bound decoding work runs on tokio's blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub async fn decode_image(data: &[u8]) -> Result<Image, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode_image_inner(&owned))
        .await
        .map_err(|e| ImageError::Decode(e.to_string()))?
}

/// Encodes an `Image` as JPEG bytes.
///
/// The `quality` parameter controls JPEG compression (1-100, higher = better
/// quality). Non-RGB sources are converted first. The CPU-bound encoding work
/// runs on tokio's blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Encode` for empty images or when encoding fails.
pub async fn encode_jpeg(image: Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg_inner(&image, quality))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}
