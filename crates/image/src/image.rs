use {crate::*, base::Vec2};

/// A bitmap in one of the supported pixel formats.
///
/// `data` is tightly packed, row-major. For `PixelFormat::Jpeg` it holds the
/// compressed stream and `size` is what the producer reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// An image with no pixels.
    pub fn empty(format: PixelFormat) -> Self {
        Self::new(Vec2::zero(), Vec::new(), format)
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty() || self.data.is_empty()
    }

    /// Check that `data` holds exactly the bytes `size` and `format` call for.
    pub fn check_len(&self) -> Result<(), ImageError> {
        let expected = match self.format.bytes_per_pixel() {
            Some(bpp) => self.size.area() * bpp,
            None => return Ok(()),
        };
        if self.data.len() != expected {
            return Err(ImageError::Size {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }
}
