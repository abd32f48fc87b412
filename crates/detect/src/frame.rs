use {
    base::Vec2,
    bytes::Bytes,
    image::{Image, ImageError, PixelFormat},
    video::VideoFrame,
};

/// Offscreen RGB bitmap the current video frame is drawn into.
///
/// Always sized to the configured frame size, unless there was nothing to
/// draw, in which case it is empty.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    image: Image,
}

impl FrameBuffer {
    /// Stretch `frame` onto a `size` canvas.
    pub fn draw(frame: &VideoFrame, size: Vec2<usize>) -> Result<Self, ImageError> {
        if frame.color.is_empty() || size.is_empty() {
            return Ok(Self {
                image: Image::empty(PixelFormat::Rgb8),
            });
        }
        let rgb = image::to_rgb(&frame.color)?;
        Ok(Self {
            image: image::scale_rgb(&rgb, size)?,
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.image.size
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    /// Compress the buffer to JPEG. An empty buffer yields `None`.
    pub async fn encode(self, quality: u8) -> Result<Option<EncodedFrame>, ImageError> {
        if self.image.is_empty() {
            return Ok(None);
        }
        let jpeg = image::encode_jpeg(self.image, quality).await?;
        if jpeg.is_empty() {
            return Ok(None);
        }
        Ok(Some(EncodedFrame {
            bytes: Bytes::from(jpeg),
        }))
    }
}

/// JPEG bytes of one frame, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    bytes: Bytes,
}

impl EncodedFrame {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
