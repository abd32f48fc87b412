use {base::Vec2, image::Image, std::time::Instant};

/// One frame as delivered by a capture device.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub color: Image,
    pub captured_at: Instant,
}

impl VideoFrame {
    pub fn new(color: Image) -> Self {
        Self {
            color,
            captured_at: Instant::now(),
        }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.color.size
    }
}
