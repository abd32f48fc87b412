use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::time::{Duration, Instant},
};

const DEFAULT_SIZE: Vec2<usize> = Vec2 { x: 640, y: 480 };
const DEFAULT_FRAME_RATE: f32 = 30.0;

/// Synthetic camera producing a moving RGB gradient.
#[derive(Debug, Clone, Default)]
pub struct PatternConfig {
    pub size: Option<Vec2<usize>>,
    pub frame_rate: Option<f32>,
}

pub(crate) struct Pattern {
    size: Vec2<usize>,
    period: Duration,
    frame_index: u64,
    next_due: Option<Instant>,
}

impl Pattern {
    pub fn new() -> Self {
        Self {
            size: Vec2::zero(),
            period: Duration::ZERO,
            frame_index: 0,
            next_due: None,
        }
    }

    fn render(&self) -> Vec<u8> {
        let offset = (self.frame_index % 256) as usize;
        let mut data = Vec::with_capacity(self.size.area() * 3);
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                data.extend_from_slice(&[
                    ((x + offset) % 256) as u8,
                    ((y + offset) % 256) as u8,
                    offset as u8,
                ]);
            }
        }
        data
    }
}

impl VideoInDevice for Pattern {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        #[allow(irrefutable_let_patterns)]
        let config = if let VideoInConfig::Pattern(config) = config {
            config
        } else {
            return Err(VideoError::Device(
                "Pattern::open should be called with VideoInConfig::Pattern".to_string(),
            ));
        };

        let frame_rate = config.frame_rate.unwrap_or(DEFAULT_FRAME_RATE);
        let invalid = || VideoError::Device(format!("invalid frame rate: {frame_rate}"));
        if !(frame_rate > 0.0) {
            return Err(invalid());
        }
        let period = Duration::try_from_secs_f32(1.0 / frame_rate).map_err(|_| invalid())?;

        // zero sizes are allowed and produce empty frames
        self.size = config.size.unwrap_or(DEFAULT_SIZE);
        self.period = period;
        self.next_due = Some(Instant::now());

        Ok(VideoInConfig::Pattern(PatternConfig {
            size: Some(self.size),
            frame_rate: Some(frame_rate),
        }))
    }

    fn close(&mut self) {
        self.next_due = None;
    }

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        let Some(due) = self.next_due else {
            return Err(VideoError::Stream("No stream".to_string()));
        };

        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }
        self.next_due = Some(due + self.period);

        let color = Image::new(self.size, self.render(), PixelFormat::Rgb8);
        self.frame_index += 1;
        Ok(VideoFrame::new(color))
    }
}
