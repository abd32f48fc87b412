use {crate::DetectError, base::Vec2, reqwest::Url, std::time::Duration};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
pub const DEFAULT_ENDPOINT: &str = "/detect_api";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_FRAME_SIZE: Vec2<usize> = Vec2 { x: 640, y: 480 };
pub const DEFAULT_QUALITY: u8 = 92;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for one detection session.
///
/// Built with `Default` plus the `with_*` methods; `validate()` runs before
/// the camera is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectConfig {
    server: String,
    endpoint: String,
    interval: Duration,
    frame_size: Vec2<usize>,
    quality: u8,
    guard_overlap: bool,
    timeout: Option<Duration>,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            interval: DEFAULT_INTERVAL,
            frame_size: DEFAULT_FRAME_SIZE,
            quality: DEFAULT_QUALITY,
            guard_overlap: true,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl DetectConfig {
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_frame_size(mut self, frame_size: Vec2<usize>) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Skip ticks while the previous cycle is still in flight.
    pub fn with_guard_overlap(mut self, guard_overlap: bool) -> Self {
        self.guard_overlap = guard_overlap;
        self
    }

    /// Per-request timeout; `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn frame_size(&self) -> Vec2<usize> {
        self.frame_size
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn guard_overlap(&self) -> bool {
        self.guard_overlap
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full URL frames are posted to.
    ///
    /// The endpoint is resolved against the server URL, so an absolute path
    /// like `/detect_api` replaces any path the server URL carries.
    pub fn endpoint_url(&self) -> Result<Url, DetectError> {
        let server = Url::parse(&self.server)
            .map_err(|e| DetectError::Config(format!("bad server URL {:?}: {e}", self.server)))?;
        if server.scheme() != "http" && server.scheme() != "https" {
            return Err(DetectError::Config(format!(
                "server URL must be http or https, got {:?}",
                server.scheme()
            )));
        }
        server
            .join(&self.endpoint)
            .map_err(|e| DetectError::Config(format!("bad endpoint {:?}: {e}", self.endpoint)))
    }

    pub fn validate(&self) -> Result<(), DetectError> {
        if self.interval.is_zero() {
            return Err(DetectError::Config("interval must be positive".to_string()));
        }
        if self.frame_size.is_empty() {
            return Err(DetectError::Config(format!(
                "frame size must be non-empty, got {}",
                self.frame_size
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(DetectError::Config(format!(
                "JPEG quality must be 1-100, got {}",
                self.quality
            )));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(DetectError::Config("timeout must be positive".to_string()));
        }
        self.endpoint_url()?;
        Ok(())
    }
}
