use {image::ImageError, std::fmt, video::VideoError};

#[derive(Debug)]
pub enum DetectError {
    CameraUnavailable(VideoError),
    Config(String),
    Image(ImageError),
    Transport(reqwest::Error),
    Status(u16),
    Surface(String),
    Io(std::io::Error),
}

impl DetectError {
    /// True for failures that end the whole pipeline rather than one cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DetectError::CameraUnavailable(_) | DetectError::Config(_))
    }
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectError::CameraUnavailable(err) => write!(f, "camera unavailable: {err}"),
            DetectError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            DetectError::Image(err) => write!(f, "image error: {err}"),
            DetectError::Transport(err) => write!(f, "transport error: {err}"),
            DetectError::Status(status) => write!(f, "HTTP {status}"),
            DetectError::Surface(msg) => write!(f, "display error: {msg}"),
            DetectError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for DetectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DetectError::CameraUnavailable(err) => Some(err),
            DetectError::Image(err) => Some(err),
            DetectError::Transport(err) => Some(err),
            DetectError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ImageError> for DetectError {
    fn from(err: ImageError) -> Self {
        DetectError::Image(err)
    }
}

impl From<reqwest::Error> for DetectError {
    fn from(err: reqwest::Error) -> Self {
        DetectError::Transport(err)
    }
}

impl From<std::io::Error> for DetectError {
    fn from(err: std::io::Error) -> Self {
        DetectError::Io(err)
    }
}
