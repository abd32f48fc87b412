use {
    crate::DetectError,
    std::future::Future,
    video::{VideoError, VideoFrame, VideoIn},
};

/// A live stream the sampler can read frames from.
pub trait FrameSource: Send + 'static {
    /// Resolves once the stream has delivered data.
    fn ready(&mut self) -> impl Future<Output = Result<(), VideoError>> + Send;

    /// Whatever the stream is showing right now.
    fn current(&self) -> Option<VideoFrame>;

    /// Release the underlying device.
    fn close(self) -> impl Future<Output = ()> + Send
    where
        Self: Sized;
}

impl FrameSource for VideoIn {
    async fn ready(&mut self) -> Result<(), VideoError> {
        VideoIn::ready(self).await
    }

    fn current(&self) -> Option<VideoFrame> {
        VideoIn::current(self)
    }

    async fn close(self) {
        VideoIn::close(self).await
    }
}

/// Run a camera request. Failure is logged here, once, and is terminal.
pub async fn acquire<S, F>(request: F) -> Result<S, DetectError>
where
    F: Future<Output = Result<S, VideoError>>,
{
    match request.await {
        Ok(source) => {
            log::info!("camera stream acquired");
            Ok(source)
        }
        Err(e) => {
            log::error!("camera unavailable: {}", e);
            Err(DetectError::CameraUnavailable(e))
        }
    }
}
