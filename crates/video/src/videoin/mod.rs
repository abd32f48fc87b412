use {
    crate::*,
    base::Vec2,
    image::PixelFormat,
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    tokio::{
        sync::{oneshot, watch},
        task::{JoinHandle, spawn_blocking},
    },
};

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

#[derive(Debug, Clone)]
pub enum VideoInConfig {
    #[cfg(feature = "v4l2")]
    V4l2(v4l2::V4l2Config),
    Pattern(pattern::PatternConfig),
}

pub(crate) trait VideoInDevice: Send {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError>; // open the device, return config that was actually set
    fn close(&mut self); // close the device, if open
    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError>; // capture a frame
}

/// A live video stream.
///
/// The worker keeps only the most recent frame; `current()` samples it the
/// way a video element exposes whatever it is showing right now.
pub struct VideoIn {
    latest: watch::Receiver<Option<VideoFrame>>,
    cancel: Arc<AtomicBool>,
    size: Vec2<usize>,
    format: PixelFormat,
    frame_rate: f32,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    fn create_device(config: &VideoInConfig) -> Box<dyn VideoInDevice> {
        match config {
            #[cfg(feature = "v4l2")]
            VideoInConfig::V4l2(_) => Box::new(v4l2::V4l2::new()),
            VideoInConfig::Pattern(_) => Box::new(pattern::Pattern::new()),
        }
    }

    async fn spawn_worker(
        sender: watch::Sender<Option<VideoFrame>>,
        config: VideoInConfig,
        cancel: Arc<AtomicBool>,
    ) -> Result<(JoinHandle<()>, VideoInConfig), VideoError> {
        let mut device = Self::create_device(&config);

        // device.open() must run on the same OS thread as blocking_capture(),
        // so the resolved config comes back through a oneshot channel.
        let (init_tx, init_rx) = oneshot::channel::<Result<VideoInConfig, VideoError>>();

        let join_handle = spawn_blocking(move || {
            let mut config = match device.open(&config) {
                Ok(config) => {
                    let _ = init_tx.send(Ok(config.clone()));
                    config
                }
                Err(e) => {
                    let _ = init_tx.send(Err(e));
                    return;
                }
            };

            while !cancel.load(Ordering::Relaxed) {
                log::info!("video worker: starting capture loop");
                while !cancel.load(Ordering::Relaxed) {
                    match device.blocking_capture() {
                        Ok(frame) => {
                            if sender.is_closed() {
                                log::debug!("video worker: all readers gone");
                                device.close();
                                return;
                            }
                            sender.send_replace(Some(frame));
                        }
                        Err(e) => {
                            log::error!("video worker: capture failed: {}", e);
                            break;
                        }
                    }
                }

                // close, wait, and reopen the device
                while !cancel.load(Ordering::Relaxed) {
                    log::info!("video worker: reconnecting...");
                    device.close();
                    std::thread::sleep(std::time::Duration::from_millis(
                        WAIT_BEFORE_RECONNECT_MS,
                    ));
                    if let Ok(new_config) = device.open(&config) {
                        config = new_config;
                        break;
                    }
                }
            }
            device.close();
            log::debug!("video worker: stopped");
        });

        let config = init_rx
            .await
            .map_err(|_| VideoError::Device("Worker thread died during init".to_string()))??;

        Ok((join_handle, config))
    }

    fn decode_config(config: &VideoInConfig) -> (Vec2<usize>, PixelFormat, f32) {
        match config {
            #[cfg(feature = "v4l2")]
            VideoInConfig::V4l2(config) => (
                config.size.unwrap_or_default(),
                config.format.unwrap_or(PixelFormat::Yuyv),
                config.frame_rate.unwrap_or_default(),
            ),
            VideoInConfig::Pattern(config) => (
                config.size.unwrap_or_default(),
                PixelFormat::Rgb8,
                config.frame_rate.unwrap_or_default(),
            ),
        }
    }

    /// The config used when the caller does not pick a device.
    pub fn default_config() -> Option<VideoInConfig> {
        #[cfg(feature = "v4l2")]
        let config = Some(VideoInConfig::V4l2(v4l2::V4l2Config::default()));
        #[cfg(not(feature = "v4l2"))]
        let config = None;
        config
    }

    /// Open a video stream. With no config, the platform camera is used.
    ///
    /// Fails if the device cannot be opened (missing, busy, no permission)
    /// or if no camera backend was compiled in.
    pub async fn open(config: Option<VideoInConfig>) -> Result<Self, VideoError> {
        let config = match config.or_else(Self::default_config) {
            Some(config) => config,
            None => {
                return Err(VideoError::Device(
                    "no camera backend available (build with the v4l2 feature)".to_string(),
                ));
            }
        };

        let (sender, latest) = watch::channel::<Option<VideoFrame>>(None);

        // external cancelation flag
        let cancel = Arc::new(AtomicBool::new(false));

        let (join_handle, config) =
            Self::spawn_worker(sender, config, Arc::clone(&cancel)).await?;

        let (size, format, frame_rate) = Self::decode_config(&config);
        log::info!(
            "video opened: {} {:?} at {:.1} fps",
            size,
            format,
            frame_rate
        );

        Ok(Self {
            latest,
            cancel,
            size,
            format,
            frame_rate,
            join_handle: Some(join_handle),
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Wait until the stream has delivered its first frame.
    pub async fn ready(&mut self) -> Result<(), VideoError> {
        self.latest
            .wait_for(|frame| frame.is_some())
            .await
            .map(|_| ())
            .map_err(|_| VideoError::Closed)
    }

    /// The most recent frame, or `None` if nothing was delivered yet.
    pub fn current(&self) -> Option<VideoFrame> {
        self.latest.borrow().clone()
    }

    /// Stop the worker and wait for the device to be released.
    pub async fn close(mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            if let Err(e) = join_handle.await {
                log::warn!("video worker ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            join_handle.abort();
        }
    }
}

pub mod pattern;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use pattern::PatternConfig;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Config;
