use {
    crate::{DetectError, LoadedResult, Surface},
    base::Vec2,
    minifb::{Key, Window, WindowOptions},
    std::time::Duration,
    tokio::sync::mpsc,
};

// frames waiting for the window; older results are dropped when full
const WINDOW_QUEUE: usize = 2;

// how often window events are pumped between results
const PUMP_INTERVAL: Duration = Duration::from_millis(33);

struct WindowFrame {
    size: Vec2<usize>,
    pixels: Vec<u32>,
}

/// Sends results to a `WindowView` running on the main thread.
pub struct WindowSurface {
    sender: mpsc::Sender<WindowFrame>,
}

/// The desktop window. Must be driven from the thread that created it.
pub struct WindowView {
    title: String,
    receiver: mpsc::Receiver<WindowFrame>,
}

impl WindowSurface {
    pub fn new(title: impl Into<String>) -> (Self, WindowView) {
        let (sender, receiver) = mpsc::channel(WINDOW_QUEUE);
        (
            Self { sender },
            WindowView {
                title: title.into(),
                receiver,
            },
        )
    }
}

impl Surface for WindowSurface {
    fn show(&self, result: &LoadedResult) -> Result<(), DetectError> {
        let frame = WindowFrame {
            size: result.image.size,
            pixels: image::rgb_to_u32(result.image.size, &result.image.data),
        };
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::debug!("window busy, dropping result #{}", result.id);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(DetectError::Surface("window closed".to_string()))
            }
        }
    }
}

impl WindowView {
    /// Show results until the window is closed or ESC is pressed.
    pub async fn run(mut self) -> Result<(), DetectError> {
        let mut window: Option<(Window, Vec2<usize>)> = None;
        let mut pump = tokio::time::interval(PUMP_INTERVAL);

        loop {
            tokio::select! {
                frame = self.receiver.recv() => {
                    let Some(frame) = frame else {
                        break;
                    };
                    if frame.size.is_empty() {
                        continue;
                    }
                    // reopen when the result size changes
                    if window.as_ref().map(|(_, size)| *size) != Some(frame.size) {
                        let opened = Window::new(
                            &self.title,
                            frame.size.x,
                            frame.size.y,
                            WindowOptions::default(),
                        )
                        .map_err(|e| DetectError::Surface(e.to_string()))?;
                        window = Some((opened, frame.size));
                    }
                    if let Some((window, size)) = window.as_mut() {
                        window
                            .update_with_buffer(&frame.pixels, size.x, size.y)
                            .map_err(|e| DetectError::Surface(e.to_string()))?;
                    }
                }
                _ = pump.tick() => {
                    if let Some((window, _)) = window.as_mut() {
                        if !window.is_open() || window.is_key_down(Key::Escape) {
                            log::info!("window closed");
                            break;
                        }
                        window.update();
                    }
                }
            }
        }
        Ok(())
    }
}
