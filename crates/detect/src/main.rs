use {
    base::{Vec2, log::LevelFilter},
    clap::{Parser, ValueEnum},
    detect::*,
    std::{error::Error, path::PathBuf, process::ExitCode, sync::Arc, time::Duration},
    video::{PatternConfig, VideoIn, VideoInConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// The local camera
    Camera,
    /// A synthetic moving gradient
    Pattern,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the detection server
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Path frames are posted to, resolved against the server URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Milliseconds between samples
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Width of the uploaded frame
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Height of the uploaded frame
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// JPEG quality, 1-100
    #[arg(long, default_value_t = DEFAULT_QUALITY)]
    quality: u8,

    /// Start a new cycle on every tick even if the previous one is still running
    #[arg(long)]
    allow_overlap: bool,

    /// Request timeout in milliseconds, 0 to wait forever
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Where frames come from
    #[arg(long, value_enum, default_value = "camera")]
    source: SourceKind,

    /// Camera device path, e.g. /dev/video0
    #[arg(long)]
    device: Option<PathBuf>,

    /// File that always holds the latest result
    #[arg(long, default_value = "detected.jpg")]
    output: PathBuf,

    /// Show results in a window instead of writing them to a file
    #[cfg(feature = "window")]
    #[arg(long)]
    window: bool,

    /// Write logs to date-named files in this directory instead of stdout
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log every cycle step
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> DetectConfig {
        let timeout = match self.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        DetectConfig::default()
            .with_server(self.server.clone())
            .with_endpoint(self.endpoint.clone())
            .with_interval(Duration::from_millis(self.interval_ms))
            .with_frame_size(Vec2::new(self.width, self.height))
            .with_quality(self.quality)
            .with_guard_overlap(!self.allow_overlap)
            .with_timeout(timeout)
    }

    fn video_config(&self) -> Option<VideoInConfig> {
        match self.source {
            SourceKind::Pattern => Some(VideoInConfig::Pattern(PatternConfig {
                size: Some(Vec2::new(self.width, self.height)),
                frame_rate: None,
            })),
            SourceKind::Camera => camera_config(self.device.clone()),
        }
    }
}

#[cfg(feature = "v4l2")]
fn camera_config(device: Option<PathBuf>) -> Option<VideoInConfig> {
    Some(VideoInConfig::V4l2(video::V4l2Config {
        path: device,
        ..Default::default()
    }))
}

#[cfg(not(feature = "v4l2"))]
fn camera_config(device: Option<PathBuf>) -> Option<VideoInConfig> {
    if let Some(device) = device {
        log::warn!(
            "ignoring --device {}: built without the v4l2 feature",
            device.display()
        );
    }
    None
}

/// What ends the run: Ctrl-C, or closing the result window.
struct ExitSignal {
    #[cfg(feature = "window")]
    view: Option<WindowView>,
}

impl ExitSignal {
    async fn wait(self) -> Result<(), Box<dyn Error>> {
        #[cfg(feature = "window")]
        if let Some(view) = self.view {
            tokio::select! {
                result = view.run() => result?,
                result = tokio::signal::ctrl_c() => result?,
            }
            return Ok(());
        }
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}

fn open_surface(args: &Args) -> (Arc<dyn Surface>, ExitSignal) {
    #[cfg(feature = "window")]
    if args.window {
        let (surface, view) = WindowSurface::new("Detect - ESC to exit");
        return (Arc::new(surface), ExitSignal { view: Some(view) });
    }
    log::info!("results go to {}", args.output.display());
    (
        Arc::new(FileSurface::new(args.output.clone())),
        ExitSignal {
            #[cfg(feature = "window")]
            view: None,
        },
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        base::default_level()
    };
    match &args.log_dir {
        Some(dir) => base::init_file_logger(dir, level)?,
        None => base::init_stdout_logger(level),
    }

    let config = args.config();
    let (surface, exit) = open_surface(&args);

    let handle = match Session::launch(config, VideoIn::open(args.video_config()), surface).await
    {
        Ok(handle) => handle,
        // already logged; the pipeline stays idle
        Err(DetectError::CameraUnavailable(_)) => return Ok(ExitCode::FAILURE),
        Err(e) => return Err(e.into()),
    };

    exit.wait().await?;

    log::info!("shutting down");
    let stats = handle.stop().await;
    log::info!("{}", stats);
    Ok(ExitCode::SUCCESS)
}
