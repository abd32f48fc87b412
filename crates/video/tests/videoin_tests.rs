use {
    base::Vec2,
    image::PixelFormat,
    std::time::Duration,
    tokio::time::timeout,
    video::{PatternConfig, VideoError, VideoIn, VideoInConfig},
};

fn pattern(size: Vec2<usize>, frame_rate: f32) -> Option<VideoInConfig> {
    Some(VideoInConfig::Pattern(PatternConfig {
        size: Some(size),
        frame_rate: Some(frame_rate),
    }))
}

#[tokio::test]
async fn test_pattern_open_reports_config() {
    let videoin = VideoIn::open(pattern(Vec2::new(32, 24), 50.0))
        .await
        .unwrap();

    assert_eq!(videoin.size(), Vec2::new(32, 24));
    assert_eq!(videoin.format(), PixelFormat::Rgb8);
    assert_eq!(videoin.frame_rate(), 50.0);
}

#[tokio::test]
async fn test_pattern_ready_then_current_frame() {
    let mut videoin = VideoIn::open(pattern(Vec2::new(32, 24), 50.0))
        .await
        .unwrap();

    timeout(Duration::from_secs(5), videoin.ready())
        .await
        .expect("ready timed out")
        .unwrap();

    let frame = videoin.current().expect("no current frame");
    assert_eq!(frame.size(), Vec2::new(32, 24));
    assert_eq!(frame.color.format, PixelFormat::Rgb8);
    assert_eq!(frame.color.data.len(), 32 * 24 * 3);
}

#[tokio::test]
async fn test_current_frame_advances() {
    let mut videoin = VideoIn::open(pattern(Vec2::new(8, 8), 100.0))
        .await
        .unwrap();
    videoin.ready().await.unwrap();

    let first = videoin.current().unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let later = videoin.current().unwrap();

    assert!(later.captured_at > first.captured_at);
}

#[tokio::test]
async fn test_zero_sized_pattern_delivers_empty_frames() {
    let mut videoin = VideoIn::open(pattern(Vec2::new(0, 0), 100.0))
        .await
        .unwrap();
    videoin.ready().await.unwrap();

    let frame = videoin.current().unwrap();
    assert!(frame.color.is_empty());
}

#[tokio::test]
async fn test_invalid_frame_rate_fails_open() {
    let result = VideoIn::open(pattern(Vec2::new(8, 8), 0.0)).await;
    assert!(matches!(result, Err(VideoError::Device(_))));
}

#[tokio::test]
async fn test_tiny_frame_rate_fails_open() {
    // the frame period would overflow a Duration
    let result = VideoIn::open(pattern(Vec2::new(8, 8), 1e-30)).await;
    match result {
        Err(VideoError::Device(msg)) => assert!(msg.contains("invalid frame rate")),
        Err(e) => panic!("expected invalid frame rate, got {}", e),
        Ok(_) => panic!("expected invalid frame rate, got an open stream"),
    }
}

#[cfg(not(feature = "v4l2"))]
#[tokio::test]
async fn test_default_without_backend_fails_open() {
    let result = VideoIn::open(None).await;
    assert!(matches!(result, Err(VideoError::Device(_))));
}

#[tokio::test]
async fn test_close_releases_worker() {
    let mut videoin = VideoIn::open(pattern(Vec2::new(8, 8), 100.0))
        .await
        .unwrap();
    videoin.ready().await.unwrap();

    timeout(Duration::from_secs(5), videoin.close())
        .await
        .expect("close timed out");
}

#[tokio::test]
async fn test_drop_without_close() {
    let videoin = VideoIn::open(pattern(Vec2::new(8, 8), 100.0)).await;
    drop(videoin);
}

#[test]
fn test_error_display() {
    assert_eq!(VideoError::Closed.to_string(), "video stream closed");
    assert!(
        VideoError::Device("no such device".to_string())
            .to_string()
            .contains("device error")
    );
}
