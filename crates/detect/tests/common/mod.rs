#![allow(dead_code)]

use {
    axum::{
        Router,
        body::Body,
        extract::{FromRequest, Multipart, State},
        http::{HeaderMap, Method, Request as HttpRequest, StatusCode, Uri, header},
        response::{IntoResponse, Response},
    },
    base::Vec2,
    bytes::Bytes,
    detect::{DetectError, FrameSource, LoadedResult, Surface},
    image::{Image, PixelFormat},
    std::{
        collections::VecDeque,
        net::SocketAddr,
        sync::{Arc, Mutex},
        time::Duration,
    },
    tokio::{
        net::TcpListener,
        time::{Instant, sleep},
    },
    video::{VideoError, VideoFrame},
};

/// What the mock server answers with.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: b"error".to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One field of a received `multipart/form-data` body.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Parse the body as a multipart form.
    pub async fn form(&self) -> Vec<FormPart> {
        let mut builder = HttpRequest::builder().method(self.method.clone());
        if let Some(content_type) = self.headers.get(header::CONTENT_TYPE) {
            builder = builder.header(header::CONTENT_TYPE, content_type.clone());
        }
        let request = builder.body(Body::from(self.body.clone())).unwrap();

        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap();
            parts.push(FormPart {
                name,
                file_name,
                content_type,
                data,
            });
        }
        parts
    }
}

struct Recorded {
    queued: VecDeque<Reply>,
    fallback: Reply,
    requests: Vec<Request>,
    active: usize,
    max_active: usize,
}

type Shared = Arc<Mutex<Recorded>>;

/// An HTTP server that records requests and plays back replies.
#[derive(Clone)]
pub struct MockServer {
    addr: SocketAddr,
    state: Shared,
}

impl MockServer {
    /// Start serving; every request gets `fallback` unless a reply was queued.
    pub async fn start(fallback: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(Recorded {
            queued: VecDeque::new(),
            fallback,
            requests: Vec::new(),
            active: 0,
            max_active: 0,
        }));

        let app = Router::new()
            .fallback(answer)
            .with_state(Arc::clone(&state));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Answer the next request with `reply` instead of the fallback.
    pub fn push(&self, reply: Reply) {
        self.state.lock().unwrap().queued.push_back(reply);
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Most requests that were ever being answered at the same time.
    pub fn max_concurrent(&self) -> usize {
        self.state.lock().unwrap().max_active
    }
}

async fn answer(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push(Request {
            method,
            path: uri.path().to_string(),
            headers,
            body,
        });
        state.active += 1;
        state.max_active = state.max_active.max(state.active);
        state
            .queued
            .pop_front()
            .unwrap_or_else(|| state.fallback.clone())
    };

    if !reply.delay.is_zero() {
        sleep(reply.delay).await;
    }
    state.lock().unwrap().active -= 1;

    let status = StatusCode::from_u16(reply.status).unwrap();
    (status, [(header::CONTENT_TYPE, "image/jpeg")], reply.body).into_response()
}

/// A small JPEG the mock server can hand back as the "annotated" result.
pub fn result_jpeg() -> Vec<u8> {
    let size = Vec2::new(64, 48);
    let data: Vec<u8> = (0..size.area()).flat_map(|i| [(i % 256) as u8, 40, 200]).collect();
    image::rgb_to_jpeg(size, &data, 90).unwrap()
}

pub fn rgb_frame(size: Vec2<usize>) -> VideoFrame {
    let data: Vec<u8> = (0..size.area())
        .flat_map(|i| [(i % 251) as u8, (i % 13) as u8 * 10, 90])
        .collect();
    VideoFrame::new(Image::new(size, data, PixelFormat::Rgb8))
}

/// A source that always shows the same frame (or nothing).
pub struct StillSource {
    pub frame: Option<VideoFrame>,
}

impl FrameSource for StillSource {
    async fn ready(&mut self) -> Result<(), VideoError> {
        Ok(())
    }

    fn current(&self) -> Option<VideoFrame> {
        self.frame.clone()
    }

    async fn close(self) {}
}

/// A source whose stream never delivers data.
pub struct StalledSource;

impl FrameSource for StalledSource {
    async fn ready(&mut self) -> Result<(), VideoError> {
        std::future::pending::<()>().await;
        Ok(())
    }

    fn current(&self) -> Option<VideoFrame> {
        None
    }

    async fn close(self) {}
}

/// Remembers every result it was asked to show.
#[derive(Default)]
pub struct RecordingSurface {
    shown: Mutex<Vec<(u64, Vec2<usize>, Bytes)>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shown(&self) -> Vec<(u64, Vec2<usize>, Bytes)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

impl Surface for RecordingSurface {
    fn show(&self, result: &LoadedResult) -> Result<(), DetectError> {
        self.shown
            .lock()
            .unwrap()
            .push((result.id, result.image.size, result.payload.clone()));
        Ok(())
    }
}

/// Poll `check` every 10ms until it holds or `limit` passes.
pub async fn eventually(limit: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    check()
}
