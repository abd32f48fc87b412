use {
    crate::*,
    std::{future::Future, sync::Arc},
    tokio::{
        sync::oneshot,
        task::{JoinError, JoinHandle, JoinSet},
        time::{Instant, MissedTickBehavior, interval_at},
    },
    video::{VideoError, VideoFrame},
};

/// Where a cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Capturing,
    Encoding,
    Uploading,
    AwaitingResponse,
    Rendering,
}

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The previous cycle was still running, so this tick was skipped.
    Busy,
    /// The stream had no current frame.
    Inactive,
    /// Nothing to encode (zero-sized frame or undecodable camera data).
    EmptyFrame,
    /// Network error or non-success status.
    TransportFailed,
    /// The server answered with an empty body.
    EmptyResponse,
    Rendered { result_id: u64 },
    RenderFailed,
}

// logs each state change of one cycle
struct CycleTrace {
    cycle: u64,
    state: CycleState,
}

impl CycleTrace {
    fn new(cycle: u64) -> Self {
        Self {
            cycle,
            state: CycleState::Capturing,
        }
    }

    fn enter(&mut self, state: CycleState) {
        log::debug!("cycle {}: {:?} -> {:?}", self.cycle, self.state, state);
        self.state = state;
    }

    fn finish(mut self, outcome: CycleOutcome) -> CycleOutcome {
        self.enter(CycleState::Idle);
        outcome
    }
}

// everything a cycle needs after the frame was captured
struct Pipeline {
    config: DetectConfig,
    uploader: UploadClient,
    renderer: ResultRenderer,
    stats: Arc<SessionStats>,
}

impl Pipeline {
    async fn process(&self, cycle: u64, frame: VideoFrame) -> CycleOutcome {
        let mut trace = CycleTrace::new(cycle);

        trace.enter(CycleState::Encoding);
        let size = self.config.frame_size();
        let buffer =
            match tokio::task::spawn_blocking(move || FrameBuffer::draw(&frame, size)).await {
                Ok(Ok(buffer)) => buffer,
                Ok(Err(e)) => {
                    log::warn!("cycle {}: could not draw frame: {}", cycle, e);
                    return trace.finish(CycleOutcome::EmptyFrame);
                }
                Err(e) => {
                    log::error!("cycle {}: draw task failed: {}", cycle, e);
                    return trace.finish(CycleOutcome::EmptyFrame);
                }
            };
        let encoded = match buffer.encode(self.config.quality()).await {
            Ok(Some(encoded)) => encoded,
            Ok(None) => {
                log::warn!("cycle {}: empty frame, nothing sent", cycle);
                return trace.finish(CycleOutcome::EmptyFrame);
            }
            Err(e) => {
                log::warn!("cycle {}: could not encode frame: {}", cycle, e);
                return trace.finish(CycleOutcome::EmptyFrame);
            }
        };

        trace.enter(CycleState::Uploading);
        log::debug!("cycle {}: sending {} bytes", cycle, encoded.len());
        self.stats.upload();
        let response = match self.uploader.send(encoded).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("cycle {}: upload failed: {}", cycle, e);
                return trace.finish(CycleOutcome::TransportFailed);
            }
        };

        trace.enter(CycleState::AwaitingResponse);
        let payload = match UploadClient::read(response).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                log::warn!("cycle {}: server returned an empty result", cycle);
                return trace.finish(CycleOutcome::EmptyResponse);
            }
            Err(e) => {
                log::error!("cycle {}: reading result failed: {}", cycle, e);
                return trace.finish(CycleOutcome::TransportFailed);
            }
        };
        log::info!("cycle {}: result received, {} bytes", cycle, payload.len());

        trace.enter(CycleState::Rendering);
        match self.renderer.render(payload).await {
            Ok(Some(result_id)) => trace.finish(CycleOutcome::Rendered { result_id }),
            Ok(None) => trace.finish(CycleOutcome::EmptyResponse),
            Err(e) => {
                log::error!("cycle {}: could not display result: {}", cycle, e);
                trace.finish(CycleOutcome::RenderFailed)
            }
        }
    }
}

/// One camera-to-display session: the stream, the timer and the cycles it
/// starts.
pub struct Session<S> {
    source: S,
    pipeline: Arc<Pipeline>,
    stats: Arc<SessionStats>,
}

impl<S: FrameSource> Session<S> {
    pub fn new(
        config: DetectConfig,
        source: S,
        surface: Arc<dyn Surface>,
    ) -> Result<Self, DetectError> {
        config.validate()?;
        let stats = Arc::new(SessionStats::default());
        let pipeline = Pipeline {
            uploader: UploadClient::new(&config)?,
            renderer: ResultRenderer::new(surface),
            stats: Arc::clone(&stats),
            config,
        };
        Ok(Self {
            source,
            pipeline: Arc::new(pipeline),
            stats,
        })
    }

    /// Request the camera, then start sampling.
    ///
    /// The config is checked before `request` runs. A failed request is
    /// logged once and no timer is started.
    pub async fn launch<F>(
        config: DetectConfig,
        request: F,
        surface: Arc<dyn Surface>,
    ) -> Result<SessionHandle, DetectError>
    where
        F: Future<Output = Result<S, VideoError>>,
    {
        config.validate()?;
        let source = acquire(request).await?;
        Ok(Self::new(config, source, surface)?.spawn())
    }

    /// Run the session on the current runtime.
    pub fn spawn(self) -> SessionHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let stats = Arc::clone(&self.stats);
        let ledger = Arc::clone(self.pipeline.renderer.ledger());
        let join = tokio::spawn(self.run(stop_rx));
        SessionHandle {
            stop: Some(stop_tx),
            join,
            stats,
            ledger,
        }
    }

    async fn run(mut self, mut stop: oneshot::Receiver<()>) {
        // sampling starts once the stream delivers data
        tokio::select! {
            _ = &mut stop => {
                log::info!("session stopped before the stream went live");
                self.source.close().await;
                return;
            }
            ready = self.source.ready() => {
                if let Err(e) = ready {
                    log::error!("video stream ended before delivering data: {}", e);
                    self.source.close().await;
                    return;
                }
            }
        }

        let period = self.pipeline.config.interval();
        log::info!(
            "stream live, sampling every {:?} to {}",
            period,
            self.pipeline.uploader.url()
        );
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut cycles = JoinSet::new();
        let mut next_cycle = 0u64;

        loop {
            // finished cycles are collected before a tick checks the guard
            tokio::select! {
                biased;
                _ = &mut stop => break,
                Some(joined) = cycles.join_next() => self.finish(joined),
                _ = ticker.tick() => self.tick(&mut cycles, &mut next_cycle),
            }
        }

        // in-flight cycles are abandoned; their references are released on drop
        cycles.shutdown().await;
        self.source.close().await;
        log::info!("session stopped: {}", self.stats.snapshot());
    }

    fn tick(&self, cycles: &mut JoinSet<CycleOutcome>, next_cycle: &mut u64) {
        self.stats.tick();

        if self.pipeline.config.guard_overlap() && !cycles.is_empty() {
            log::debug!("previous cycle still in flight, skipping tick");
            self.stats.record(&CycleOutcome::Busy);
            return;
        }

        let Some(frame) = self.source.current() else {
            log::debug!("no live frame, skipping tick");
            self.stats.record(&CycleOutcome::Inactive);
            return;
        };

        *next_cycle += 1;
        let cycle = *next_cycle;
        let pipeline = Arc::clone(&self.pipeline);
        cycles.spawn(async move { pipeline.process(cycle, frame).await });
    }

    fn finish(&self, joined: Result<CycleOutcome, JoinError>) {
        match joined {
            Ok(outcome) => self.stats.record(&outcome),
            Err(e) => log::error!("cycle task failed: {}", e),
        }
    }
}

/// Control over a running session.
///
/// Dropping the handle stops the session as well.
pub struct SessionHandle {
    stop: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
    stats: Arc<SessionStats>,
    ledger: Arc<RefLedger>,
}

impl SessionHandle {
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Result references handed to the display; outlives the session.
    pub fn ledger(&self) -> Arc<RefLedger> {
        Arc::clone(&self.ledger)
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop the timer, abandon in-flight cycles and release the camera.
    pub async fn stop(mut self) -> StatsSnapshot {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.join).await {
            log::error!("session task failed: {}", e);
        }
        self.stats.snapshot()
    }
}
