use {
    crate::{DetectError, Surface},
    bytes::Bytes,
    image::Image,
    std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Counts transient result references as they are handed out and released.
#[derive(Debug, Default)]
pub struct RefLedger {
    created: AtomicU64,
    released: AtomicU64,
}

impl RefLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hand out a reference to `payload`. It is released when dropped.
    pub fn create(self: &Arc<Self>, payload: Bytes) -> ResultRef {
        let id = self.created.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("created result reference #{} ({} bytes)", id, payload.len());
        ResultRef {
            id,
            payload,
            ledger: Arc::clone(self),
        }
    }

    pub fn created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// References created but not yet released.
    pub fn live(&self) -> u64 {
        self.created().saturating_sub(self.released())
    }
}

/// A displayable handle to one result payload.
#[derive(Debug)]
pub struct ResultRef {
    id: u64,
    payload: Bytes,
    ledger: Arc<RefLedger>,
}

impl ResultRef {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

impl Drop for ResultRef {
    fn drop(&mut self) {
        self.ledger.released.fetch_add(1, Ordering::Relaxed);
        log::debug!("released result reference #{}", self.id);
    }
}

/// A result that finished loading and is ready for display.
#[derive(Debug, Clone)]
pub struct LoadedResult {
    pub id: u64,
    pub payload: Bytes,
    pub image: Image,
}

/// Loads server results and hands them to the display surface.
#[derive(Clone)]
pub struct ResultRenderer {
    surface: Arc<dyn Surface>,
    ledger: Arc<RefLedger>,
}

impl ResultRenderer {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            surface,
            ledger: RefLedger::new(),
        }
    }

    pub fn ledger(&self) -> &Arc<RefLedger> {
        &self.ledger
    }

    /// Display `payload`, returning the id of the reference that carried it.
    ///
    /// Empty payloads are ignored and create no reference. The reference is
    /// released once loading ends, whether or not it succeeded.
    pub async fn render(&self, payload: Bytes) -> Result<Option<u64>, DetectError> {
        if payload.is_empty() {
            return Ok(None);
        }
        let reference = self.ledger.create(payload);
        let result = self.load(&reference).await;
        drop(reference);
        result.map(Some)
    }

    async fn load(&self, reference: &ResultRef) -> Result<u64, DetectError> {
        let image = image::decode_image(reference.payload()).await?;
        let loaded = LoadedResult {
            id: reference.id(),
            payload: reference.payload().clone(),
            image,
        };

        let surface = Arc::clone(&self.surface);
        tokio::task::spawn_blocking(move || surface.show(&loaded))
            .await
            .map_err(|e| DetectError::Surface(e.to_string()))??;

        Ok(reference.id())
    }
}
