use {
    crate::CycleOutcome,
    std::{
        fmt,
        sync::atomic::{AtomicU64, Ordering},
    },
};

/// Running counters for one session.
#[derive(Debug, Default)]
pub struct SessionStats {
    ticks: AtomicU64,
    busy: AtomicU64,
    inactive: AtomicU64,
    empty_frames: AtomicU64,
    uploads: AtomicU64,
    transport_failures: AtomicU64,
    empty_responses: AtomicU64,
    rendered: AtomicU64,
    render_failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub ticks: u64,
    pub busy: u64,
    pub inactive: u64,
    pub empty_frames: u64,
    pub uploads: u64,
    pub transport_failures: u64,
    pub empty_responses: u64,
    pub rendered: u64,
    pub render_failures: u64,
}

impl SessionStats {
    pub(crate) fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn upload(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record(&self, outcome: &CycleOutcome) {
        let counter = match outcome {
            CycleOutcome::Busy => &self.busy,
            CycleOutcome::Inactive => &self.inactive,
            CycleOutcome::EmptyFrame => &self.empty_frames,
            CycleOutcome::TransportFailed => &self.transport_failures,
            CycleOutcome::EmptyResponse => &self.empty_responses,
            CycleOutcome::Rendered { .. } => &self.rendered,
            CycleOutcome::RenderFailed => &self.render_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            busy: self.busy.load(Ordering::Relaxed),
            inactive: self.inactive.load(Ordering::Relaxed),
            empty_frames: self.empty_frames.load(Ordering::Relaxed),
            uploads: self.uploads.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            empty_responses: self.empty_responses.load(Ordering::Relaxed),
            rendered: self.rendered.load(Ordering::Relaxed),
            render_failures: self.render_failures.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ticks={} uploads={} rendered={} busy={} inactive={} empty_frames={} \
             transport_failures={} empty_responses={} render_failures={}",
            self.ticks,
            self.uploads,
            self.rendered,
            self.busy,
            self.inactive,
            self.empty_frames,
            self.transport_failures,
            self.empty_responses,
            self.render_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_maps_outcomes_to_counters() {
        let stats = SessionStats::default();
        stats.tick();
        stats.tick();
        stats.upload();
        stats.record(&CycleOutcome::Busy);
        stats.record(&CycleOutcome::Rendered { result_id: 1 });
        stats.record(&CycleOutcome::TransportFailed);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.uploads, 1);
        assert_eq!(snapshot.busy, 1);
        assert_eq!(snapshot.rendered, 1);
        assert_eq!(snapshot.transport_failures, 1);
        assert_eq!(snapshot.inactive, 0);
    }

    #[test]
    fn test_snapshot_display() {
        let snapshot = StatsSnapshot {
            ticks: 3,
            rendered: 2,
            ..Default::default()
        };
        let text = snapshot.to_string();
        assert!(text.starts_with("ticks=3 "));
        assert!(text.contains("rendered=2"));
    }
}
