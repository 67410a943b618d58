// In: src/accounting.rs

//! The external-memory accounting bridge.
//!
//! Session and dictionary wrappers are small on the host heap but own native
//! state that can reach megabytes (window buffers, match tables, prepared
//! dictionaries). A heap-pressure-driven collector that cannot see those
//! bytes will under-collect, so every resource re-measures its native
//! footprint after each operation that may have changed it and reports the
//! signed delta to the host's external-memory counter.
//!
//! Invariant: the deltas reported for one resource over its whole lifetime,
//! including the final teardown delta, sum to exactly zero. Even without a
//! collector to inform, that makes the counter a cheap leak detector.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use log::trace;

//==================================================================================
// I. The host side of the bridge
//==================================================================================

/// Sink for external-memory deltas.
///
/// The embedding host hands one of these to resource constructors
/// (`with_memory_host`) to route accounting into its own collector. Resources
/// built without one report into the process-wide counter below.
pub trait MemoryHost: Send + Sync {
    /// Applies a signed delta, in bytes, to the host's external-memory
    /// counter. Called synchronously from the thread driving the resource.
    fn adjust(&self, delta_bytes: i64);
}

static PROCESS_EXTERNAL_BYTES: AtomicI64 = AtomicI64::new(0);

/// Net native footprint currently reported by every live resource that uses
/// the default process counter.
pub fn external_memory_bytes() -> i64 {
    PROCESS_EXTERNAL_BYTES.load(Ordering::Relaxed)
}

//==================================================================================
// II. The resource side of the bridge
//==================================================================================

/// Per-resource gauge tracking the last published native size.
///
/// Owned by each session/dictionary. `publish` reports the delta between the
/// engine-measured size and the last report; dropping the gauge reports the
/// outstanding balance as one final negative delta, which keeps the lifetime
/// sum at zero even when the owner was only partially constructed.
pub(crate) struct MemoryGauge {
    last_reported: i64,
    host: Option<Arc<dyn MemoryHost>>,
    label: &'static str,
}

impl MemoryGauge {
    /// A gauge reporting into the process-wide counter.
    pub(crate) fn new(label: &'static str) -> Self {
        MemoryGauge {
            last_reported: 0,
            host: None,
            label,
        }
    }

    /// A gauge reporting into a host-supplied counter.
    pub(crate) fn with_host(label: &'static str, host: Arc<dyn MemoryHost>) -> Self {
        MemoryGauge {
            last_reported: 0,
            host: Some(host),
            label,
        }
    }

    /// Publishes the resource's current native size, reporting the signed
    /// delta against the previous publication. No-op when the size is
    /// unchanged.
    pub(crate) fn publish(&mut self, current_bytes: usize) {
        let current = current_bytes as i64;
        let delta = current - self.last_reported;
        if delta != 0 {
            self.report(delta);
            self.last_reported = current;
        }
    }

    fn report(&self, delta: i64) {
        trace!("{}: external memory {:+} bytes", self.label, delta);
        match &self.host {
            Some(host) => host.adjust(delta),
            None => {
                PROCESS_EXTERNAL_BYTES.fetch_add(delta, Ordering::Relaxed);
            }
        }
    }
}

impl Drop for MemoryGauge {
    fn drop(&mut self) {
        if self.last_reported != 0 {
            self.report(-self.last_reported);
            self.last_reported = 0;
        }
    }
}

//==================================================================================
// III. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test host that records every delta it sees.
    #[derive(Default)]
    pub(crate) struct CountingHost {
        pub total: AtomicI64,
        pub reports: AtomicI64,
    }

    impl MemoryHost for CountingHost {
        fn adjust(&self, delta_bytes: i64) {
            self.total.fetch_add(delta_bytes, Ordering::SeqCst);
            self.reports.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_publish_reports_signed_deltas() {
        let host = Arc::new(CountingHost::default());
        let mut gauge = MemoryGauge::with_host("test", host.clone());

        gauge.publish(1000);
        assert_eq!(host.total.load(Ordering::SeqCst), 1000);

        gauge.publish(1500); // grew by 500
        assert_eq!(host.total.load(Ordering::SeqCst), 1500);

        gauge.publish(200); // shrank by 1300
        assert_eq!(host.total.load(Ordering::SeqCst), 200);

        gauge.publish(200); // unchanged: no report
        assert_eq!(host.reports.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_lifetime_sum_is_zero_after_drop() {
        let host = Arc::new(CountingHost::default());
        {
            let mut gauge = MemoryGauge::with_host("test", host.clone());
            gauge.publish(4096);
            gauge.publish(1 << 20);
        }
        assert_eq!(host.total.load(Ordering::SeqCst), 0);
        // Two growth reports plus the teardown report.
        assert_eq!(host.reports.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_never_published_gauge_reports_nothing_at_drop() {
        let host = Arc::new(CountingHost::default());
        drop(MemoryGauge::with_host("test", host.clone()));
        assert_eq!(host.reports.load(Ordering::SeqCst), 0);
    }
}
