//! Once-only construction of the process's tenant directory.
//!
//! The composition root owns one [`TenantDirectorySlot`]. Whoever wins the
//! compare-and-set builds the directory (and its sweeper); every other caller waits for
//! that instance and gets the same `Arc`, with the winner's TTL.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::services::tenant::directory::TenantDirectory;

#[derive(Debug, Default)]
pub struct TenantDirectorySlot {
    claimed: AtomicBool,
    instance: RwLock<Option<Arc<TenantDirectory>>>,
}

impl TenantDirectorySlot {
    pub const fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
            instance: RwLock::new(None),
        }
    }

    pub fn get(&self) -> Option<Arc<TenantDirectory>> {
        self.instance
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the directory, constructing it on first use. Arguments of later calls are
    /// ignored. The sweeper is tied to a child of `shutdown`.
    pub fn get_or_init(
        &self,
        ttl: Duration,
        sweep_interval: Duration,
        shutdown: &CancellationToken,
    ) -> Arc<TenantDirectory> {
        loop {
            if let Some(directory) = self.get() {
                return directory;
            }

            if self
                .claimed
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                let claim = Claim::new(&self.claimed);
                let directory =
                    TenantDirectory::spawn(ttl, sweep_interval, shutdown.child_token());
                *self
                    .instance
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&directory));
                claim.complete();

                tracing::info!(
                    ttl_ms = ttl.as_millis() as u64,
                    sweep_interval_ms = sweep_interval.as_millis() as u64,
                    "tenant directory initialized"
                );
                return directory;
            }

            // 他の caller が同期的に構築中。そちらが panic すれば claimed が戻り、次の周回で再度競う
            std::thread::yield_now();
        }
    }
}

/// Held by the initializing caller. Dropping it without `complete` releases the claim.
struct Claim<'a> {
    claimed: &'a AtomicBool,
    completed: bool,
}

impl<'a> Claim<'a> {
    fn new(claimed: &'a AtomicBool) -> Self {
        Self {
            claimed,
            completed: false,
        }
    }

    fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if !self.completed {
            tracing::error!("tenant directory initialization aborted; releasing claim");
            self.claimed.store(false, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_init_yields_one_instance() {
        let slot = Arc::new(TenantDirectorySlot::new());
        let shutdown = CancellationToken::new();

        let mut handles = Vec::new();
        for i in 0..32u64 {
            let slot = Arc::clone(&slot);
            let shutdown = shutdown.clone();
            handles.push(tokio::spawn(async move {
                slot.get_or_init(
                    Duration::from_millis(100 + i),
                    Duration::from_secs(60),
                    &shutdown,
                )
            }));
        }

        let mut instances = Vec::new();
        for handle in handles {
            instances.push(handle.await.expect("join"));
        }

        let first = &instances[0];
        assert!(instances.iter().all(|d| Arc::ptr_eq(d, first)));

        let stored = slot.get().expect("initialized");
        assert!(Arc::ptr_eq(&stored, first));

        shutdown.cancel();
    }

    #[test]
    fn aborted_initialization_releases_the_claim() {
        let slot = TenantDirectorySlot::new();
        slot.claimed.store(true, Ordering::Release);

        let unwound = std::panic::catch_unwind(|| {
            let _claim = Claim::new(&slot.claimed);
            panic!("construction failed");
        });
        assert!(unwound.is_err());
        assert!(!slot.claimed.load(Ordering::Acquire));

        // outside a runtime: no sweeper, but the slot still initializes
        let directory =
            slot.get_or_init(Duration::from_secs(30), Duration::from_secs(5), &CancellationToken::new());
        assert!(Arc::ptr_eq(&directory, &slot.get().expect("initialized")));
    }

    #[test]
    fn completed_claim_stays_held() {
        let claimed = AtomicBool::new(true);
        Claim::new(&claimed).complete();
        assert!(claimed.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn first_ttl_wins() {
        let slot = TenantDirectorySlot::new();
        let shutdown = CancellationToken::new();
        assert!(slot.get().is_none());

        let a = slot.get_or_init(Duration::from_secs(30), Duration::from_secs(5), &shutdown);
        let b = slot.get_or_init(Duration::from_secs(999), Duration::from_secs(1), &shutdown);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.ttl(), Duration::from_secs(30));

        shutdown.cancel();
    }
}
