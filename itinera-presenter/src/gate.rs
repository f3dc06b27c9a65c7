use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Visible busy window of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimits {
    /// Busy indicator stays up at least this long, even on instant resolution
    pub lower: Duration,
    /// The UI is reported blocked for at most this long
    pub upper: Duration,
}

impl Default for TimeLimits {
    fn default() -> Self {
        Self {
            lower: Duration::from_millis(350),
            upper: Duration::from_millis(1000),
        }
    }
}

/// Serializes outward mutation calls and tracks the busy indicator.
///
/// Only one operation runs inside the gate at a time; later ones queue on the permit
/// in arrival order.
#[derive(Debug)]
pub struct MutationGate {
    permit: tokio::sync::Mutex<()>,
    busy_since: Mutex<Option<Instant>>,
    queued: AtomicUsize,
    limits: TimeLimits,
}

impl MutationGate {
    pub fn new(limits: TimeLimits) -> Self {
        Self {
            permit: tokio::sync::Mutex::new(()),
            busy_since: Mutex::new(None),
            queued: AtomicUsize::new(0),
            limits,
        }
    }

    pub fn limits(&self) -> TimeLimits {
        self.limits
    }

    pub async fn run<F>(&self, operation: F) -> F::Output
    where
        F: Future,
    {
        let _queued = QueueSlot::enter(&self.queued);
        let _permit = self.permit.lock().await;
        let _busy = BusyWindow::open(&self.busy_since);

        let started = Instant::now();
        let output = operation.await;

        let elapsed = started.elapsed();
        if elapsed < self.limits.lower {
            tokio::time::sleep(self.limits.lower - elapsed).await;
        }
        output
    }

    /// An operation holds the gate
    pub fn is_occupied(&self) -> bool {
        self.busy_since().is_some()
    }

    /// Mutation-triggering interactions should be disabled
    pub fn is_blocking(&self) -> bool {
        self.busy_since()
            .map(|since| since.elapsed() < self.limits.upper)
            .unwrap_or(false)
    }

    /// Operations waiting for or holding the gate
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    fn busy_since(&self) -> Option<Instant> {
        *self.busy_since.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MutationGate {
    fn default() -> Self {
        Self::new(TimeLimits::default())
    }
}

struct QueueSlot<'a>(&'a AtomicUsize);

impl<'a> QueueSlot<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for QueueSlot<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct BusyWindow<'a>(&'a Mutex<Option<Instant>>);

impl<'a> BusyWindow<'a> {
    fn open(slot: &'a Mutex<Option<Instant>>) -> Self {
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        Self(slot)
    }
}

impl Drop for BusyWindow<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
