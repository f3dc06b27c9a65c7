//! In-memory backend used by the CLI demo and by tests.

pub mod generator;

pub use generator::{MockData, MockGenerator};

use async_trait::async_trait;
use itinera_catalog::Catalog;
use itinera_core::{PersistenceError, TripBackend};
use itinera_shared::{Destination, OfferGroup, Point};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Update,
    Add,
    Delete,
}

/// Entry of the backend call log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Started(Operation, Uuid),
    Finished(Operation, Uuid),
}

pub struct MockBackend {
    data: Mutex<MockData>,
    calls: Mutex<Vec<BackendCall>>,
    latency: Mutex<Duration>,
    fail_next: AtomicUsize,
    fail_mutations: AtomicBool,
    fail_catalogs: AtomicBool,
}

impl MockBackend {
    pub fn new(data: MockData) -> Self {
        Self {
            data: Mutex::new(data),
            calls: Mutex::new(Vec::new()),
            latency: Mutex::new(Duration::ZERO),
            fail_next: AtomicUsize::new(0),
            fail_mutations: AtomicBool::new(false),
            fail_catalogs: AtomicBool::new(false),
        }
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        self.set_latency(latency);
        self
    }

    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.latency) = latency;
    }

    /// Rejects the next `count` mutations
    pub fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_catalogs(&self, fail: bool) {
        self.fail_catalogs.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.calls).clone()
    }

    pub fn stored_points(&self) -> Vec<Point> {
        lock(&self.data).points.clone()
    }

    async fn mutation<T>(
        &self,
        operation: Operation,
        id: Uuid,
        apply: impl FnOnce(&mut MockData) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        lock(&self.calls).push(BackendCall::Started(operation, id));

        let latency = *lock(&self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let result = if self.should_fail() {
            Err(PersistenceError::Transport("connection reset by peer".to_string()))
        } else {
            apply(&mut lock(&self.data))
        };

        lock(&self.calls).push(BackendCall::Finished(operation, id));
        result
    }

    fn should_fail(&self) -> bool {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return true;
        }
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reject_invalid(data: &MockData, point: &Point) -> Result<(), PersistenceError> {
    let catalog = Catalog::new(data.destinations.clone(), data.offers.clone());
    catalog.validate(point).map_err(|e| PersistenceError::Rejected {
        status: 400,
        message: e.to_string(),
    })?;
    if point.date_from > point.date_to {
        return Err(PersistenceError::Rejected {
            status: 400,
            message: "date_from is after date_to".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl TripBackend for MockBackend {
    async fn points(&self) -> Result<Vec<Point>, PersistenceError> {
        Ok(lock(&self.data).points.clone())
    }

    async fn destinations(&self) -> Result<Vec<Destination>, PersistenceError> {
        if self.fail_catalogs.load(Ordering::SeqCst) {
            return Err(PersistenceError::Rejected {
                status: 503,
                message: "destinations unavailable".to_string(),
            });
        }
        Ok(lock(&self.data).destinations.clone())
    }

    async fn offers(&self) -> Result<Vec<OfferGroup>, PersistenceError> {
        if self.fail_catalogs.load(Ordering::SeqCst) {
            return Err(PersistenceError::Rejected {
                status: 503,
                message: "offers unavailable".to_string(),
            });
        }
        Ok(lock(&self.data).offers.clone())
    }

    async fn update_point(&self, point: &Point) -> Result<Point, PersistenceError> {
        self.mutation(Operation::Update, point.id, |data| {
            reject_invalid(data, point)?;
            let slot = data
                .points
                .iter_mut()
                .find(|p| p.id == point.id)
                .ok_or(PersistenceError::NotFound(point.id))?;
            *slot = point.clone();
            Ok(point.clone())
        })
        .await
    }

    async fn add_point(&self, point: &Point) -> Result<Point, PersistenceError> {
        self.mutation(Operation::Add, point.id, |data| {
            reject_invalid(data, point)?;
            let created = Point {
                id: Uuid::new_v4(),
                ..point.clone()
            };
            data.points.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn delete_point(&self, id: Uuid) -> Result<(), PersistenceError> {
        self.mutation(Operation::Delete, id, |data| {
            let before = data.points.len();
            data.points.retain(|p| p.id != id);
            if data.points.len() == before {
                return Err(PersistenceError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}
