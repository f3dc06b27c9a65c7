use async_trait::async_trait;
use itinera_catalog::Catalog;
use itinera_core::{EventBus, EventReceiver, PersistenceError, PointsModel, TripBackend};
use itinera_shared::{EventPayload, ModelEvent, Point, UpdateType};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info, warn};

struct TripState {
    points: Vec<Point>,
    catalog: Arc<Catalog>,
}

/// Canonical point list plus reference catalogs, backed by a [`TripBackend`].
///
/// The lock only guards snapshot swaps and is never held across an await.
pub struct TripModel {
    backend: Arc<dyn TripBackend>,
    state: RwLock<TripState>,
    bus: EventBus,
}

impl TripModel {
    pub fn new(backend: Arc<dyn TripBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(TripState {
                points: Vec::new(),
                catalog: Arc::new(Catalog::empty()),
            }),
            bus: EventBus::default(),
        }
    }

    /// Loads points and catalogs, then notifies INIT whatever the outcome
    pub async fn init(&self) {
        let (points, destinations, offers) = tokio::join!(
            self.backend.points(),
            self.backend.destinations(),
            self.backend.offers(),
        );

        let catalog = match (destinations, offers) {
            (Ok(destinations), Ok(offers)) => Catalog::new(destinations, offers),
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to load reference catalogs: {}", e);
                Catalog::empty()
            }
        };

        let points = points.unwrap_or_else(|e| {
            error!("Failed to load points: {}", e);
            Vec::new()
        });

        info!(
            "Trip model loaded: {} point(s), {} destination(s)",
            points.len(),
            catalog.destinations().len()
        );

        {
            let mut state = self.write();
            state.points = points;
            state.catalog = Arc::new(catalog);
        }

        self.bus.emit(ModelEvent::init());
    }

    fn read(&self) -> RwLockReadGuard<'_, TripState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TripState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_known(&self, point: &Point) -> Result<(), PersistenceError> {
        if self.read().points.iter().any(|p| p.id == point.id) {
            Ok(())
        } else {
            Err(PersistenceError::NotFound(point.id))
        }
    }
}

#[async_trait]
impl PointsModel for TripModel {
    fn observe(&self) -> EventReceiver {
        self.bus.subscribe()
    }

    fn points(&self) -> Vec<Point> {
        self.read().points.clone()
    }

    fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.read().catalog)
    }

    async fn update_point(
        &self,
        update_type: UpdateType,
        point: Point,
    ) -> Result<Point, PersistenceError> {
        self.ensure_known(&point)?;

        let updated = self.backend.update_point(&point).await.inspect_err(|e| {
            warn!("Update of point {} rejected: {}", point.id, e);
        })?;

        {
            let mut state = self.write();
            match state.points.iter_mut().find(|p| p.id == updated.id) {
                Some(slot) => *slot = updated.clone(),
                None => return Err(PersistenceError::NotFound(updated.id)),
            }
        }

        self.bus.emit(ModelEvent::point(update_type, updated.clone()));
        Ok(updated)
    }

    async fn add_point(
        &self,
        update_type: UpdateType,
        point: Point,
    ) -> Result<Point, PersistenceError> {
        let created = self.backend.add_point(&point).await.inspect_err(|e| {
            warn!("Creation of point rejected: {}", e);
        })?;

        self.write().points.insert(0, created.clone());

        info!("Point {} created", created.id);
        self.bus.emit(ModelEvent::point(update_type, created.clone()));
        Ok(created)
    }

    async fn delete_point(
        &self,
        update_type: UpdateType,
        point: Point,
    ) -> Result<(), PersistenceError> {
        self.ensure_known(&point)?;

        self.backend.delete_point(point.id).await.inspect_err(|e| {
            warn!("Deletion of point {} rejected: {}", point.id, e);
        })?;

        self.write().points.retain(|p| p.id != point.id);

        info!("Point {} deleted", point.id);
        self.bus.emit(ModelEvent::new(update_type, EventPayload::None));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockGenerator};
    use crate::app_config::MockConfig;

    fn backend() -> Arc<MockBackend> {
        let config = MockConfig {
            seed: Some(7),
            latency_ms: 0,
            ..MockConfig::default()
        };
        Arc::new(MockBackend::new(MockGenerator::new(config.seed).data(&config)))
    }

    #[tokio::test]
    async fn test_init_loads_and_notifies() {
        let model = TripModel::new(backend());
        let mut events = model.observe();

        model.init().await;

        assert_eq!(events.try_recv().unwrap(), ModelEvent::init());
        assert_eq!(model.points().len(), 4);
        assert!(model.catalog().is_available());
    }

    #[tokio::test]
    async fn test_init_with_failed_catalogs_still_notifies() {
        let backend = backend();
        backend.set_fail_catalogs(true);
        let model = TripModel::new(backend);
        let mut events = model.observe();

        model.init().await;

        assert_eq!(events.try_recv().unwrap().update_type, UpdateType::Init);
        assert!(!model.catalog().is_available());
    }

    #[tokio::test]
    async fn test_update_is_applied_only_after_backend_accepts() {
        let backend = backend();
        let model = TripModel::new(backend.clone());
        model.init().await;
        let mut events = model.observe();

        let original = model.points()[0].clone();
        let mut edited = original.clone();
        edited.base_price += 10;

        backend.fail_next(1);
        let err = model.update_point(UpdateType::Patch, edited.clone()).await;
        assert!(err.is_err());
        assert_eq!(model.points()[0], original);
        assert!(events.try_recv().is_err());

        let stored = model.update_point(UpdateType::Patch, edited.clone()).await.unwrap();
        assert_eq!(stored, edited);
        assert_eq!(model.points()[0], edited);
        assert_eq!(events.try_recv().unwrap(), ModelEvent::point(UpdateType::Patch, edited));
    }

    #[tokio::test]
    async fn test_add_and_delete() {
        let model = TripModel::new(backend());
        model.init().await;
        let mut events = model.observe();

        let mut draft = model.points()[1].clone();
        draft.base_price = 999;
        let created = model.add_point(UpdateType::Minor, draft.clone()).await.unwrap();
        assert_ne!(created.id, draft.id);
        assert_eq!(model.points()[0].id, created.id);
        assert_eq!(events.try_recv().unwrap().update_type, UpdateType::Minor);

        model.delete_point(UpdateType::Minor, created.clone()).await.unwrap();
        assert!(model.points().iter().all(|p| p.id != created.id));
        assert_eq!(
            events.try_recv().unwrap(),
            ModelEvent::new(UpdateType::Minor, EventPayload::None)
        );
    }

    #[tokio::test]
    async fn test_unknown_point_is_not_found() {
        let model = TripModel::new(backend());
        model.init().await;

        let mut ghost = model.points()[0].clone();
        ghost.id = uuid::Uuid::new_v4();

        assert_eq!(
            model.delete_point(UpdateType::Minor, ghost.clone()).await,
            Err(PersistenceError::NotFound(ghost.id))
        );
    }
}
