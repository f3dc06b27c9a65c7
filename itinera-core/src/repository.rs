use async_trait::async_trait;
use itinera_catalog::Catalog;
use itinera_shared::{Destination, FilterType, OfferGroup, Point, UpdateType};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::events::EventReceiver;

/// Transport seam behind the trip model
#[async_trait]
pub trait TripBackend: Send + Sync {
    async fn points(&self) -> Result<Vec<Point>, PersistenceError>;

    async fn destinations(&self) -> Result<Vec<Destination>, PersistenceError>;

    async fn offers(&self) -> Result<Vec<OfferGroup>, PersistenceError>;

    /// Returns the point as stored by the server
    async fn update_point(&self, point: &Point) -> Result<Point, PersistenceError>;

    /// Returns the created point carrying its server-assigned id
    async fn add_point(&self, point: &Point) -> Result<Point, PersistenceError>;

    async fn delete_point(&self, id: Uuid) -> Result<(), PersistenceError>;
}

/// Authoritative owner of the point list and reference catalogs.
///
/// Mutations are never applied optimistically: the canonical list changes only after
/// the backend accepts, and observers are notified with the given update type.
#[async_trait]
pub trait PointsModel: Send + Sync {
    fn observe(&self) -> EventReceiver;

    /// Ordered snapshot of the canonical list
    fn points(&self) -> Vec<Point>;

    fn catalog(&self) -> Arc<Catalog>;

    async fn update_point(
        &self,
        update_type: UpdateType,
        point: Point,
    ) -> Result<Point, PersistenceError>;

    async fn add_point(
        &self,
        update_type: UpdateType,
        point: Point,
    ) -> Result<Point, PersistenceError>;

    async fn delete_point(
        &self,
        update_type: UpdateType,
        point: Point,
    ) -> Result<(), PersistenceError>;
}

/// Currently selected list filter
pub trait FilterSource: Send + Sync {
    fn observe(&self) -> EventReceiver;

    fn filter(&self) -> FilterType;

    fn set_filter(&self, update_type: UpdateType, filter: FilterType);
}
