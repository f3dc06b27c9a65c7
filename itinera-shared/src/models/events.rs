use serde::{Deserialize, Serialize};

use super::point::Point;
use crate::keys::{FilterType, UpdateType};

/// What changed alongside a notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    None,
    Point(Point),
    Filter(FilterType),
}

/// Notification emitted by the trip and filter models
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelEvent {
    pub update_type: UpdateType,
    pub payload: EventPayload,
}

impl ModelEvent {
    pub fn new(update_type: UpdateType, payload: EventPayload) -> Self {
        Self { update_type, payload }
    }

    pub fn point(update_type: UpdateType, point: Point) -> Self {
        Self::new(update_type, EventPayload::Point(point))
    }

    pub fn filter(update_type: UpdateType, filter: FilterType) -> Self {
        Self::new(update_type, EventPayload::Filter(filter))
    }

    pub fn init() -> Self {
        Self::new(UpdateType::Init, EventPayload::None)
    }
}
