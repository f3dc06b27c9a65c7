use itinera_core::{EventBus, EventReceiver, FilterSource};
use itinera_shared::{FilterType, ModelEvent, UpdateType};
use std::sync::{PoisonError, RwLock};

/// Holds the active list filter and notifies on change
#[derive(Default)]
pub struct FilterModel {
    filter: RwLock<FilterType>,
    bus: EventBus,
}

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FilterSource for FilterModel {
    fn observe(&self) -> EventReceiver {
        self.bus.subscribe()
    }

    fn filter(&self) -> FilterType {
        *self.filter.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_filter(&self, update_type: UpdateType, filter: FilterType) {
        *self.filter.write().unwrap_or_else(PoisonError::into_inner) = filter;
        tracing::debug!("Filter set to {}", filter);
        self.bus.emit(ModelEvent::filter(update_type, filter));
    }
}
