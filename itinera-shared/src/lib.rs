pub mod models;
pub mod keys;

pub use models::{
    Destination, EventPayload, ModelEvent, Offer, OfferGroup, Picture, Point, PointType,
};
pub use keys::{FilterType, SortType, UnknownKey, UpdateType, UserAction};
