pub mod point;
pub mod destination;
pub mod offer;
pub mod events;

pub use point::{Point, PointType};
pub use destination::{Destination, Picture};
pub use offer::{Offer, OfferGroup};
pub use events::{EventPayload, ModelEvent};
