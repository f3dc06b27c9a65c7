pub mod error;
pub mod events;
pub mod repository;

pub use error::{PersistenceError, ProgrammingError, ValidationError};
pub use events::{EventBus, EventReceiver};
pub use repository::{FilterSource, PointsModel, TripBackend};
