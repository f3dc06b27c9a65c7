pub mod app_config;
pub mod trip_model;
pub mod filter_model;
pub mod mock;

pub use trip_model::TripModel;
pub use filter_model::FilterModel;
pub use mock::{BackendCall, MockBackend, MockData, MockGenerator, Operation};
