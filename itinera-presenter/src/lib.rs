pub mod selector;
pub mod gate;
pub mod keyboard;
pub mod views;
pub mod point_presenter;
pub mod new_point_presenter;
pub mod trip_info;
pub mod mutation;
pub mod intent;
pub mod screen;
pub mod trip_presenter;

pub use gate::{MutationGate, TimeLimits};
pub use intent::ViewIntent;
pub use keyboard::{Key, KeySubscription, Keyboard, ListenerOwner};
pub use mutation::{MutationOutcome, MutationTarget, PendingMutation};
pub use new_point_presenter::NewPointPresenter;
pub use point_presenter::{Mode, PointPresenter};
pub use screen::{Body, FilterOption, ListItem, Screen, TriggerState};
pub use selector::{filter_counts, matches_filter, select, sort_points};
pub use trip_info::TripInfo;
pub use trip_presenter::{Clock, TripPresenter};
pub use views::{
    format_duration, EditAction, EditPointView, FormMode, FormState, Placeholder, PointDraft,
    PointView, SortOption, SortView, ViewId,
};
