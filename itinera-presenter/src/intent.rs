use itinera_shared::{FilterType, SortType};
use uuid::Uuid;

use crate::views::EditAction;

/// User interaction forwarded by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewIntent {
    /// Open the edit form of a point
    Expand(Uuid),
    /// Close the edit form without saving
    Rollup(Uuid),
    Edit(Uuid, EditAction),
    Submit(Uuid),
    Delete(Uuid),
    ToggleFavorite(Uuid),
    SortChange(SortType),
    FilterChange(FilterType),
    CreateClick,
    CreationEdit(EditAction),
    CreationSubmit,
    CreationCancel,
}
