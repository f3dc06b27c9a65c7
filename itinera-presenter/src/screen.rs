//! Borrowed snapshot of everything a renderer draws

use itinera_shared::FilterType;

use crate::trip_info::TripInfo;
use crate::views::{EditPointView, Placeholder, PointView, SortView, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerState {
    pub visible: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub filter: FilterType,
    pub count: usize,
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug)]
pub struct Screen<'a> {
    pub trip_info: Option<&'a TripInfo>,
    pub create_button: TriggerState,
    /// A mutation is in flight and input should be held back
    pub blocked: bool,
    pub filters: Vec<FilterOption>,
    pub body: Body<'a>,
}

#[derive(Debug)]
pub enum Body<'a> {
    Placeholder {
        placeholder: Placeholder,
        creation: Option<&'a EditPointView>,
    },
    List {
        sort: &'a SortView,
        creation: Option<&'a EditPointView>,
        items: Vec<ListItem<'a>>,
    },
}

impl Body<'_> {
    pub fn items(&self) -> &[ListItem<'_>] {
        match self {
            Body::List { items, .. } => items,
            Body::Placeholder { .. } => &[],
        }
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            Body::Placeholder { placeholder, .. } => Some(*placeholder),
            Body::List { .. } => None,
        }
    }

    pub fn creation(&self) -> Option<&EditPointView> {
        match self {
            Body::Placeholder { creation, .. } | Body::List { creation, .. } => *creation,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ListItem<'a> {
    Display(&'a PointView),
    Editing(&'a EditPointView),
}

impl ListItem<'_> {
    pub fn view_id(&self) -> ViewId {
        match self {
            ListItem::Display(view) => view.id(),
            ListItem::Editing(view) => view.id(),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, ListItem::Editing(_))
    }
}
