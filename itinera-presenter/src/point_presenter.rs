use itinera_catalog::Catalog;
use itinera_core::ValidationError;
use itinera_shared::Point;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::keyboard::{KeySubscription, Keyboard, ListenerOwner};
use crate::screen::ListItem;
use crate::views::{EditAction, EditPointView, PointView};

/// Which of the two views a point shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Display,
    Editing,
}

/// The escape subscription lives exactly as long as the editing state
#[derive(Debug)]
enum State {
    Display,
    Editing { _escape: KeySubscription },
}

/// Owns the display row and the edit form of one point
#[derive(Debug)]
pub struct PointPresenter {
    keyboard: Keyboard,
    catalog: Arc<Catalog>,
    point: Option<Point>,
    point_view: Option<PointView>,
    edit_view: Option<EditPointView>,
    state: State,
}

impl PointPresenter {
    pub fn new(keyboard: Keyboard, catalog: Arc<Catalog>) -> Self {
        Self {
            keyboard,
            catalog,
            point: None,
            point_view: None,
            edit_view: None,
            state: State::Display,
        }
    }

    /// Renders `point`. Showing the same point again keeps the current mode; a
    /// different point starts over in display mode.
    pub fn activate(&mut self, point: &Point) {
        let same_point = self.point.as_ref().is_some_and(|p| p.id == point.id);
        if !same_point {
            self.state = State::Display;
        }

        self.point_view = Some(PointView::new(point, &self.catalog));
        self.edit_view = Some(EditPointView::for_point(point, Arc::clone(&self.catalog)));
        self.point = Some(point.clone());
    }

    pub fn deactivate(&mut self) {
        self.state = State::Display;
        self.point_view = None;
        self.edit_view = None;
        self.point = None;
    }

    /// Collapses to display mode, discarding form edits. Returns false if already there.
    pub fn force_display(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        if let (Some(form), Some(point)) = (self.edit_view.as_mut(), self.point.as_ref()) {
            form.reset(point);
        }
        self.state = State::Display;
        true
    }

    pub fn mark_saving(&mut self) {
        if let Some(form) = self.edit_view.as_mut() {
            form.set_saving();
        }
    }

    pub fn mark_deleting(&mut self) {
        if let Some(form) = self.edit_view.as_mut() {
            form.set_deleting();
        }
    }

    /// Plays the abort cue on whichever view is shown
    pub fn mark_abort_failure(&mut self) {
        match (&self.state, self.edit_view.as_mut(), self.point_view.as_mut()) {
            (State::Editing { .. }, Some(form), _) => form.set_aborting(),
            (State::Display, _, Some(view)) => view.shake(),
            _ => {}
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.point.as_ref().map(|p| p.id)
    }

    pub fn point(&self) -> Option<&Point> {
        self.point.as_ref()
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            State::Display => Mode::Display,
            State::Editing { .. } => Mode::Editing,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode() == Mode::Editing
    }

    pub fn point_view(&self) -> Option<&PointView> {
        self.point_view.as_ref()
    }

    pub fn edit_view(&self) -> Option<&EditPointView> {
        self.edit_view.as_ref()
    }

    pub fn list_item(&self) -> Option<ListItem<'_>> {
        match self.state {
            State::Display => self.point_view.as_ref().map(ListItem::Display),
            State::Editing { .. } => self.edit_view.as_ref().map(ListItem::Editing),
        }
    }

    /// Switches to the edit form. Returns true on an actual mode change, which the
    /// owner must answer by collapsing every other presenter.
    pub(crate) fn enter_editing(&mut self) -> bool {
        let Some(id) = self.id() else {
            return false;
        };
        if self.is_editing() {
            return false;
        }

        if let (Some(form), Some(point)) = (self.edit_view.as_mut(), self.point.as_ref()) {
            form.reset(point);
        }
        self.state = State::Editing {
            _escape: self.keyboard.subscribe(ListenerOwner::Point(id)),
        };
        debug!("Point {} entered edit mode", id);
        true
    }

    /// Escape closes an open date picker first, then the form itself
    pub(crate) fn on_escape(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        if self.edit_view.as_mut().is_some_and(EditPointView::close_nested) {
            return true;
        }
        self.force_display()
    }

    pub(crate) fn edit(&mut self, action: EditAction) -> Result<(), ValidationError> {
        let editing = self.is_editing();
        match self.edit_view.as_mut() {
            Some(form) if editing => form.apply(action),
            _ => Ok(()),
        }
    }

    /// Validated point to persist, or None if nothing should be dispatched
    pub(crate) fn submit(&mut self) -> Option<Point> {
        if !self.is_editing() {
            return None;
        }
        let form = self.edit_view.as_mut()?;
        if form.state().is_disabled {
            return None;
        }
        form.submit()
            .inspect_err(|e| debug!("Point form rejected: {}", e))
            .ok()
    }

    pub(crate) fn request_delete(&self) -> Option<Point> {
        let form = self.edit_view.as_ref()?;
        if !self.is_editing() || form.state().is_disabled {
            return None;
        }
        self.point.clone()
    }

    /// Favorite toggle lives on the display row only
    pub(crate) fn toggled_favorite(&self) -> Option<Point> {
        if self.is_editing() {
            return None;
        }
        let mut point = self.point.clone()?;
        point.is_favorite = !point.is_favorite;
        Some(point)
    }

    /// Persistence accepted the submitted form
    pub(crate) fn commit_submit(&mut self) {
        self.force_display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use itinera_shared::{Destination, PointType};

    fn setup() -> (Keyboard, Arc<Catalog>, Point) {
        let destination = Destination {
            id: Uuid::new_v4(),
            name: "Oslo".to_string(),
            description: String::new(),
            pictures: vec![],
        };
        let now = Utc::now();
        let point = Point {
            id: Uuid::new_v4(),
            base_price: 120,
            date_from: now,
            date_to: now + Duration::hours(2),
            destination: destination.id,
            is_favorite: false,
            offers: vec![],
            point_type: PointType::Train,
        };
        let catalog = Arc::new(Catalog::new(vec![destination], vec![]));
        (Keyboard::new(), catalog, point)
    }

    #[test]
    fn test_editing_holds_one_subscription() {
        let (keyboard, catalog, point) = setup();
        let mut presenter = PointPresenter::new(keyboard.clone(), catalog);
        presenter.activate(&point);

        assert!(presenter.enter_editing());
        assert!(!presenter.enter_editing());
        assert_eq!(keyboard.listeners(), vec![ListenerOwner::Point(point.id)]);

        assert!(presenter.force_display());
        assert!(keyboard.is_empty());
    }

    #[test]
    fn test_activate_preserves_mode_for_same_point() {
        let (keyboard, catalog, point) = setup();
        let mut presenter = PointPresenter::new(keyboard.clone(), catalog);
        presenter.activate(&point);
        presenter.enter_editing();

        let view_id = presenter.point_view().map(PointView::id);
        presenter.activate(&point);
        assert_eq!(presenter.mode(), Mode::Editing);
        assert_ne!(presenter.point_view().map(PointView::id), view_id);

        let other = Point {
            id: Uuid::new_v4(),
            ..point
        };
        presenter.activate(&other);
        assert_eq!(presenter.mode(), Mode::Display);
        assert!(keyboard.is_empty());
    }

    #[test]
    fn test_escape_closes_date_picker_first() {
        let (keyboard, catalog, point) = setup();
        let mut presenter = PointPresenter::new(keyboard.clone(), catalog);
        presenter.activate(&point);
        presenter.enter_editing();
        presenter.edit(EditAction::OpenDatePicker).unwrap();

        assert!(presenter.on_escape());
        assert_eq!(presenter.mode(), Mode::Editing);

        assert!(presenter.on_escape());
        assert_eq!(presenter.mode(), Mode::Display);
        assert!(!presenter.on_escape());
        assert!(keyboard.is_empty());
    }

    #[test]
    fn test_abort_keeps_entered_values() {
        let (keyboard, catalog, point) = setup();
        let mut presenter = PointPresenter::new(keyboard, catalog);
        presenter.activate(&point);
        presenter.enter_editing();
        presenter.edit(EditAction::ChangePrice(999)).unwrap();

        let submitted = presenter.submit().unwrap();
        assert_eq!(submitted.base_price, 999);
        presenter.mark_saving();
        assert!(presenter.submit().is_none());

        presenter.mark_abort_failure();
        let form = presenter.edit_view().unwrap();
        assert_eq!(form.draft().base_price, 999);
        assert!(!form.state().is_disabled);
        assert_eq!(form.shakes(), 1);
        assert_eq!(presenter.point().unwrap().base_price, 120);
    }

    #[test]
    fn test_abort_in_display_shakes_row() {
        let (keyboard, catalog, point) = setup();
        let mut presenter = PointPresenter::new(keyboard, catalog);
        presenter.activate(&point);

        assert!(presenter.toggled_favorite().unwrap().is_favorite);
        presenter.mark_abort_failure();
        assert_eq!(presenter.point_view().unwrap().shakes(), 1);
    }

    #[test]
    fn test_edit_ignored_in_display_mode() {
        let (keyboard, catalog, point) = setup();
        let mut presenter = PointPresenter::new(keyboard, catalog);
        presenter.activate(&point);

        assert_eq!(presenter.edit(EditAction::ChangePrice(-1)), Ok(()));
        assert_eq!(presenter.edit_view().unwrap().draft().base_price, 120);

        presenter.enter_editing();
        assert_eq!(
            presenter.edit(EditAction::ChangePrice(-1)),
            Err(ValidationError::NegativePrice(-1))
        );
        presenter.edit(EditAction::ChangePrice(310)).unwrap();
        assert_eq!(presenter.edit_view().unwrap().draft().base_price, 310);
    }

    #[test]
    fn test_deactivate_releases_everything() {
        let (keyboard, catalog, point) = setup();
        let mut presenter = PointPresenter::new(keyboard.clone(), catalog);
        presenter.activate(&point);
        presenter.enter_editing();

        presenter.deactivate();
        assert!(presenter.list_item().is_none());
        assert!(presenter.id().is_none());
        assert!(keyboard.is_empty());
    }
}
