use itinera_catalog::Catalog;
use itinera_core::ValidationError;
use itinera_shared::Point;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::keyboard::{KeySubscription, Keyboard, ListenerOwner};
use crate::views::{EditAction, EditPointView, FormMode, PointDraft};

struct OpenForm {
    view: EditPointView,
    _escape: KeySubscription,
}

/// Creation form. At most one is open at a time.
pub struct NewPointPresenter {
    keyboard: Keyboard,
    form: Option<OpenForm>,
    on_close: Box<dyn FnMut() + Send>,
}

impl NewPointPresenter {
    /// `on_close` runs every time an open form is closed
    pub fn new(keyboard: Keyboard, on_close: impl FnMut() + Send + 'static) -> Self {
        Self {
            keyboard,
            form: None,
            on_close: Box::new(on_close),
        }
    }

    /// Opens a form seeded with `draft`; false if one is already open
    pub fn open(&mut self, draft: PointDraft, catalog: Arc<Catalog>) -> bool {
        if self.form.is_some() {
            return false;
        }
        self.form = Some(OpenForm {
            view: EditPointView::new(draft, FormMode::Create, catalog),
            _escape: self.keyboard.subscribe(ListenerOwner::Creation),
        });
        debug!("Creation form opened");
        true
    }

    pub fn close(&mut self) -> bool {
        if self.form.take().is_none() {
            return false;
        }
        debug!("Creation form closed");
        (self.on_close)();
        true
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&EditPointView> {
        self.form.as_ref().map(|f| &f.view)
    }

    pub(crate) fn edit(&mut self, action: EditAction) -> Result<(), ValidationError> {
        match self.form.as_mut() {
            Some(form) => form.view.apply(action),
            None => Ok(()),
        }
    }

    /// Validates the form and marks it saving. The form stays open until the add
    /// settles.
    pub(crate) fn submit(&mut self) -> Option<Point> {
        let form = &mut self.form.as_mut()?.view;
        if form.state().is_disabled {
            return None;
        }
        let point = form
            .submit()
            .inspect_err(|e| debug!("Creation form rejected: {}", e))
            .ok()?;
        form.set_saving();
        Some(point)
    }

    pub fn mark_abort_failure(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.view.set_aborting();
        }
    }

    pub(crate) fn on_escape(&mut self) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };
        if form.view.close_nested() {
            return true;
        }
        self.close()
    }
}

impl fmt::Debug for NewPointPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPointPresenter")
            .field("form", &self.form.as_ref().map(|open| &open.view))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use itinera_shared::Destination;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(
            vec![Destination {
                id: Uuid::new_v4(),
                name: "Lisbon".to_string(),
                description: String::new(),
                pictures: vec![],
            }],
            vec![],
        ))
    }

    #[test]
    fn test_open_and_close_invoke_callback_once() {
        let keyboard = Keyboard::new();
        let closed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closed);
        let mut presenter = NewPointPresenter::new(keyboard.clone(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(presenter.open(PointDraft::blank(Utc::now()), catalog()));
        assert!(!presenter.open(PointDraft::blank(Utc::now()), catalog()));
        assert_eq!(keyboard.listeners(), vec![ListenerOwner::Creation]);

        assert!(presenter.close());
        assert!(!presenter.close());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert!(keyboard.is_empty());
    }

    #[test]
    fn test_submit_requires_valid_form() {
        let mut presenter = NewPointPresenter::new(Keyboard::new(), || {});
        presenter.open(PointDraft::blank(Utc::now()), catalog());

        assert!(presenter.submit().is_none());
        assert_eq!(
            presenter.form().and_then(EditPointView::error),
            Some(&ValidationError::MissingDestination)
        );

        presenter
            .edit(EditAction::ChangeDestination("Lisbon".into()))
            .unwrap();
        assert!(presenter.submit().is_some());
        assert!(presenter.form().unwrap().state().is_saving);
        assert!(presenter.submit().is_none());

        presenter.mark_abort_failure();
        assert!(!presenter.form().unwrap().state().is_disabled);
        assert!(presenter.is_open());
    }

    #[test]
    fn test_escape_closes_nested_then_form() {
        let mut presenter = NewPointPresenter::new(Keyboard::new(), || {});
        presenter.open(PointDraft::blank(Utc::now()), catalog());
        presenter.edit(EditAction::OpenDatePicker).unwrap();

        assert!(presenter.on_escape());
        assert!(presenter.is_open());
        assert!(presenter.on_escape());
        assert!(!presenter.is_open());
    }
}
