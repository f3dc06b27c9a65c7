use chrono::{DateTime, Utc};
use itinera_core::{EventReceiver, FilterSource, PointsModel, ProgrammingError};
use itinera_shared::{
    EventPayload, FilterType, ModelEvent, Point, SortType, UpdateType, UserAction,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::gate::{MutationGate, TimeLimits};
use crate::intent::ViewIntent;
use crate::keyboard::{Key, Keyboard, ListenerOwner};
use crate::mutation::{MutationOutcome, MutationTarget, PendingMutation};
use crate::new_point_presenter::NewPointPresenter;
use crate::point_presenter::PointPresenter;
use crate::screen::{Body, FilterOption, Screen, TriggerState};
use crate::selector::{filter_counts, select};
use crate::trip_info::TripInfo;
use crate::views::{Placeholder, PointDraft, SortView};

/// Source of "now" for filtering and new-point defaults
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Orchestrates the point list: owns the presenter registry, the creation form, the
/// sort bar and the placeholders, and re-renders from model notifications only.
pub struct TripPresenter {
    points_model: Arc<dyn PointsModel>,
    filter_model: Arc<dyn FilterSource>,
    points_events: EventReceiver,
    filter_events: EventReceiver,
    gate: Arc<MutationGate>,
    keyboard: Keyboard,
    clock: Clock,

    presenters: HashMap<Uuid, PointPresenter>,
    order: Vec<Uuid>,
    new_point: NewPointPresenter,
    trigger_disabled: Arc<AtomicBool>,

    sort: SortType,
    sort_view: SortView,
    placeholder: Option<Placeholder>,
    trip_info: Option<TripInfo>,
    counts: Vec<(FilterType, usize)>,
    is_loading: bool,
}

impl TripPresenter {
    /// Subscribes to both models right away so no notification is missed
    pub fn new(
        points_model: Arc<dyn PointsModel>,
        filter_model: Arc<dyn FilterSource>,
        limits: TimeLimits,
    ) -> Self {
        let keyboard = Keyboard::new();
        let trigger_disabled = Arc::new(AtomicBool::new(false));
        let on_close = {
            let trigger_disabled = Arc::clone(&trigger_disabled);
            move || trigger_disabled.store(false, Ordering::SeqCst)
        };

        Self {
            points_events: points_model.observe(),
            filter_events: filter_model.observe(),
            points_model,
            filter_model,
            gate: Arc::new(MutationGate::new(limits)),
            new_point: NewPointPresenter::new(keyboard.clone(), on_close),
            keyboard,
            clock: Arc::new(Utc::now),
            presenters: HashMap::new(),
            order: Vec::new(),
            trigger_disabled,
            sort: SortType::default(),
            sort_view: SortView::new(SortType::default()),
            placeholder: None,
            trip_info: None,
            counts: Vec::new(),
            is_loading: true,
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// First render: the loading placeholder until the model reports INIT
    pub fn init(&mut self) {
        info!("Trip presenter started");
        self.render();
    }

    /// Drains pending notifications from both models. Returns how many were handled.
    pub fn pump(&mut self) -> Result<usize, ProgrammingError> {
        let mut handled = 0;
        while let Some(event) = next_event(&mut self.points_events, "points") {
            self.handle_model_event(event)?;
            handled += 1;
        }
        while let Some(event) = next_event(&mut self.filter_events, "filter") {
            self.handle_model_event(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    pub fn handle_model_event(&mut self, event: ModelEvent) -> Result<(), ProgrammingError> {
        debug!("Model event {}", event.update_type);
        match event.update_type {
            UpdateType::Patch => {
                let EventPayload::Point(point) = event.payload else {
                    return Err(ProgrammingError::MissingPayload(UpdateType::Patch));
                };
                if let Some(presenter) = self.presenters.get_mut(&point.id) {
                    presenter.activate(&point);
                }
                self.refresh_summary();
            }
            UpdateType::Minor => {
                self.clear(false);
                self.render();
            }
            UpdateType::Major => {
                self.clear(true);
                self.render();
            }
            UpdateType::Init => {
                self.is_loading = false;
                self.clear(false);
                self.render();
            }
        }
        Ok(())
    }

    /// Applies a user interaction. Mutations come back as a [`PendingMutation`] for the
    /// caller to run and then [`settle`](Self::settle).
    pub fn handle_intent(
        &mut self,
        intent: ViewIntent,
    ) -> Result<Option<PendingMutation>, ProgrammingError> {
        debug!("View intent {:?}", intent);
        match intent {
            ViewIntent::Expand(id) => {
                if self.presenter_mut(id)?.enter_editing() {
                    self.handle_mode_change(Some(id));
                }
            }
            ViewIntent::Rollup(id) => {
                self.presenter_mut(id)?.force_display();
            }
            ViewIntent::Edit(id, action) => {
                if let Err(e) = self.presenter_mut(id)?.edit(action) {
                    debug!("Point {} form input rejected: {}", id, e);
                }
            }
            ViewIntent::Submit(id) => {
                let presenter = self.presenter_mut(id)?;
                let Some(point) = presenter.submit() else {
                    return Ok(None);
                };
                let update_type = match presenter.point() {
                    Some(current) if !needs_reorder(current, &point) => UpdateType::Patch,
                    _ => UpdateType::Minor,
                };
                presenter.mark_saving();
                return Ok(Some(self.mutation(
                    UserAction::UpdatePoint,
                    MutationTarget::Point(id),
                    update_type,
                    point,
                )));
            }
            ViewIntent::Delete(id) => {
                let presenter = self.presenter_mut(id)?;
                let Some(point) = presenter.request_delete() else {
                    return Ok(None);
                };
                presenter.mark_deleting();
                return Ok(Some(self.mutation(
                    UserAction::DeletePoint,
                    MutationTarget::Point(id),
                    UpdateType::Minor,
                    point,
                )));
            }
            ViewIntent::ToggleFavorite(id) => {
                let Some(point) = self.presenter_mut(id)?.toggled_favorite() else {
                    return Ok(None);
                };
                return Ok(Some(self.mutation(
                    UserAction::UpdatePoint,
                    MutationTarget::Point(id),
                    UpdateType::Patch,
                    point,
                )));
            }
            ViewIntent::SortChange(sort) => self.handle_sort_change(sort),
            ViewIntent::FilterChange(filter) => {
                if filter != self.filter_model.filter() {
                    self.filter_model.set_filter(UpdateType::Major, filter);
                    self.pump()?;
                }
            }
            ViewIntent::CreateClick => self.create_point()?,
            ViewIntent::CreationEdit(action) => {
                if let Err(e) = self.new_point.edit(action) {
                    debug!("Creation form input rejected: {}", e);
                }
            }
            ViewIntent::CreationSubmit => {
                let Some(point) = self.new_point.submit() else {
                    return Ok(None);
                };
                return Ok(Some(self.mutation(
                    UserAction::AddPoint,
                    MutationTarget::Creation,
                    UpdateType::Minor,
                    point,
                )));
            }
            ViewIntent::CreationCancel => {
                self.new_point.close();
            }
        }
        Ok(None)
    }

    /// Routes a key press to the current subscription holders
    pub fn handle_key(&mut self, key: Key) -> bool {
        if key != Key::Escape {
            return false;
        }

        let mut handled = false;
        for owner in self.keyboard.listeners() {
            handled |= match owner {
                ListenerOwner::Point(id) => self
                    .presenters
                    .get_mut(&id)
                    .is_some_and(PointPresenter::on_escape),
                ListenerOwner::Creation => self.new_point.on_escape(),
            };
        }
        handled
    }

    /// Applies a finished mutation: pending notifications first, then the annotation
    /// on whichever presenter started it.
    pub fn settle(&mut self, outcome: MutationOutcome) -> Result<(), ProgrammingError> {
        self.pump()?;

        match outcome.result {
            Ok(()) => {
                info!("{:?} for {:?} accepted", outcome.action, outcome.target);
                match outcome.target {
                    MutationTarget::Creation => {
                        self.new_point.close();
                    }
                    MutationTarget::Point(id) => {
                        if let Some(presenter) = self.presenters.get_mut(&id) {
                            presenter.commit_submit();
                        }
                    }
                }
            }
            Err(e) => {
                warn!("{:?} for {:?} failed: {}", outcome.action, outcome.target, e);
                match outcome.target {
                    MutationTarget::Creation => self.new_point.mark_abort_failure(),
                    MutationTarget::Point(id) => {
                        if let Some(presenter) = self.presenters.get_mut(&id) {
                            presenter.mark_abort_failure();
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Handles an intent and, if it mutates, awaits and settles the mutation
    pub async fn perform(&mut self, intent: ViewIntent) -> Result<(), ProgrammingError> {
        if let Some(mutation) = self.handle_intent(intent)? {
            let outcome = mutation.run().await;
            self.settle(outcome)?;
        }
        Ok(())
    }

    /// Resets sort and filter, collapses every form and opens the creation form
    pub fn create_point(&mut self) -> Result<(), ProgrammingError> {
        if !self.trigger_visible() || self.new_point.is_open() {
            return Ok(());
        }

        self.sort = SortType::Day;
        self.filter_model
            .set_filter(UpdateType::Major, FilterType::Everything);
        self.pump()?;
        self.handle_mode_change(None);

        let draft = PointDraft::blank((self.clock)());
        if self.new_point.open(draft, self.points_model.catalog()) {
            self.trigger_disabled.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    pub fn screen(&self) -> Screen<'_> {
        let filter = self.filter_model.filter();
        let filters = self
            .counts
            .iter()
            .map(|&(option, count)| FilterOption {
                filter: option,
                count,
                checked: option == filter,
                disabled: count == 0 && option != filter,
            })
            .collect();

        let creation = self.new_point.form();
        let body = match self.placeholder {
            Some(placeholder @ Placeholder::Empty(_)) => Body::Placeholder {
                placeholder,
                creation,
            },
            Some(placeholder) => Body::Placeholder {
                placeholder,
                creation: None,
            },
            None => Body::List {
                sort: &self.sort_view,
                creation,
                items: self
                    .order
                    .iter()
                    .filter_map(|id| self.presenters.get(id))
                    .filter_map(PointPresenter::list_item)
                    .collect(),
            },
        };

        Screen {
            trip_info: self.trip_info.as_ref(),
            create_button: TriggerState {
                visible: self.trigger_visible(),
                disabled: self.trigger_disabled.load(Ordering::SeqCst) || self.gate.is_blocking(),
            },
            blocked: self.gate.is_blocking(),
            filters,
            body,
        }
    }

    pub fn current_sort(&self) -> SortType {
        self.sort
    }

    pub fn current_filter(&self) -> FilterType {
        self.filter_model.filter()
    }

    pub fn presenter(&self, id: Uuid) -> Option<&PointPresenter> {
        self.presenters.get(&id)
    }

    /// Ids of the rendered points, in display order
    pub fn visible_ids(&self) -> &[Uuid] {
        &self.order
    }

    /// Open forms, creation included
    pub fn editing_count(&self) -> usize {
        self.presenters.values().filter(|p| p.is_editing()).count()
            + usize::from(self.new_point.is_open())
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn gate(&self) -> &MutationGate {
        &self.gate
    }

    pub fn new_point(&self) -> &NewPointPresenter {
        &self.new_point
    }

    pub fn trip_info(&self) -> Option<&TripInfo> {
        self.trip_info.as_ref()
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        self.placeholder
    }

    fn presenter_mut(&mut self, id: Uuid) -> Result<&mut PointPresenter, ProgrammingError> {
        self.presenters
            .get_mut(&id)
            .ok_or(ProgrammingError::UnknownPoint(id))
    }

    fn mutation(
        &self,
        action: UserAction,
        target: MutationTarget,
        update_type: UpdateType,
        point: Point,
    ) -> PendingMutation {
        debug!("Dispatching {:?} ({}) for {:?}", action, update_type, target);
        PendingMutation::new(
            action,
            target,
            update_type,
            point,
            Arc::clone(&self.points_model),
            Arc::clone(&self.gate),
        )
    }

    /// Keeps a single form open: `active` stays, everything else collapses
    fn handle_mode_change(&mut self, active: Option<Uuid>) {
        self.new_point.close();
        for (id, presenter) in self.presenters.iter_mut() {
            if Some(*id) != active {
                presenter.force_display();
            }
        }
    }

    fn handle_sort_change(&mut self, sort: SortType) {
        if sort == self.sort || sort.is_display_only() {
            return;
        }
        self.sort = sort;
        self.clear(false);
        self.render();
    }

    fn trigger_visible(&self) -> bool {
        !matches!(
            self.placeholder,
            Some(Placeholder::Loading | Placeholder::LoadFailed)
        )
    }

    fn clear(&mut self, reset_sort: bool) {
        self.new_point.close();
        for presenter in self.presenters.values_mut() {
            presenter.deactivate();
        }
        self.presenters.clear();
        self.order.clear();
        self.placeholder = None;

        if reset_sort {
            self.sort = SortType::Day;
        }
    }

    fn refresh_summary(&mut self) {
        let points = self.points_model.points();
        let catalog = self.points_model.catalog();
        self.counts = filter_counts(&points, (self.clock)());
        self.trip_info = if self.is_loading || !catalog.is_available() {
            None
        } else {
            TripInfo::compute(&points, &catalog)
        };
    }

    fn render(&mut self) {
        self.refresh_summary();

        if self.is_loading {
            self.placeholder = Some(Placeholder::Loading);
            return;
        }

        let catalog = self.points_model.catalog();
        if !catalog.is_available() {
            self.placeholder = Some(Placeholder::LoadFailed);
            return;
        }

        let filter = self.filter_model.filter();
        let visible = select(&self.points_model.points(), filter, self.sort, (self.clock)());
        self.sort_view = SortView::new(self.sort);

        if visible.is_empty() {
            self.placeholder = Some(Placeholder::Empty(filter));
            debug!("Nothing to show for filter {}", filter);
            return;
        }

        for point in &visible {
            let mut presenter = PointPresenter::new(self.keyboard.clone(), Arc::clone(&catalog));
            presenter.activate(point);
            self.order.push(point.id);
            self.presenters.insert(point.id, presenter);
        }
        debug!(
            "Rendered {} point(s) sorted by {}, filter {}",
            visible.len(),
            self.sort,
            filter
        );
    }
}

impl std::fmt::Debug for TripPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripPresenter")
            .field("sort", &self.sort)
            .field("placeholder", &self.placeholder)
            .field("order", &self.order)
            .field("new_point", &self.new_point)
            .finish_non_exhaustive()
    }
}

/// Date or price edits can move the point in the sorted list
fn needs_reorder(current: &Point, submitted: &Point) -> bool {
    current.date_from != submitted.date_from
        || current.date_to != submitted.date_to
        || current.base_price != submitted.base_price
}

/// Next notification, turning a lagged receiver into a full rebuild
fn next_event(events: &mut EventReceiver, source: &str) -> Option<ModelEvent> {
    match events.try_recv() {
        Ok(event) => Some(event),
        Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        Err(TryRecvError::Lagged(missed)) => {
            warn!("Missed {} {} notification(s), rebuilding", missed, source);
            Some(ModelEvent::new(UpdateType::Minor, EventPayload::None))
        }
    }
}
