//! Headless views. Each instance gets a fresh [`ViewId`]; presenters replace views
//! wholesale instead of patching them, so a changed id means a re-render.

use chrono::{DateTime, Duration, Utc};
use itinera_catalog::{Catalog, PriceCalculator};
use itinera_core::ValidationError;
use itinera_shared::{Destination, FilterType, Offer, Point, PointType, SortType};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    fn next() -> Self {
        ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Formats a duration as `05M`, `02H 30M` or `01D 02H 30M`
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let (days, hours, mins) = (minutes / 1440, minutes % 1440 / 60, minutes % 60);

    if days > 0 {
        format!("{days:02}D {hours:02}H {mins:02}M")
    } else if hours > 0 {
        format!("{hours:02}H {mins:02}M")
    } else {
        format!("{mins:02}M")
    }
}

/// Collapsed list row of a point
#[derive(Debug)]
pub struct PointView {
    id: ViewId,
    point: Point,
    destination: Option<Destination>,
    offers: Vec<Offer>,
    total_price: u64,
    shakes: u32,
}

impl PointView {
    pub fn new(point: &Point, catalog: &Catalog) -> Self {
        Self {
            id: ViewId::next(),
            point: point.clone(),
            destination: catalog.destination(&point.destination).cloned(),
            offers: catalog.selected_offers(point).into_iter().cloned().collect(),
            total_price: PriceCalculator::new(catalog).point_total(point),
            shakes: 0,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn title(&self) -> String {
        match &self.destination {
            Some(destination) => format!("{} {}", self.point.point_type, destination.name),
            None => self.point.point_type.to_string(),
        }
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.point.duration())
    }

    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    /// Abort cues played so far
    pub fn shakes(&self) -> u32 {
        self.shakes
    }

    pub(crate) fn shake(&mut self) {
        self.shakes += 1;
    }
}

/// Form contents, possibly incomplete (a new point has no destination yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointDraft {
    pub id: Option<Uuid>,
    pub point_type: PointType,
    pub destination: Option<Uuid>,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub offers: Vec<Uuid>,
    pub is_favorite: bool,
}

impl PointDraft {
    /// Seed of the creation form
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            point_type: PointType::Flight,
            destination: None,
            date_from: now,
            date_to: now,
            base_price: 0,
            offers: Vec::new(),
            is_favorite: false,
        }
    }

    fn to_point(&self, catalog: &Catalog) -> Result<Point, ValidationError> {
        let destination = self.destination.ok_or(ValidationError::MissingDestination)?;
        if self.date_from > self.date_to {
            return Err(ValidationError::InvertedDates);
        }

        let point = Point {
            // Server assigns the real id of a new point
            id: self.id.unwrap_or_else(Uuid::new_v4),
            base_price: self.base_price,
            date_from: self.date_from,
            date_to: self.date_to,
            destination,
            is_favorite: self.is_favorite,
            offers: self.offers.clone(),
            point_type: self.point_type,
        };
        catalog.validate(&point)?;
        Ok(point)
    }
}

impl From<&Point> for PointDraft {
    fn from(point: &Point) -> Self {
        Self {
            id: Some(point.id),
            point_type: point.point_type,
            destination: Some(point.destination),
            date_from: point.date_from,
            date_to: point.date_to,
            base_price: point.base_price,
            offers: point.offers.clone(),
            is_favorite: point.is_favorite,
        }
    }
}

/// Field-level interaction inside an edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    ChangeType(PointType),
    ChangeDestination(String),
    ChangePrice(i64),
    ChangeDates {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    ToggleOffer(Uuid),
    OpenDatePicker,
    CloseDatePicker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormState {
    pub is_disabled: bool,
    pub is_saving: bool,
    pub is_deleting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Edit,
    Create,
}

/// Expanded edit form of a point, or the creation form
#[derive(Debug)]
pub struct EditPointView {
    id: ViewId,
    mode: FormMode,
    catalog: Arc<Catalog>,
    draft: PointDraft,
    state: FormState,
    date_picker_open: bool,
    error: Option<ValidationError>,
    shakes: u32,
}

impl EditPointView {
    pub fn new(draft: PointDraft, mode: FormMode, catalog: Arc<Catalog>) -> Self {
        Self {
            id: ViewId::next(),
            mode,
            catalog,
            draft,
            state: FormState::default(),
            date_picker_open: false,
            error: None,
            shakes: 0,
        }
    }

    pub fn for_point(point: &Point, catalog: Arc<Catalog>) -> Self {
        Self::new(PointDraft::from(point), FormMode::Edit, catalog)
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &PointDraft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Last validation failure shown next to the form
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn shakes(&self) -> u32 {
        self.shakes
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.draft
            .destination
            .as_ref()
            .and_then(|id| self.catalog.destination(id))
    }

    pub fn available_offers(&self) -> &[Offer] {
        self.catalog.offers_for(self.draft.point_type)
    }

    pub fn cities(&self) -> Vec<&str> {
        self.catalog.cities()
    }

    /// A date picker is open and swallows Escape
    pub fn has_nested_context(&self) -> bool {
        self.date_picker_open
    }

    /// Applies a field change. Rejected input leaves the draft untouched and is kept as
    /// the form's error. A disabled form ignores input.
    pub fn apply(&mut self, action: EditAction) -> Result<(), ValidationError> {
        if self.state.is_disabled {
            return Ok(());
        }
        let result = self.try_apply(action);
        self.error = result.as_ref().err().cloned();
        result
    }

    fn try_apply(&mut self, action: EditAction) -> Result<(), ValidationError> {
        match action {
            EditAction::ChangeType(point_type) => {
                if point_type != self.draft.point_type {
                    self.draft.point_type = point_type;
                    self.draft.offers.clear();
                }
            }
            EditAction::ChangeDestination(name) => {
                let destination = self
                    .catalog
                    .destination_by_name(&name)
                    .ok_or_else(|| ValidationError::UnknownDestination(name.clone()))?;
                self.draft.destination = Some(destination.id);
            }
            EditAction::ChangePrice(price) => {
                if price < 0 {
                    return Err(ValidationError::NegativePrice(price));
                }
                self.draft.base_price =
                    u32::try_from(price).map_err(|_| ValidationError::PriceTooLarge(price))?;
            }
            EditAction::ChangeDates { from, to } => {
                if from > to {
                    return Err(ValidationError::InvertedDates);
                }
                self.draft.date_from = from;
                self.draft.date_to = to;
                self.date_picker_open = false;
            }
            EditAction::ToggleOffer(offer) => {
                let point_type = self.draft.point_type;
                if self.catalog.offer(point_type, &offer).is_none() {
                    return Err(ValidationError::OfferNotAvailable { offer, point_type });
                }
                match self.draft.offers.iter().position(|id| *id == offer) {
                    Some(index) => {
                        self.draft.offers.remove(index);
                    }
                    None => self.draft.offers.push(offer),
                }
            }
            EditAction::OpenDatePicker => self.date_picker_open = true,
            EditAction::CloseDatePicker => self.date_picker_open = false,
        }
        Ok(())
    }

    /// Closes the nested context; false if none was open
    pub fn close_nested(&mut self) -> bool {
        std::mem::replace(&mut self.date_picker_open, false)
    }

    /// Discards edits and shows `point` again
    pub fn reset(&mut self, point: &Point) {
        self.draft = PointDraft::from(point);
        self.state = FormState::default();
        self.date_picker_open = false;
        self.error = None;
    }

    pub fn submit(&mut self) -> Result<Point, ValidationError> {
        let result = self.draft.to_point(&self.catalog);
        self.error = result.as_ref().err().cloned();
        result
    }

    pub(crate) fn set_saving(&mut self) {
        self.state = FormState {
            is_disabled: true,
            is_saving: true,
            is_deleting: false,
        };
    }

    pub(crate) fn set_deleting(&mut self) {
        self.state = FormState {
            is_disabled: true,
            is_saving: false,
            is_deleting: true,
        };
    }

    /// Re-enables the form with its entered values and plays the abort cue
    pub(crate) fn set_aborting(&mut self) {
        self.state = FormState::default();
        self.shakes += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    pub sort: SortType,
    pub checked: bool,
    pub disabled: bool,
}

/// Sort bar above the list
#[derive(Debug)]
pub struct SortView {
    id: ViewId,
    current: SortType,
}

impl SortView {
    pub fn new(current: SortType) -> Self {
        Self {
            id: ViewId::next(),
            current,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn current(&self) -> SortType {
        self.current
    }

    pub fn options(&self) -> Vec<SortOption> {
        SortType::ALL
            .into_iter()
            .map(|sort| SortOption {
                sort,
                checked: sort == self.current,
                disabled: sort.is_display_only(),
            })
            .collect()
    }
}

/// Full-surface message shown instead of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Loading,
    LoadFailed,
    Empty(FilterType),
}

impl Placeholder {
    pub fn message(&self) -> &'static str {
        match self {
            Placeholder::Loading => "Loading...",
            Placeholder::LoadFailed => "Failed to load latest route information",
            Placeholder::Empty(filter) => filter.empty_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinera_shared::OfferGroup;

    struct Fixture {
        catalog: Arc<Catalog>,
        point: Point,
        flight_offer: Uuid,
    }

    fn fixture() -> Fixture {
        let paris = Destination {
            id: Uuid::new_v4(),
            name: "Paris".to_string(),
            description: String::new(),
            pictures: vec![],
        };
        let rome = Destination {
            id: Uuid::new_v4(),
            name: "Rome".to_string(),
            description: String::new(),
            pictures: vec![],
        };
        let flight_offer = Uuid::new_v4();
        let catalog = Arc::new(Catalog::new(
            vec![paris.clone(), rome],
            vec![OfferGroup {
                point_type: PointType::Flight,
                offers: vec![Offer {
                    id: flight_offer,
                    title: "Add meal".to_string(),
                    price: 25,
                }],
            }],
        ));
        let now = Utc::now();
        let point = Point {
            id: Uuid::new_v4(),
            base_price: 300,
            date_from: now,
            date_to: now + Duration::minutes(150),
            destination: paris.id,
            is_favorite: false,
            offers: vec![flight_offer],
            point_type: PointType::Flight,
        };
        Fixture {
            catalog,
            point,
            flight_offer,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(5)), "05M");
        assert_eq!(format_duration(Duration::minutes(150)), "02H 30M");
        assert_eq!(format_duration(Duration::minutes(1440 + 61)), "01D 01H 01M");
    }

    #[test]
    fn test_point_view_resolves_catalog() {
        let f = fixture();
        let view = PointView::new(&f.point, &f.catalog);

        assert_eq!(view.title(), "Flight Paris");
        assert_eq!(view.offers().len(), 1);
        assert_eq!(view.total_price(), 325);
        assert_eq!(view.duration_label(), "02H 30M");
        assert_ne!(view.id(), PointView::new(&f.point, &f.catalog).id());
    }

    #[test]
    fn test_invalid_input_is_kept_in_form() {
        let f = fixture();
        let mut form = EditPointView::for_point(&f.point, f.catalog.clone());

        assert_eq!(
            form.apply(EditAction::ChangePrice(-1)),
            Err(ValidationError::NegativePrice(-1))
        );
        assert_eq!(form.draft().base_price, 300);
        assert_eq!(form.error(), Some(&ValidationError::NegativePrice(-1)));

        let huge = i64::from(u32::MAX) + 1;
        assert_eq!(
            form.apply(EditAction::ChangePrice(huge)),
            Err(ValidationError::PriceTooLarge(huge))
        );
        assert_eq!(form.draft().base_price, 300);

        assert!(form.apply(EditAction::ChangeDestination("Atlantis".into())).is_err());
        form.apply(EditAction::ChangeDestination("rome".into())).unwrap();
        assert_eq!(form.destination().map(|d| d.name.as_str()), Some("Rome"));
        assert!(form.error().is_none());
    }

    #[test]
    fn test_type_change_clears_offers() {
        let f = fixture();
        let mut form = EditPointView::for_point(&f.point, f.catalog.clone());

        form.apply(EditAction::ChangeType(PointType::Bus)).unwrap();
        assert!(form.draft().offers.is_empty());
        assert!(form.available_offers().is_empty());
        assert!(matches!(
            form.apply(EditAction::ToggleOffer(f.flight_offer)),
            Err(ValidationError::OfferNotAvailable { .. })
        ));
    }

    #[test]
    fn test_reset_discards_edits() {
        let f = fixture();
        let mut form = EditPointView::for_point(&f.point, f.catalog.clone());

        form.apply(EditAction::ChangePrice(999)).unwrap();
        form.apply(EditAction::OpenDatePicker).unwrap();
        form.reset(&f.point);

        assert_eq!(form.draft(), &PointDraft::from(&f.point));
        assert!(!form.has_nested_context());
    }

    #[test]
    fn test_creation_draft_requires_destination() {
        let f = fixture();
        let mut form =
            EditPointView::new(PointDraft::blank(Utc::now()), FormMode::Create, f.catalog.clone());

        assert_eq!(form.submit(), Err(ValidationError::MissingDestination));

        form.apply(EditAction::ChangeDestination("Paris".into())).unwrap();
        form.apply(EditAction::ToggleOffer(f.flight_offer)).unwrap();
        let point = form.submit().unwrap();
        assert_eq!(point.offers, vec![f.flight_offer]);
    }

    #[test]
    fn test_saving_disables_input_and_abort_restores() {
        let f = fixture();
        let mut form = EditPointView::for_point(&f.point, f.catalog.clone());
        form.apply(EditAction::ChangePrice(410)).unwrap();

        form.set_saving();
        form.apply(EditAction::ChangePrice(1)).unwrap();
        assert_eq!(form.draft().base_price, 410);
        assert!(form.state().is_saving);

        form.set_aborting();
        assert_eq!(form.state(), FormState::default());
        assert_eq!(form.draft().base_price, 410);
        assert_eq!(form.shakes(), 1);
    }

    #[test]
    fn test_sort_options() {
        let view = SortView::new(SortType::Price);
        let options = view.options();
        assert_eq!(options.len(), 5);
        assert!(options.iter().any(|o| o.sort == SortType::Price && o.checked));
        assert!(options.iter().filter(|o| o.disabled).count() == 2);
    }
}
