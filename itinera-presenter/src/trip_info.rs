use chrono::{DateTime, Utc};
use itinera_catalog::{Catalog, PriceCalculator};
use itinera_shared::Point;

const ROUTE_SEPARATOR: &str = " — ";
const MAX_ROUTE_CITIES: usize = 3;

/// Header summary of the whole trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripInfo {
    pub title: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub total_cost: u64,
}

impl TripInfo {
    /// None for an empty trip
    pub fn compute(points: &[Point], catalog: &Catalog) -> Option<Self> {
        let mut ordered: Vec<&Point> = points.iter().collect();
        ordered.sort_by_key(|p| p.date_from);

        let first = ordered.first()?;
        let date_to = ordered.iter().map(|p| p.date_to).max()?;

        let mut cities: Vec<&str> = ordered
            .iter()
            .filter_map(|p| catalog.destination(&p.destination))
            .map(|d| d.name.as_str())
            .collect();
        cities.dedup();

        let title = match cities.as_slice() {
            [first_city, .., last_city] if cities.len() > MAX_ROUTE_CITIES => {
                [*first_city, "...", *last_city].join(ROUTE_SEPARATOR)
            }
            _ => cities.join(ROUTE_SEPARATOR),
        };

        Some(Self {
            title,
            date_from: first.date_from,
            date_to,
            total_cost: PriceCalculator::new(catalog).trip_total(points),
        })
    }

    /// Start and end day as `DD MON`, joined like the route title
    pub fn dates_label(&self) -> String {
        format!(
            "{}{}{}",
            self.date_from.format("%d %b").to_string().to_uppercase(),
            ROUTE_SEPARATOR,
            self.date_to.format("%d %b").to_string().to_uppercase()
        )
    }
}
