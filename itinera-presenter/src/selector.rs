use chrono::{DateTime, Utc};
use itinera_shared::{FilterType, Point, SortType};

/// Projects the canonical list onto the visible one. Pure: the input is never touched
/// and equal inputs give equal outputs.
pub fn select(
    points: &[Point],
    filter: FilterType,
    sort: SortType,
    now: DateTime<Utc>,
) -> Vec<Point> {
    let mut visible: Vec<Point> = points
        .iter()
        .filter(|point| matches_filter(point, filter, now))
        .cloned()
        .collect();
    sort_points(&mut visible, sort);
    visible
}

pub fn matches_filter(point: &Point, filter: FilterType, now: DateTime<Utc>) -> bool {
    match filter {
        FilterType::Everything => true,
        FilterType::Future => point.is_future(now),
        FilterType::Present => point.is_present(now),
        FilterType::Past => point.is_past(now),
    }
}

/// Stable sort; display-only keys keep the current order
pub fn sort_points(points: &mut [Point], sort: SortType) {
    match sort {
        SortType::Day => points.sort_by(|a, b| a.date_from.cmp(&b.date_from)),
        SortType::Time => points.sort_by(|a, b| b.duration().cmp(&a.duration())),
        SortType::Price => points.sort_by(|a, b| b.base_price.cmp(&a.base_price)),
        SortType::Event | SortType::Offers => {}
    }
}

/// Number of points each filter would show
pub fn filter_counts(points: &[Point], now: DateTime<Utc>) -> Vec<(FilterType, usize)> {
    FilterType::ALL
        .into_iter()
        .map(|filter| {
            let count = points.iter().filter(|p| matches_filter(p, filter, now)).count();
            (filter, count)
        })
        .collect()
}
