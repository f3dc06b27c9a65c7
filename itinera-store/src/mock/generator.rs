use chrono::{Duration, Utc};
use itinera_shared::{Destination, Offer, OfferGroup, Picture, Point, PointType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::app_config::MockConfig;

const CITIES: [&str; 10] = [
    "Amsterdam", "Geneva", "Chamonix", "Paris", "Rome", "Vienna", "Prague", "Lisbon", "Oslo",
    "Porto",
];

const DESCRIPTIONS: [&str; 5] = [
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
    "Cras aliquet varius magna, non porta ligula feugiat eget.",
    "Fusce tristique felis at fermentum pharetra.",
    "Aliquam id orci ut lectus varius viverra.",
    "Nullam nunc ex, convallis sed finibus eget, sollicitudin eget ante.",
];

const OFFER_TITLES: [&str; 6] = [
    "Add luggage",
    "Switch to comfort",
    "Add meal",
    "Choose seats",
    "Travel by train",
    "Order Uber",
];

const DAYS_RANGE: i64 = 7;
const BASE_PRICE_MIN: u32 = 200;
const BASE_PRICE_MAX: u32 = 2000;

/// Everything the mock backend serves
#[derive(Debug, Clone, Default)]
pub struct MockData {
    pub destinations: Vec<Destination>,
    pub offers: Vec<OfferGroup>,
    pub points: Vec<Point>,
}

/// Seeded generator of destinations, offers and points.
///
/// Offer ids are always drawn from the point type's own group, so generated points
/// satisfy the catalog invariants.
pub struct MockGenerator {
    rng: StdRng,
}

impl MockGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn data(&mut self, config: &MockConfig) -> MockData {
        let destinations = self.destinations(config.min_destinations, config.max_destinations);
        let offers = self.offers(config.offers_per_type);
        let points = (0..config.points)
            .map(|_| self.point(&destinations, &offers))
            .collect();

        MockData {
            destinations,
            offers,
            points,
        }
    }

    /// Random count between the bounds, distinct cities
    pub fn destinations(&mut self, min: usize, max: usize) -> Vec<Destination> {
        let max = max.clamp(1, CITIES.len());
        let count = self.rng.gen_range(min.clamp(1, max)..=max);

        CITIES
            .choose_multiple(&mut self.rng, count)
            .map(|name| Destination {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: DESCRIPTIONS
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                pictures: (0..self.rng.gen_range(1..=4))
                    .map(|_| Picture {
                        src: format!(
                            "https://loremflickr.com/248/152?random={}",
                            self.rng.gen_range(0..1000)
                        ),
                        description: format!("{} parliament building", name),
                    })
                    .collect(),
            })
            .collect()
    }

    /// One group per point type with up to `per_type` offers each
    pub fn offers(&mut self, per_type: usize) -> Vec<OfferGroup> {
        PointType::ALL
            .into_iter()
            .map(|point_type| OfferGroup {
                point_type,
                offers: (0..self.rng.gen_range(0..=per_type))
                    .map(|i| Offer {
                        id: Uuid::new_v4(),
                        title: OFFER_TITLES[i % OFFER_TITLES.len()].to_string(),
                        price: self.rng.gen_range(10..=200),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn point(&mut self, destinations: &[Destination], offers: &[OfferGroup]) -> Point {
        let point_type = *PointType::ALL.choose(&mut self.rng).unwrap_or(&PointType::Flight);
        let available: Vec<Uuid> = offers
            .iter()
            .find(|group| group.point_type == point_type)
            .map(|group| group.offers.iter().map(|o| o.id).collect())
            .unwrap_or_default();
        let selected_count = self.rng.gen_range(0..=available.len());
        let selected = available
            .choose_multiple(&mut self.rng, selected_count)
            .copied()
            .collect();

        let (date_from, date_to) = {
            let a = self.random_offset();
            let b = self.random_offset();
            let now = Utc::now();
            (now + a.min(b), now + a.max(b))
        };

        Point {
            id: Uuid::new_v4(),
            base_price: self.rng.gen_range(BASE_PRICE_MIN..=BASE_PRICE_MAX),
            date_from,
            date_to,
            destination: destinations
                .choose(&mut self.rng)
                .map(|d| d.id)
                .unwrap_or_else(Uuid::nil),
            is_favorite: self.rng.gen_bool(0.3),
            offers: selected,
            point_type,
        }
    }

    fn random_offset(&mut self) -> Duration {
        Duration::days(self.rng.gen_range(-DAYS_RANGE..=DAYS_RANGE))
            + Duration::hours(self.rng.gen_range(0..24))
            + Duration::minutes(self.rng.gen_range(0..60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinera_catalog::Catalog;
    use std::collections::HashSet;

    #[test]
    fn test_generated_points_respect_catalog() {
        let config = MockConfig {
            seed: Some(3),
            points: 40,
            ..MockConfig::default()
        };
        let data = MockGenerator::new(config.seed).data(&config);
        let catalog = Catalog::new(data.destinations.clone(), data.offers.clone());

        let ids: HashSet<_> = data.points.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 40);

        for point in &data.points {
            assert!(catalog.validate(point).is_ok());
            assert!(point.date_from <= point.date_to);
            assert!((BASE_PRICE_MIN..=BASE_PRICE_MAX).contains(&point.base_price));
        }
    }

    #[test]
    fn test_destination_count_within_bounds() {
        let mut generator = MockGenerator::new(Some(5));
        for _ in 0..20 {
            let destinations = generator.destinations(3, 6);
            assert!((3..=6).contains(&destinations.len()));
            let names: HashSet<_> = destinations.iter().map(|d| d.name.as_str()).collect();
            assert_eq!(names.len(), destinations.len());
        }
    }
}
