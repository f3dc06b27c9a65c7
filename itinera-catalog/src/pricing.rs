use itinera_shared::Point;

use crate::catalog::Catalog;

/// Computes point and trip costs from base prices and selected offers
pub struct PriceCalculator<'a> {
    catalog: &'a Catalog,
}

impl<'a> PriceCalculator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Sum of the selected offers' prices
    pub fn offers_total(&self, point: &Point) -> u64 {
        self.catalog
            .selected_offers(point)
            .iter()
            .map(|offer| u64::from(offer.price))
            .sum()
    }

    /// Base price plus selected offers
    pub fn point_total(&self, point: &Point) -> u64 {
        u64::from(point.base_price) + self.offers_total(point)
    }

    pub fn trip_total<'p>(&self, points: impl IntoIterator<Item = &'p Point>) -> u64 {
        points.into_iter().map(|p| self.point_total(p)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use itinera_shared::{Destination, Offer, OfferGroup, PointType};
    use uuid::Uuid;

    #[test]
    fn test_trip_total_includes_offers() {
        let lounge = Offer {
            id: Uuid::new_v4(),
            title: "Lounge".to_string(),
            price: 50,
        };
        let meal = Offer {
            id: Uuid::new_v4(),
            title: "Meal".to_string(),
            price: 30,
        };
        let destination = Destination {
            id: Uuid::new_v4(),
            name: "Geneva".to_string(),
            description: String::new(),
            pictures: vec![],
        };
        let catalog = Catalog::new(
            vec![destination.clone()],
            vec![OfferGroup {
                point_type: PointType::Flight,
                offers: vec![lounge.clone(), meal],
            }],
        );

        let now = Utc::now();
        let flight = Point {
            id: Uuid::new_v4(),
            base_price: 1000,
            date_from: now,
            date_to: now + Duration::hours(3),
            destination: destination.id,
            is_favorite: false,
            offers: vec![lounge.id],
            point_type: PointType::Flight,
        };
        let taxi = Point {
            id: Uuid::new_v4(),
            base_price: 40,
            point_type: PointType::Taxi,
            offers: vec![],
            ..flight.clone()
        };

        let calculator = PriceCalculator::new(&catalog);
        assert_eq!(calculator.point_total(&flight), 1050);
        assert_eq!(calculator.trip_total([&flight, &taxi]), 1090);
    }
}
