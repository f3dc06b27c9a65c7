use itinera_shared::{Destination, Offer, OfferGroup, Point, PointType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only reference data loaded once at model initialization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    destinations: Vec<Destination>,
    offers: Vec<OfferGroup>,
}

impl Catalog {
    pub fn new(destinations: Vec<Destination>, offers: Vec<OfferGroup>) -> Self {
        Self { destinations, offers }
    }

    /// Catalog used when loading failed
    pub fn empty() -> Self {
        Self::default()
    }

    /// Both destinations and offers must be present for the list to be editable
    pub fn is_available(&self) -> bool {
        !self.destinations.is_empty() && !self.offers.is_empty()
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn offer_groups(&self) -> &[OfferGroup] {
        &self.offers
    }

    pub fn destination(&self, id: &Uuid) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == *id)
    }

    pub fn destination_by_name(&self, name: &str) -> Option<&Destination> {
        let name = name.trim();
        self.destinations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// City names offered in the destination picker
    pub fn cities(&self) -> Vec<&str> {
        self.destinations.iter().map(|d| d.name.as_str()).collect()
    }

    /// Offers registered for a point type (empty when the type has none)
    pub fn offers_for(&self, point_type: PointType) -> &[Offer] {
        self.offers
            .iter()
            .find(|group| group.point_type == point_type)
            .map(|group| group.offers.as_slice())
            .unwrap_or(&[])
    }

    pub fn offer(&self, point_type: PointType, offer_id: &Uuid) -> Option<&Offer> {
        self.offers_for(point_type).iter().find(|o| o.id == *offer_id)
    }

    /// Resolves the point's selected offer ids, skipping ids the catalog does not know
    pub fn selected_offers(&self, point: &Point) -> Vec<&Offer> {
        self.offers_for(point.point_type)
            .iter()
            .filter(|offer| point.has_offer(&offer.id))
            .collect()
    }

    /// Checks the reference invariants of a point
    pub fn validate(&self, point: &Point) -> Result<(), CatalogError> {
        if self.destination(&point.destination).is_none() {
            return Err(CatalogError::UnknownDestination(point.destination));
        }

        if let Some(offer) = point
            .offers
            .iter()
            .find(|id| self.offer(point.point_type, id).is_none())
        {
            return Err(CatalogError::OfferNotRegistered {
                offer: *offer,
                point_type: point.point_type,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Destination not found: {0}")]
    UnknownDestination(Uuid),

    #[error("Offer {offer} is not registered for {point_type}")]
    OfferNotRegistered {
        offer: Uuid,
        point_type: PointType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_catalog() -> (Catalog, Uuid, Uuid) {
        let destination = Destination {
            id: Uuid::new_v4(),
            name: "Amsterdam".to_string(),
            description: "Canals".to_string(),
            pictures: vec![],
        };
        let offer = Offer {
            id: Uuid::new_v4(),
            title: "Upgrade to business".to_string(),
            price: 120,
        };
        let ids = (destination.id, offer.id);
        let catalog = Catalog::new(
            vec![destination],
            vec![OfferGroup {
                point_type: PointType::Flight,
                offers: vec![offer],
            }],
        );
        (catalog, ids.0, ids.1)
    }

    fn point(destination: Uuid, point_type: PointType, offers: Vec<Uuid>) -> Point {
        let now = Utc::now();
        Point {
            id: Uuid::new_v4(),
            base_price: 500,
            date_from: now,
            date_to: now + Duration::hours(2),
            destination,
            is_favorite: false,
            offers,
            point_type,
        }
    }

    #[test]
    fn test_validate_point() {
        let (catalog, destination, offer) = sample_catalog();

        assert!(catalog.validate(&point(destination, PointType::Flight, vec![offer])).is_ok());

        let unknown = Uuid::new_v4();
        assert_eq!(
            catalog.validate(&point(unknown, PointType::Flight, vec![])),
            Err(CatalogError::UnknownDestination(unknown))
        );

        // Offer belongs to flights, not buses
        assert!(matches!(
            catalog.validate(&point(destination, PointType::Bus, vec![offer])),
            Err(CatalogError::OfferNotRegistered { .. })
        ));
    }

    #[test]
    fn test_lookups() {
        let (catalog, destination, offer) = sample_catalog();

        assert!(catalog.is_available());
        assert!(!Catalog::empty().is_available());
        assert_eq!(catalog.destination_by_name(" amsterdam ").map(|d| d.id), Some(destination));
        assert_eq!(catalog.cities(), vec!["Amsterdam"]);
        assert!(catalog.offers_for(PointType::Taxi).is_empty());
        assert_eq!(catalog.offer(PointType::Flight, &offer).map(|o| o.price), Some(120));

        let p = point(destination, PointType::Flight, vec![offer, Uuid::new_v4()]);
        assert_eq!(catalog.selected_offers(&p).len(), 1);
    }
}
