use itinera_catalog::CatalogError;
use itinera_shared::{PointType, UnknownKey, UpdateType};
use uuid::Uuid;

/// Malformed form input, reported inside the edit form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Price must not be negative: {0}")]
    NegativePrice(i64),

    #[error("Price is too large: {0}")]
    PriceTooLarge(i64),

    #[error("Start date must not be after end date")]
    InvertedDates,

    #[error("Destination is required")]
    MissingDestination,

    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    #[error("Offer {offer} is not available for {point_type}")]
    OfferNotAvailable {
        offer: Uuid,
        point_type: PointType,
    },
}

impl From<CatalogError> for ValidationError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownDestination(id) => {
                ValidationError::UnknownDestination(id.to_string())
            }
            CatalogError::OfferNotRegistered { offer, point_type } => {
                ValidationError::OfferNotAvailable { offer, point_type }
            }
        }
    }
}

/// A model mutation was rejected; nothing was applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Rejected by server ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
    },

    #[error("Point not found: {0}")]
    NotFound(Uuid),
}

/// Broken internal invariant; callers must not swallow it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgrammingError {
    #[error(transparent)]
    UnknownKey(#[from] UnknownKey),

    #[error("No presenter registered for point {0}")]
    UnknownPoint(Uuid),

    #[error("{0:?} notification arrived without its payload")]
    MissingPayload(UpdateType),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_maps_to_validation() {
        let id = Uuid::new_v4();
        let err: ValidationError = CatalogError::UnknownDestination(id).into();
        assert_eq!(err, ValidationError::UnknownDestination(id.to_string()));
    }

    #[test]
    fn test_unknown_key_is_programming_error() {
        let err: ProgrammingError = "someday"
            .parse::<itinera_shared::FilterType>()
            .unwrap_err()
            .into();
        assert_eq!(err.to_string(), "unknown filter: \"someday\"");
    }
}
