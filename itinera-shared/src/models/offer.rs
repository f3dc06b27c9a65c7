use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::point::PointType;

/// Add-on service that can be selected for a point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: Uuid,
    pub title: String,
    pub price: u32,
}

/// All offers registered for one point type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfferGroup {
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub offers: Vec<Offer>,
}
