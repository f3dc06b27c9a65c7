use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::keys::UnknownKey;

/// Kind of travel event a point describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum PointType {
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl PointType {
    pub const ALL: [PointType; 9] = [
        PointType::Taxi,
        PointType::Bus,
        PointType::Train,
        PointType::Ship,
        PointType::Drive,
        PointType::Flight,
        PointType::CheckIn,
        PointType::Sightseeing,
        PointType::Restaurant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PointType::Taxi => "taxi",
            PointType::Bus => "bus",
            PointType::Train => "train",
            PointType::Ship => "ship",
            PointType::Drive => "drive",
            PointType::Flight => "flight",
            PointType::CheckIn => "check-in",
            PointType::Sightseeing => "sightseeing",
            PointType::Restaurant => "restaurant",
        }
    }

    /// Human label used in list rows and form headers
    pub fn label(&self) -> &'static str {
        match self {
            PointType::Taxi => "Taxi",
            PointType::Bus => "Bus",
            PointType::Train => "Train",
            PointType::Ship => "Ship",
            PointType::Drive => "Drive",
            PointType::Flight => "Flight",
            PointType::CheckIn => "Check-in",
            PointType::Sightseeing => "Sightseeing",
            PointType::Restaurant => "Restaurant",
        }
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PointType {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PointType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKey::new("point type", s))
    }
}

/// A single waypoint of the trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Point {
    pub id: Uuid,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: Uuid,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub offers: Vec<Uuid>,
    #[serde(rename = "type")]
    pub point_type: PointType,
}

impl Point {
    pub fn duration(&self) -> Duration {
        self.date_to - self.date_from
    }

    /// Starts strictly after `now`
    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.date_from > now
    }

    /// `now` falls inside the time window, bounds included
    pub fn is_present(&self, now: DateTime<Utc>) -> bool {
        self.date_from <= now && now <= self.date_to
    }

    /// Ended strictly before `now`
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date_to < now
    }

    pub fn has_offer(&self, offer_id: &Uuid) -> bool {
        self.offers.contains(offer_id)
    }
}
