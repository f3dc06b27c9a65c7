use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A key string that does not belong to its enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownKey {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownKey {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Temporal filter applied to the point list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl FilterType {
    pub const ALL: [FilterType; 4] = [
        FilterType::Everything,
        FilterType::Future,
        FilterType::Present,
        FilterType::Past,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Everything => "everything",
            FilterType::Future => "future",
            FilterType::Present => "present",
            FilterType::Past => "past",
        }
    }

    /// Text shown when nothing matches this filter
    pub fn empty_message(&self) -> &'static str {
        match self {
            FilterType::Everything => "Click New Event to create your first point",
            FilterType::Future => "There are no future events now",
            FilterType::Present => "There are no present events now",
            FilterType::Past => "There are no past events now",
        }
    }
}

/// Ordering applied to the visible list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    Day,
    Event,
    Time,
    Price,
    Offers,
}

impl SortType {
    pub const ALL: [SortType; 5] = [
        SortType::Day,
        SortType::Event,
        SortType::Time,
        SortType::Price,
        SortType::Offers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Day => "day",
            SortType::Event => "event",
            SortType::Time => "time",
            SortType::Price => "price",
            SortType::Offers => "offers",
        }
    }

    /// Event and offers columns are shown in the sort bar but never reorder the list
    pub fn is_display_only(&self) -> bool {
        matches!(self, SortType::Event | SortType::Offers)
    }
}

/// Re-render scope of a model notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateType {
    Patch,
    Minor,
    Major,
    Init,
}

impl UpdateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Patch => "PATCH",
            UpdateType::Minor => "MINOR",
            UpdateType::Major => "MAJOR",
            UpdateType::Init => "INIT",
        }
    }
}

/// Mutation requested by the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAction {
    UpdatePoint,
    AddPoint,
    DeletePoint,
}

macro_rules! key_parsing {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|k| k.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownKey::new($kind, s))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

key_parsing!(FilterType, "filter", [
    FilterType::Everything,
    FilterType::Future,
    FilterType::Present,
    FilterType::Past,
]);
key_parsing!(SortType, "sort", [
    SortType::Day,
    SortType::Event,
    SortType::Time,
    SortType::Price,
    SortType::Offers,
]);
key_parsing!(UpdateType, "update type", [
    UpdateType::Patch,
    UpdateType::Minor,
    UpdateType::Major,
    UpdateType::Init,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!("past".parse::<FilterType>().unwrap(), FilterType::Past);
        assert_eq!("PRICE".parse::<SortType>().unwrap(), SortType::Price);
        assert_eq!("minor".parse::<UpdateType>().unwrap(), UpdateType::Minor);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = "tomorrow".parse::<FilterType>().unwrap_err();
        assert_eq!(err.kind, "filter");
        assert_eq!(err.value, "tomorrow");
        assert!("random".parse::<SortType>().is_err());
        assert!("HUGE".parse::<UpdateType>().is_err());
    }

    #[test]
    fn test_display_only_sorts() {
        assert!(SortType::Event.is_display_only());
        assert!(SortType::Offers.is_display_only());
        assert!(!SortType::Day.is_display_only());
        assert_eq!(SortType::default(), SortType::Day);
    }
}
