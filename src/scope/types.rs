//! Scope type definitions

use crate::utils::error::{PortalError, Result};
use chrono::{Duration, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Geographic region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Africa,
    Europe,
    Asia,
    Americas,
    MiddleEast,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Africa,
        Region::Europe,
        Region::Asia,
        Region::Americas,
        Region::MiddleEast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "AFRICA",
            Region::Europe => "EUROPE",
            Region::Asia => "ASIA",
            Region::Americas => "AMERICAS",
            Region::MiddleEast => "MIDDLE_EAST",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A filter dimension: everything, or one value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    /// Unset; written as `"ALL"`
    #[default]
    All,
    Only(T),
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }

    /// Whether `value` passes this filter
    pub fn matches(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl<T> From<T> for Selection<T> {
    fn from(value: T) -> Self {
        Selection::Only(value)
    }
}

impl From<&str> for Selection<String> {
    fn from(value: &str) -> Self {
        Selection::Only(value.to_string())
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "ALL"),
            Selection::Only(value) => write!(f, "{}", value),
        }
    }
}

impl<T: Serialize> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Selection::All => serializer.serialize_str("ALL"),
            Selection::Only(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Selection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.as_str() == Some("ALL") {
            return Ok(Selection::All);
        }
        T::deserialize(value)
            .map(Selection::Only)
            .map_err(serde::de::Error::custom)
    }
}

/// Relative or custom date range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRange {
    #[default]
    #[serde(rename = "TODAY")]
    Today,
    #[serde(rename = "7D")]
    Last7Days,
    #[serde(rename = "30D")]
    Last30Days,
    #[serde(rename = "CUSTOM")]
    Custom,
}

impl DateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Today => "TODAY",
            DateRange::Last7Days => "7D",
            DateRange::Last30Days => "30D",
            DateRange::Custom => "CUSTOM",
        }
    }

    /// Length in days of a relative range
    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::Today => Some(1),
            DateRange::Last7Days => Some(7),
            DateRange::Last30Days => Some(30),
            DateRange::Custom => None,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Inclusive calendar window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWindow> for DateWindow {
    type Error = PortalError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        DateWindow::new(raw.start, raw.end)
    }
}

impl DateWindow {
    /// Window from `start` to `end`, both included
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(PortalError::validation(format!(
                "Date window starts after it ends: {} > {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Current filter context. Every field always holds a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    #[serde(default)]
    pub region: Selection<Region>,
    #[serde(default)]
    pub org_id: Selection<String>,
    #[serde(default)]
    pub station_id: Selection<String>,
    #[serde(default)]
    pub site_id: Selection<String>,
    #[serde(default)]
    pub date_range: DateRange,
    /// Bounds used when `date_range` is `CUSTOM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_window: Option<DateWindow>,
}

impl Scope {
    /// Whether any dimension differs from the defaults
    pub fn is_narrowed(&self) -> bool {
        !self.region.is_all()
            || !self.org_id.is_all()
            || !self.station_id.is_all()
            || !self.site_id.is_all()
            || self.date_range != DateRange::Today
    }

    /// Inclusive window the date range covers, ending `today`.
    ///
    /// `CUSTOM` without a window yields `None`.
    pub fn date_bounds(&self, today: NaiveDate) -> Option<DateWindow> {
        match self.date_range.days() {
            Some(days) => Some(DateWindow {
                start: today - Duration::days(days - 1),
                end: today,
            }),
            None => self.custom_window,
        }
    }
}

/// Partial scope update; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Selection<Region>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<Selection<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<Selection<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<Selection<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_window: Option<DateWindow>,
}

impl ScopePatch {
    pub fn region(mut self, region: impl Into<Selection<Region>>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn org(mut self, org_id: impl Into<Selection<String>>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn station(mut self, station_id: impl Into<Selection<String>>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }

    pub fn site(mut self, site_id: impl Into<Selection<String>>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    pub fn date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = Some(date_range);
        self
    }

    /// Switch to `CUSTOM` with the given window
    pub fn custom_window(mut self, window: DateWindow) -> Self {
        self.date_range = Some(DateRange::Custom);
        self.custom_window = Some(window);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge into `scope` key by key
    pub fn apply_to(self, scope: &mut Scope) {
        if let Some(region) = self.region {
            scope.region = region;
        }
        if let Some(org_id) = self.org_id {
            scope.org_id = org_id;
        }
        if let Some(station_id) = self.station_id {
            scope.station_id = station_id;
        }
        if let Some(site_id) = self.site_id {
            scope.site_id = site_id;
        }
        if let Some(date_range) = self.date_range {
            scope.date_range = date_range;
        }
        if let Some(window) = self.custom_window {
            scope.custom_window = Some(window);
        }
    }
}
