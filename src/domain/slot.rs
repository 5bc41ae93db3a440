//! Slot records and target date selection.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Result, SlotwatchError};

/// Date format used by the Booking Service and on the command line
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One open onboarding slot from the query endpoint.
///
/// Only `date` is required. City and address fields are passed through
/// untouched when present and stay `None` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    /// Onboarding date, `YYYY-MM-DD`
    pub date: String,
    /// City identifier sent back on booking (`newonbrdtcity`)
    pub city_id: Option<String>,
    /// Older city identifier some responses carry instead (`onbrdtcity`)
    pub legacy_city_id: Option<String>,
    /// Onboarding address sent back on booking (`onbrdaddress`)
    pub address: Option<String>,
    /// Human readable city name (`onbrdtcityName`)
    pub city_name: Option<String>,
}

impl SlotRecord {
    /// Create a slot with only a date set
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            city_id: None,
            legacy_city_id: None,
            address: None,
            city_name: None,
        }
    }

    /// Builder: set the city identifier and display name
    pub fn with_city(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.city_id = Some(id.into());
        self.city_name = Some(name.into());
        self
    }

    /// Builder: set the onboarding address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Map one `dateList` entry. Returns `None` when the entry has no usable date.
    pub fn from_json(item: &Value) -> Option<Self> {
        let date = text_field(item, "date")?;
        Some(Self {
            date,
            city_id: text_field(item, "newonbrdtcity"),
            legacy_city_id: text_field(item, "onbrdtcity"),
            address: text_field(item, "onbrdaddress"),
            city_name: text_field(item, "onbrdtcityName"),
        })
    }

    /// City identifier for display, preferring the current field
    pub fn city_code(&self) -> Option<&str> {
        self.city_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.legacy_city_id.as_deref().filter(|id| !id.is_empty()))
    }
}

/// Read a field as text. Strings pass through; numbers and bools are stringified;
/// null and missing both map to `None`.
fn text_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The operator's chosen dates. Never empty; every entry is a valid `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDateSet {
    dates: BTreeSet<String>,
}

impl TargetDateSet {
    /// Validate and build a target set.
    pub fn new<I, D>(dates: I) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for raw in dates {
            let date = raw.as_ref().trim();
            NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
                SlotwatchError::InvalidTargets(format!("'{}' is not a YYYY-MM-DD date", date))
            })?;
            set.insert(date.to_string());
        }

        if set.is_empty() {
            return Err(SlotwatchError::InvalidTargets(
                "select at least one date".to_string(),
            ));
        }

        Ok(Self { dates: set })
    }

    pub fn contains(&self, date: &str) -> bool {
        self.dates.contains(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dates.iter().map(String::as_str)
    }
}

impl fmt::Display for TargetDateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}
