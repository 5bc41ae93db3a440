//! Availability summary for a one-off query.

use crate::domain::SlotRecord;

/// Cities and dates currently open, as reported by a single query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySummary {
    /// `(city id, display name)`, first occurrence order, no duplicates
    pub cities: Vec<(String, String)>,
    /// Open dates in service order
    pub dates: Vec<String>,
}

impl AvailabilitySummary {
    pub fn from_slots(slots: &[SlotRecord]) -> Self {
        let mut cities: Vec<(String, String)> = Vec::new();
        for slot in slots {
            let Some(code) = slot.city_code() else {
                continue;
            };
            let name = slot
                .city_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "unknown".to_string());
            match cities.iter_mut().find(|(id, _)| id == code) {
                // later entries win, as they would in a keyed map
                Some(entry) => entry.1 = name,
                None => cities.push((code.to_string(), name)),
            }
        }

        Self {
            cities,
            dates: slots.iter().map(|s| s.date.clone()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// `Dongguan(DG01), Shanghai(SH01)`
    pub fn cities_line(&self) -> String {
        self.cities
            .iter()
            .map(|(id, name)| format!("{}({})", name, id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn dates_line(&self) -> String {
        self.dates.join(", ")
    }
}
