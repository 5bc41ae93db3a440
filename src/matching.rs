//! Match policy: which open slots are worth booking.

use crate::domain::{SlotRecord, TargetDateSet};

/// Slots whose date is one of the targets, in the order the service listed them.
pub fn select_matches(slots: &[SlotRecord], targets: &TargetDateSet) -> Vec<SlotRecord> {
    slots
        .iter()
        .filter(|slot| targets.contains(&slot.date))
        .cloned()
        .collect()
}

/// One-line round summary: `✓` marks target dates, `─` the rest.
pub fn status_line(slots: &[SlotRecord], targets: &TargetDateSet) -> String {
    if slots.is_empty() {
        return "(no open dates)".to_string();
    }

    slots
        .iter()
        .map(|slot| {
            let mark = if targets.contains(&slot.date) { '✓' } else { '─' };
            format!("{} {}", mark, slot.date)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(dates: &[&str]) -> Vec<SlotRecord> {
        dates.iter().map(|d| SlotRecord::new(*d)).collect()
    }

    #[test]
    fn test_selects_only_target_dates() {
        let open = vec![
            SlotRecord::new("2025-06-02").with_address("A"),
            SlotRecord::new("2025-06-09").with_address("B"),
        ];
        let targets = TargetDateSet::new(["2025-06-09"]).unwrap();

        let matched = select_matches(&open, &targets);
        assert_eq!(matched, vec![open[1].clone()]);
    }

    #[test]
    fn test_preserves_service_order() {
        let open = slots(&["2025-07-07", "2025-06-02", "2025-06-30", "2025-06-09"]);
        let targets = TargetDateSet::new(["2025-06-02", "2025-07-07", "2025-06-30"]).unwrap();

        let dates: Vec<String> = select_matches(&open, &targets)
            .into_iter()
            .map(|s| s.date)
            .collect();
        assert_eq!(dates, vec!["2025-07-07", "2025-06-02", "2025-06-30"]);
    }

    #[test]
    fn test_no_overlap_is_empty() {
        let open = slots(&["2025-06-02"]);
        let targets = TargetDateSet::new(["2025-06-09"]).unwrap();
        assert!(select_matches(&open, &targets).is_empty());
        assert!(select_matches(&[], &targets).is_empty());
    }

    #[test]
    fn test_is_deterministic_and_leaves_input_untouched() {
        let open = slots(&["2025-06-02", "2025-06-09", "2025-06-09"]);
        let before = open.clone();
        let targets = TargetDateSet::new(["2025-06-09"]).unwrap();

        let first = select_matches(&open, &targets);
        let second = select_matches(&open, &targets);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(open, before);
    }

    #[test]
    fn test_status_line_marks_targets() {
        let open = slots(&["2025-06-02", "2025-06-09"]);
        let targets = TargetDateSet::new(["2025-06-09"]).unwrap();
        assert_eq!(status_line(&open, &targets), "─ 2025-06-02 | ✓ 2025-06-09");
        assert_eq!(status_line(&[], &targets), "(no open dates)");
    }
}
