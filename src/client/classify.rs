//! Response classification
//!
//! Turns raw status/body pairs into `PollOutcome` and `BookingResult`. The
//! stale-session heuristic (a body without `data.dateList`) lives here so it
//! can change without touching the poll loop.

use reqwest::StatusCode;
use serde_json::Value;

use crate::domain::{BookingResult, PollOutcome, SlotRecord};

/// Maximum characters of a response body carried into diagnostics
const SNIPPET_CHARS: usize = 200;

/// First `SNIPPET_CHARS` characters of a body, for log lines
pub fn snippet(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// Classify a query response. Checks run in order: status, empty body, JSON, shape.
pub fn classify_query(status: StatusCode, body: &str) -> PollOutcome {
    if !status.is_success() {
        return PollOutcome::TransientError(format!("HTTP {}", status));
    }

    if body.trim().is_empty() {
        return PollOutcome::TransientError(format!("empty response body (status {})", status.as_u16()));
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => {
            return PollOutcome::MalformedResponse {
                snippet: snippet(body),
            };
        }
    };

    let Some(items) = value.pointer("/data/dateList").and_then(Value::as_array) else {
        return PollOutcome::AuthExpired {
            snippet: snippet(body),
        };
    };

    let slots = items
        .iter()
        .filter_map(|item| {
            let slot = SlotRecord::from_json(item);
            if slot.is_none() {
                log::debug!("Skipping dateList entry without a date: {}", item);
            }
            slot
        })
        .collect();

    PollOutcome::Slots(slots)
}

/// Classify a booking response for the slot dated `date`.
pub fn classify_booking(status: StatusCode, body: &str, date: &str) -> BookingResult {
    if !status.is_success() {
        return BookingResult::NetworkError(format!("HTTP {}", status));
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return BookingResult::Rejected(snippet(body)),
    };

    if success_flag(&value) || zero_code(&value) {
        return BookingResult::Booked(date.to_string());
    }

    let reason = match value.get("message") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        _ => value.to_string(),
    };
    BookingResult::Rejected(reason)
}

/// `success` whose text form is "true", in any case
fn success_flag(value: &Value) -> bool {
    match value.get("success") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// `code` equal to zero, as a number or as a string
fn zero_code(value: &Value) -> bool {
    match value.get("code") {
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(text)) => text.trim() == "0",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "2025-06-09";

    #[test]
    fn test_query_non_success_status_is_transient() {
        let outcome = classify_query(StatusCode::BAD_GATEWAY, "{}");
        assert_eq!(outcome, PollOutcome::TransientError("HTTP 502 Bad Gateway".into()));
    }

    #[test]
    fn test_query_empty_body_is_transient_not_malformed() {
        assert!(matches!(
            classify_query(StatusCode::OK, ""),
            PollOutcome::TransientError(_)
        ));
        assert!(matches!(
            classify_query(StatusCode::OK, "  \n"),
            PollOutcome::TransientError(_)
        ));
    }

    #[test]
    fn test_query_non_json_is_malformed() {
        let outcome = classify_query(StatusCode::OK, "<html>login</html>");
        assert_eq!(
            outcome,
            PollOutcome::MalformedResponse {
                snippet: "<html>login</html>".into()
            }
        );
    }

    #[test]
    fn test_query_missing_date_list_is_auth_expired() {
        assert!(matches!(
            classify_query(StatusCode::OK, r#"{"code":"401","message":"not login"}"#),
            PollOutcome::AuthExpired { .. }
        ));
        assert!(matches!(
            classify_query(StatusCode::OK, r#"{"data":{}}"#),
            PollOutcome::AuthExpired { .. }
        ));
        assert!(matches!(
            classify_query(StatusCode::OK, r#"{"data":null}"#),
            PollOutcome::AuthExpired { .. }
        ));
    }

    #[test]
    fn test_query_slots_preserve_order() {
        let body = r#"{"data":{"dateList":[
            {"date":"2025-06-02","newonbrdtcity":"DG01","onbrdaddress":"A"},
            {"date":"2025-06-09","newonbrdtcity":"DG01","onbrdaddress":"B","onbrdtcityName":"Dongguan"}
        ]}}"#;
        match classify_query(StatusCode::OK, body) {
            PollOutcome::Slots(slots) => {
                assert_eq!(slots.len(), 2);
                assert_eq!(slots[0].date, "2025-06-02");
                assert_eq!(slots[1].date, "2025-06-09");
                assert_eq!(slots[1].city_name.as_deref(), Some("Dongguan"));
            }
            other => panic!("Expected slots, got {:?}", other),
        }
    }

    #[test]
    fn test_query_empty_date_list() {
        assert_eq!(
            classify_query(StatusCode::OK, r#"{"data":{"dateList":[]}}"#),
            PollOutcome::Slots(vec![])
        );
    }

    #[test]
    fn test_booking_success_string_true() {
        assert_eq!(
            classify_booking(StatusCode::OK, r#"{"success":"true"}"#, DATE),
            BookingResult::Booked(DATE.into())
        );
        assert!(classify_booking(StatusCode::OK, r#"{"success":"TRUE"}"#, DATE).is_booked());
        assert!(classify_booking(StatusCode::OK, r#"{"success":true}"#, DATE).is_booked());
    }

    #[test]
    fn test_booking_success_zero_code() {
        assert!(classify_booking(StatusCode::OK, r#"{"code":0}"#, DATE).is_booked());
        assert!(classify_booking(StatusCode::OK, r#"{"code":"0"}"#, DATE).is_booked());
        assert!(classify_booking(StatusCode::OK, r#"{"success":false,"code":0}"#, DATE).is_booked());
    }

    #[test]
    fn test_booking_rejected_with_message() {
        assert_eq!(
            classify_booking(StatusCode::OK, r#"{"success":false,"message":"slot full"}"#, DATE),
            BookingResult::Rejected("slot full".into())
        );
    }

    #[test]
    fn test_booking_rejected_without_message_uses_body() {
        match classify_booking(StatusCode::OK, r#"{"code":"500"}"#, DATE) {
            BookingResult::Rejected(reason) => assert!(reason.contains("500")),
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_booking_non_success_status_is_network_error() {
        assert!(matches!(
            classify_booking(StatusCode::INTERNAL_SERVER_ERROR, r#"{"success":true}"#, DATE),
            BookingResult::NetworkError(_)
        ));
    }

    #[test]
    fn test_booking_non_json_is_rejected() {
        assert_eq!(
            classify_booking(StatusCode::OK, "busy", DATE),
            BookingResult::Rejected("busy".into())
        );
    }

    #[test]
    fn test_snippet_truncates_long_bodies() {
        let body = "x".repeat(500);
        let cut = snippet(&body);
        assert_eq!(cut.chars().count(), SNIPPET_CHARS + 1);
        assert!(cut.ends_with('…'));
        assert_eq!(snippet("short"), "short");
    }
}
