//! Consumption record types
//!
//! - `ConsumptionRecord`: a stored expense entry, as returned by the service
//! - `NewConsumption`: the validated payload submitted to create a record
//! - Date parsing and display helpers shared by the form and the CLI

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Display format of the date picker, e.g. `05-Mar-2024 07:30 PM`
pub const DISPLAY_DATE_FORMAT: &str = "%d-%b-%Y %I:%M %p";

/// A single consumption (expense) entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionRecord {
    /// Identifier assigned by the record service
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub value: f64,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub date: DateTime<Utc>,
}

impl ConsumptionRecord {
    /// Attach a service-assigned id to a new payload
    pub fn from_new(id: impl Into<String>, new: NewConsumption) -> Self {
        Self {
            id: Some(id.into()),
            name: new.name,
            kind: new.kind,
            category: new.category,
            value: new.value,
            source: new.source,
            remark: new.remark,
            date: new.date,
        }
    }

    /// Whether this record carries the given id
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Date rendered in the picker's display format
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// Payload for creating a record; everything but the id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewConsumption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub value: f64,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub date: DateTime<Utc>,
}

/// Parse a user-supplied date.
///
/// Accepts RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` and the display
/// format. Naive inputs are taken as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", DISPLAY_DATE_FORMAT] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn sample() -> NewConsumption {
        NewConsumption {
            name: "Groceries".to_string(),
            kind: "expense".to_string(),
            category: "food".to_string(),
            value: 42.5,
            source: "card".to_string(),
            remark: None,
            date: Utc.with_ymd_and_hms(2024, 3, 5, 19, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let record = ConsumptionRecord::from_new("abc", sample());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["_id"], "abc");
        assert_eq!(json["type"], "expense");
        assert!(json.get("remark").is_none());
    }

    #[test]
    fn test_deserialize_without_id() {
        let json = r#"{"name":"Bus","type":"expense","category":"transport",
            "value":2.5,"source":"cash","date":"2024-03-05T08:00:00Z"}"#;
        let record: ConsumptionRecord = serde_json::from_str(json).unwrap();

        assert!(record.id.is_none());
        assert_eq!(record.kind, "expense");
        assert_eq!(record.value, 2.5);
    }

    #[test]
    fn test_display_date() {
        let record = ConsumptionRecord::from_new("abc", sample());
        assert_eq!(record.display_date(), "05-Mar-2024 07:30 PM");
    }

    #[test]
    fn test_parse_date_formats() {
        let rfc = parse_date("2024-03-05T19:30:00Z").unwrap();
        assert_eq!(rfc.hour(), 19);

        let day = parse_date("2024-03-05").unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2024, 3, 5));
        assert_eq!(day.hour(), 0);

        let display = parse_date("05-Mar-2024 07:30 PM").unwrap();
        assert_eq!(display, rfc);

        assert!(parse_date("").is_none());
        assert!(parse_date("yesterday-ish").is_none());
    }
}
