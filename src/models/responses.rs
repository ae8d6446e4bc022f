//! Response DTOs for the report backend
//!
//! The backend's sheet-backed storage is loosely typed: numbers arrive as
//! numbers or locale-formatted strings, timestamps as epoch millis or date
//! strings. These models absorb that with defaulted fields and typed
//! accessor helpers, so one odd record never sinks a whole listing.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Submission ==
/// One submitted delivery report, as listed by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    /// Submission instant: epoch millis, a date string, or absent
    #[serde(default)]
    pub timestamp: Value,
    /// Report date as entered, if any
    #[serde(default)]
    pub report_date: Option<String>,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub driver_id: String,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub shift: String,
    /// Distance: a number, or a string possibly using a comma decimal
    #[serde(default)]
    pub total_km: Value,
    /// Stop sequence: newline-separated, or legacy `>` / ` - ` separators
    #[serde(default)]
    pub sequence_names: String,
}

impl Submission {
    // == Distance ==
    /// Distance in kilometres; tolerates comma decimals, defaults to 0.
    pub fn distance_km(&self) -> f64 {
        match &self.total_km {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().replace(',', ".").parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    // == Recorded At ==
    /// Best-effort submission instant: the `timestamp` field first, then
    /// the report date.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.timestamp).or_else(|| {
            self.report_date
                .as_deref()
                .and_then(|s| parse_instant(&Value::String(s.to_string())))
        })
    }

    // == Sequence Stops ==
    /// Stop names in driven order, whichever separator the record uses.
    pub fn sequence_stops(&self) -> Vec<String> {
        let text = self.sequence_names.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let legacy;
        let parts: Vec<&str> = if text.contains('\n') {
            text.split('\n').collect()
        } else {
            legacy = text.replace(" - ", ">");
            legacy.split('>').collect()
        };

        parts
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Interprets a JSON scalar as an instant the way the backend emits them.
fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) if !s.trim().is_empty() => {
            let s = s.trim();
            if let Ok(ms) = s.parse::<i64>() {
                return Utc.timestamp_millis_opt(ms).single();
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| Utc.from_utc_datetime(&dt))
        }
        _ => None,
    }
}

// == Driver ==
/// A driver usable in submission forms and filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Driver {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}
