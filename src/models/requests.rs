//! Request DTOs for the report backend
//!
//! Defines the outgoing shapes: a report submission and the recent-list
//! filter set.

use crate::params::Params;

// == Submission Draft ==
/// A delivery report to be submitted.
///
/// # Fields
/// - `route`: route identifier the report belongs to
/// - `sequence`: ordered stop names; joined with `>` on the wire
/// - `total_km`: total distance driven
/// - `driver_id` / `driver_name`: who drove
/// - `shift`: free-form shift label
/// - `report_date`: report date as the backend expects it (`YYYY-MM-DD`)
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDraft {
    pub route: String,
    pub sequence: Vec<String>,
    pub total_km: f64,
    pub driver_id: String,
    pub driver_name: String,
    pub shift: String,
    pub report_date: String,
}

impl SubmissionDraft {
    /// Validates the draft before it goes on the wire.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.route.is_empty() {
            return Some("Route cannot be empty".to_string());
        }
        if !self.total_km.is_finite() || self.total_km < 0.0 {
            return Some("Total distance must be a non-negative number".to_string());
        }
        None
    }

    /// Renders the draft as the backend's form field set.
    pub(crate) fn to_form(&self) -> Params {
        Params::new()
            .set("route", self.route.as_str())
            .set("sequence", self.sequence.join(">"))
            .set("totalKm", self.total_km)
            .set("driverId", self.driver_id.as_str())
            .set("driverName", self.driver_name.as_str())
            .set("shift", self.shift.as_str())
            .set("reportDate", self.report_date.as_str())
    }
}

// == Recent Filter ==
/// Filter set for recent-submission listings.
///
/// `route` may be empty to cover all routes. The optional date-range,
/// driver and shift filters are omitted from the request (and the cache
/// key) entirely when unset.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentFilter {
    pub route: String,
    pub limit: u32,
    pub from: Option<String>,
    pub to: Option<String>,
    pub driver: Option<String>,
    pub shift: Option<String>,
}

impl Default for RecentFilter {
    fn default() -> Self {
        Self {
            route: String::new(),
            limit: 4,
            from: None,
            to: None,
            driver: None,
            shift: None,
        }
    }
}

impl RecentFilter {
    /// The common case: latest submissions for one route.
    pub fn for_route(route: impl Into<String>, limit: u32) -> Self {
        Self {
            route: route.into(),
            limit,
            ..Self::default()
        }
    }

    /// Renders the filter as request parameters.
    pub(crate) fn to_params(&self) -> Params {
        Params::new()
            .set("fn", "recent")
            .set("route", self.route.as_str())
            .set("limit", self.limit)
            .set_opt("from", self.from.as_deref())
            .set_opt("to", self.to.as_deref())
            .set_opt("driver", self.driver.as_deref())
            .set_opt("shift", self.shift.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> SubmissionDraft {
        SubmissionDraft {
            route: "1".to_string(),
            sequence: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            total_km: 12.5,
            driver_id: "d1".to_string(),
            driver_name: "Max Muster".to_string(),
            shift: "early".to_string(),
            report_date: "2025-06-01".to_string(),
        }
    }

    #[test]
    fn test_draft_form_joins_sequence() {
        let form = draft().to_form();
        let pairs = form.to_pairs();
        assert!(pairs.contains(&("sequence".to_string(), "A>B>C".to_string())));
        assert!(pairs.contains(&("totalKm".to_string(), "12.5".to_string())));
        assert!(pairs.contains(&("reportDate".to_string(), "2025-06-01".to_string())));
    }

    #[test]
    fn test_draft_empty_sequence_renders_empty() {
        let mut d = draft();
        d.sequence.clear();
        let pairs = d.to_form().to_pairs();
        assert!(pairs.contains(&("sequence".to_string(), String::new())));
    }

    #[test]
    fn test_validate_empty_route() {
        let mut d = draft();
        d.route.clear();
        assert!(d.validate().is_some());
    }

    #[test]
    fn test_validate_negative_distance() {
        let mut d = draft();
        d.total_km = -3.0;
        assert!(d.validate().is_some());

        d.total_km = f64::NAN;
        assert!(d.validate().is_some());
    }

    #[test]
    fn test_validate_valid_draft() {
        assert!(draft().validate().is_none());
    }

    #[test]
    fn test_filter_key_shape_for_route_and_limit() {
        let filter = RecentFilter::for_route("1", 4);
        assert_eq!(filter.to_params().encode(), "fn=recent&limit=4&route=1");
    }

    #[test]
    fn test_filter_optional_fields_omitted() {
        let filter = RecentFilter {
            from: Some("2025-05-30".to_string()),
            ..RecentFilter::for_route("", 50)
        };
        assert_eq!(
            filter.to_params().encode(),
            "fn=recent&from=2025-05-30&limit=50&route="
        );
    }
}
