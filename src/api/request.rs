//! Request types for the shaft sizing API.
//!
//! `POST /size` and `POST /spec` take a [`SizingInput`] body directly;
//! `POST /report` wraps it in a [`ReportRequest`] so the report date can be
//! fixed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::SizingInput;

/// Request body for the `/report` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// The building and shaft to size.
    pub input: SizingInput,
    /// Date printed on the report; today when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExhaustType, FlowModel, SizingMode};

    #[test]
    fn test_deserialize_report_request() {
        let json = r#"{
            "input": {
                "exhaust_type": "clothes_dryers",
                "floors": [
                    {"penetrations": 2, "subduct_size_in": 4, "cfm_per_penetration": 100}
                ],
                "floor_height_ft": 10,
                "sizing": {"mode": "round_user", "diameter_in": 12}
            },
            "date": "2026-03-01"
        }"#;

        let request: ReportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.input.exhaust_type, ExhaustType::ClothesDryers);
        assert_eq!(request.input.sizing, SizingMode::RoundUser { diameter_in: 12.0 });
        assert_eq!(request.input.diversity_pct, 100.0);
        assert_eq!(request.input.max_delta_p, 0.25);
        assert_eq!(request.input.flow_model, FlowModel::Cumulative);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_report_date_is_optional() {
        let json = r#"{
            "input": {
                "exhaust_type": "bathroom_exhaust",
                "floors": [{"penetrations": 1, "cfm_per_penetration": 50}],
                "floor_height_ft": 9.5,
                "sizing": {"mode": "rect_auto"},
                "flow_model": "uniform"
            }
        }"#;

        let request: ReportRequest = serde_json::from_str(json).unwrap();
        assert!(request.date.is_none());
        assert_eq!(request.input.floors[0].subduct_size_in, None);
        assert_eq!(request.input.flow_model, FlowModel::Uniform);
    }
}
