use crate::rng::RandomSource;
use crate::time;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::RangeInclusive;

const CONFIDENCE_RANGE: RangeInclusive<i64> = 50..=95;
const TRENDS: [Trend; 3] = [Trend::Up, Trend::Down, Trend::Neutral];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub topic: Option<String>,
    pub category: Option<String>,
    pub timeframe: Option<String>,

    // Passthrough fields of arbitrary shape, echoed back unmodified.
    #[serde(default)]
    pub prediction: Option<Value>,
    #[serde(default)]
    pub data_points: Option<Value>,
    #[serde(default)]
    pub variables: Option<Value>,
    #[serde(default)]
    pub historical_patterns: Option<Value>,
    #[serde(default)]
    pub alternative_scenarios: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub topic: String,
    pub category: String,
    pub timeframe: String,
    pub prediction: Option<Value>,
    pub confidence: i64,
    pub trend: Trend,
    pub data_points: Option<Value>,
    pub variables: Option<Value>,
    pub historical_patterns: Option<Value>,
    pub alternative_scenarios: Option<Value>,
    pub last_updated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

// Returns None when any required field is absent or empty.
pub fn generate<Tz>(
    req: PredictionRequest,
    rng: &dyn RandomSource,
    now: &DateTime<Tz>,
) -> Option<Prediction>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let PredictionRequest {
        topic,
        category,
        timeframe,
        prediction,
        data_points,
        variables,
        historical_patterns,
        alternative_scenarios,
    } = req;

    let topic = non_empty(topic)?;
    let category = non_empty(category)?;
    let timeframe = non_empty(timeframe)?;

    let confidence = rng.int_in_range(CONFIDENCE_RANGE);
    let trend = TRENDS[rng.pick_index(TRENDS.len())];

    Some(Prediction {
        topic,
        category,
        timeframe,
        prediction,
        confidence,
        trend,
        data_points,
        variables,
        historical_patterns,
        alternative_scenarios,
        last_updated: time::human_stamp(now),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    struct FixedRandom {
        value: i64,
        index: usize,
    }

    impl RandomSource for FixedRandom {
        fn int_in_range(&self, _range: RangeInclusive<i64>) -> i64 {
            self.value
        }

        fn pick_index(&self, _len: usize) -> usize {
            self.index
        }
    }

    fn full_request() -> PredictionRequest {
        serde_json::from_value(json!({
            "topic": "interest rates",
            "category": "finance",
            "timeframe": "6 months",
            "prediction": "rates hold",
            "dataPoints": [1, 2, 3],
            "variables": {"cpi": 3.1},
            "historicalPatterns": ["hike", "pause"],
            "alternativeScenarios": null,
        }))
        .unwrap()
    }

    #[test]
    fn rejects_missing_required_fields() {
        let now = Utc.with_ymd_and_hms(2026, 2, 5, 15, 4, 0).unwrap();
        let rng = FixedRandom { value: 60, index: 0 };

        for field in ["topic", "category", "timeframe"] {
            let mut body = json!({
                "topic": "a",
                "category": "b",
                "timeframe": "c",
            });
            body.as_object_mut().unwrap().remove(field);
            let req: PredictionRequest = serde_json::from_value(body).unwrap();
            assert!(generate(req, &rng, &now).is_none(), "missing {field}");
        }
    }

    #[test]
    fn rejects_empty_required_fields() {
        let now = Utc.with_ymd_and_hms(2026, 2, 5, 15, 4, 0).unwrap();
        let rng = FixedRandom { value: 60, index: 0 };

        let req: PredictionRequest = serde_json::from_value(json!({
            "topic": "",
            "category": "b",
            "timeframe": "c",
        }))
        .unwrap();
        assert!(generate(req, &rng, &now).is_none());
    }

    #[test]
    fn echoes_passthrough_fields_and_stamps_generated_ones() {
        let now = Utc.with_ymd_and_hms(2026, 2, 5, 15, 4, 0).unwrap();
        let rng = FixedRandom { value: 61, index: 2 };

        let out = generate(full_request(), &rng, &now).unwrap();
        assert_eq!(out.topic, "interest rates");
        assert_eq!(out.category, "finance");
        assert_eq!(out.timeframe, "6 months");
        assert_eq!(out.prediction, Some(json!("rates hold")));
        assert_eq!(out.data_points, Some(json!([1, 2, 3])));
        assert_eq!(out.variables, Some(json!({"cpi": 3.1})));
        assert_eq!(out.historical_patterns, Some(json!(["hike", "pause"])));
        assert_eq!(out.alternative_scenarios, None);
        assert_eq!(out.confidence, 61);
        assert_eq!(out.trend, Trend::Neutral);
        assert_eq!(out.last_updated, "Feb 05, 2026, 03:04 PM");
    }

    #[test]
    fn trend_table_matches_picked_index() {
        let now = Utc.with_ymd_and_hms(2026, 2, 5, 15, 4, 0).unwrap();
        for (index, expected) in [(0, Trend::Up), (1, Trend::Down), (2, Trend::Neutral)] {
            let rng = FixedRandom { value: 50, index };
            let out = generate(full_request(), &rng, &now).unwrap();
            assert_eq!(out.trend, expected);
        }
    }

    #[test]
    fn confidence_stays_in_bounds_with_live_rng() {
        let now = Utc.with_ymd_and_hms(2026, 2, 5, 15, 4, 0).unwrap();
        let rng = crate::rng::ThreadRngSource;
        for _ in 0..50 {
            let out = generate(full_request(), &rng, &now).unwrap();
            assert!((50..=95).contains(&out.confidence));
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let now = Utc.with_ymd_and_hms(2026, 2, 5, 15, 4, 0).unwrap();
        let rng = FixedRandom { value: 70, index: 0 };
        let value = serde_json::to_value(generate(full_request(), &rng, &now).unwrap()).unwrap();

        assert_eq!(value["trend"], json!("up"));
        assert_eq!(value["dataPoints"], json!([1, 2, 3]));
        assert_eq!(value["lastUpdated"], json!("Feb 05, 2026, 03:04 PM"));
        // Absent passthrough fields serialize as null, not as missing keys.
        assert!(value.as_object().unwrap().contains_key("alternativeScenarios"));
        assert_eq!(value["alternativeScenarios"], Value::Null);
    }
}
