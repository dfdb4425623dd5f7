use serde::{Deserialize, Serialize};

use crate::helpers::deserialize_timestamp;
use crate::model::Features;
use crate::prelude::*;

/// Single logged prediction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime,

    pub features: Features,

    /// Predicted median house value, in `$100,000s`.
    pub prediction: f64,
}

impl PredictionRecord {
    pub const UNIT: &'static str = "$100,000s";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_legacy_record_ok() -> Result {
        let record: PredictionRecord = serde_json::from_str(
            // language=JSON
            r#"{
                "timestamp": "2025-01-12T18:04:51.331842",
                "features": {
                    "median_income": 8.3252,
                    "house_age": 41.0,
                    "avg_rooms": 6.98,
                    "avg_bedrooms": 1.02,
                    "population": 322,
                    "avg_occupation": 2.55,
                    "latitude": 37.88,
                    "longitude": -122.23
                },
                "prediction": 4.151943
            }"#,
        )?;
        assert_eq!(record.timestamp.to_rfc3339(), "2025-01-12T18:04:51.331842+00:00");
        assert_eq!(record.features, Features::default());
        assert_eq!(record.prediction, 4.151943);
        Ok(())
    }

    #[test]
    fn parse_invalid_timestamp_fails() {
        let result = serde_json::from_str::<PredictionRecord>(
            // language=JSON
            r#"{"timestamp": "now", "features": {}, "prediction": 1.0}"#,
        );
        assert!(result.is_err());
    }
}
