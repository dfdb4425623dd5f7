use serde::Serialize;

use crate::history::PredictionRecord;

/// Summary of the logged predictions.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl Statistics {
    /// Returns [`None`] for an empty history.
    #[must_use]
    pub fn compute(records: &[PredictionRecord]) -> Option<Self> {
        let mut accumulator = Accumulator::default();
        for record in records {
            accumulator.push(record.prediction);
        }
        accumulator.statistics()
    }
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    mean: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;

        // Running mean, it stays finite for any finite predictions.
        let count = self.count as f64;
        self.mean += value / count - self.mean / count;
    }

    fn statistics(&self) -> Option<Statistics> {
        (self.count != 0).then(|| Statistics {
            total: self.count,
            avg: self.mean,
            min: self.min,
            max: self.max,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::Features;

    fn records(predictions: &[f64]) -> Vec<PredictionRecord> {
        predictions
            .iter()
            .map(|&prediction| PredictionRecord {
                timestamp: Utc::now(),
                features: Features::default(),
                prediction,
            })
            .collect()
    }

    #[test]
    fn compute_ok() {
        assert_eq!(
            Statistics::compute(&records(&[1.0, 2.0, 3.0])),
            Some(Statistics {
                total: 3,
                avg: 2.0,
                min: 1.0,
                max: 3.0,
            }),
        );
    }

    #[test]
    fn compute_unordered_ok() {
        let statistics = Statistics::compute(&records(&[4.5, -1.25, 0.5, 10.0]));
        let statistics = statistics.unwrap();
        assert_eq!(statistics.total, 4);
        assert!((statistics.avg - 3.4375).abs() < 1e-12, "avg: {}", statistics.avg);
        assert_eq!(statistics.min, -1.25);
        assert_eq!(statistics.max, 10.0);
    }

    #[test]
    fn compute_huge_ok() -> crate::prelude::Result {
        let statistics = Statistics::compute(&records(&[f64::MAX, f64::MAX])).unwrap();
        assert_eq!(statistics.avg, f64::MAX);

        let statistics = Statistics::compute(&records(&[f64::MAX, -f64::MAX])).unwrap();
        assert_eq!(statistics.avg, 0.0);

        let json = serde_json::to_value(Statistics::compute(&records(&[1e308, 1e308])))?;
        assert_eq!(json["avg"], 1e308);
        Ok(())
    }

    #[test]
    fn compute_single_ok() {
        let statistics = Statistics::compute(&records(&[-0.5]));
        assert_eq!(
            statistics,
            Some(Statistics {
                total: 1,
                avg: -0.5,
                min: -0.5,
                max: -0.5,
            }),
        );
    }

    #[test]
    fn compute_empty_ok() {
        assert_eq!(Statistics::compute(&[]), None);
    }
}
