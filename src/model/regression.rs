use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_pickle::DeOptions;

use crate::model::{Features, Model};
use crate::prelude::*;

/// Ordinary least squares model: one coefficient per named feature plus the intercept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: Features,
}

impl LinearRegression {
    /// Loads the model artifact, a pickled dictionary for `.pkl` and `.pickle`, JSON otherwise.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(
            File::open(path)
                .with_context(|| format!("failed to open the model `{}`", path.display()))?,
        );
        let model: Self = match path.extension().and_then(|extension| extension.to_str()) {
            Some("pkl" | "pickle") => serde_pickle::from_reader(reader, DeOptions::new())
                .with_context(|| format!("failed to unpickle the model `{}`", path.display()))?,
            _ => serde_json::from_reader(reader)
                .with_context(|| format!("failed to parse the model `{}`", path.display()))?,
        };
        info!(intercept = model.intercept, "loaded");
        Ok(model)
    }
}

impl Model for LinearRegression {
    fn predict(&self, features: &Features) -> Result<f64> {
        let prediction = self.intercept + dot(&self.coefficients.to_array(), &features.to_array());
        if prediction.is_finite() {
            Ok(prediction)
        } else {
            Err(anyhow!("the model produced a non-finite prediction: {}", prediction))
        }
    }
}

#[must_use]
#[inline]
fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).fold(0.0, |dot, (xi, yi)| dot + xi * yi)
}

#[cfg(test)]
pub mod tests {
    use std::io::Write;

    use serde_pickle::SerOptions;

    use super::*;

    /// Fitted on the full California housing dataset.
    pub fn california() -> LinearRegression {
        LinearRegression {
            intercept: -36.941920207184516,
            coefficients: Features::from_array([
                0.4366932931343245,
                0.009435778033238185,
                -0.10732204139090447,
                0.645065693519812,
                -3.976389421211576e-06,
                -0.003786542654971,
                -0.42131437752714374,
                -0.43451375467477743,
            ]),
        }
    }

    #[test]
    fn predict_ok() -> Result {
        let model = LinearRegression {
            intercept: 1.0,
            coefficients: Features::from_array([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -2.0]),
        };
        let features = Features::from_array([3.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 0.5]);
        assert_eq!(model.predict(&features)?, 3.0);
        Ok(())
    }

    #[test]
    fn predict_example_ok() -> Result {
        let prediction = california().predict(&Features::default())?;
        assert!((prediction - 4.1297).abs() < 0.001, "prediction: {}", prediction);
        Ok(())
    }

    #[test]
    fn predict_overflow_fails() {
        let model = LinearRegression {
            intercept: 0.0,
            coefficients: Features::from_array([f64::MAX; Features::LEN]),
        };
        assert!(model.predict(&Features::from_array([f64::MAX; Features::LEN])).is_err());
    }

    #[test]
    fn load_json_ok() -> Result {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
        file.write_all(serde_json::to_string(&california())?.as_bytes())?;
        assert_eq!(LinearRegression::load(file.path())?, california());
        Ok(())
    }

    #[test]
    fn load_pickle_ok() -> Result {
        let mut file = tempfile::Builder::new().suffix(".pkl").tempfile()?;
        file.write_all(&serde_pickle::to_vec(&california(), SerOptions::new())?)?;
        assert_eq!(LinearRegression::load(file.path())?, california());
        Ok(())
    }

    #[test]
    fn load_bundled_model_ok() -> Result {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("house_model.json");
        assert_eq!(LinearRegression::load(&path)?, california());
        Ok(())
    }

    #[test]
    fn load_missing_fails() {
        assert!(LinearRegression::load(Path::new("definitely/missing.json")).is_err());
    }
}
