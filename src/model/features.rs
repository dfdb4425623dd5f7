use serde::{Deserialize, Serialize};

/// California housing block features, in the order the model was fitted on.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Features {
    pub median_income: f64,
    pub house_age: f64,
    pub avg_rooms: f64,
    pub avg_bedrooms: f64,
    pub population: f64,
    pub avg_occupation: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InvalidFeatures {
    #[error("expected {} features, got {0}", Features::LEN)]
    WrongLength(usize),

    #[error("feature `{name}` must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("malformed request: {0}")]
    Malformed(String),
}

impl Features {
    pub const LEN: usize = 8;

    pub const NAMES: [&'static str; Self::LEN] = [
        "median_income",
        "house_age",
        "avg_rooms",
        "avg_bedrooms",
        "population",
        "avg_occupation",
        "latitude",
        "longitude",
    ];

    /// Used when a caller asks for a prediction without supplying any features.
    pub const EXAMPLE: [f64; Self::LEN] = [8.3252, 41.0, 6.98, 1.02, 322.0, 2.55, 37.88, -122.23];

    #[must_use]
    pub const fn from_array(values: [f64; Self::LEN]) -> Self {
        let [
            median_income,
            house_age,
            avg_rooms,
            avg_bedrooms,
            population,
            avg_occupation,
            latitude,
            longitude,
        ] = values;
        Self {
            median_income,
            house_age,
            avg_rooms,
            avg_bedrooms,
            population,
            avg_occupation,
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub const fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.median_income,
            self.house_age,
            self.avg_rooms,
            self.avg_bedrooms,
            self.population,
            self.avg_occupation,
            self.latitude,
            self.longitude,
        ]
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::from_array(Self::EXAMPLE)
    }
}

impl TryFrom<&[f64]> for Features {
    type Error = InvalidFeatures;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let values: [f64; Self::LEN] = values
            .try_into()
            .map_err(|_| InvalidFeatures::WrongLength(values.len()))?;
        for (name, value) in Self::NAMES.into_iter().zip(values) {
            if !value.is_finite() {
                return Err(InvalidFeatures::NonFinite { name, value });
            }
        }
        Ok(Self::from_array(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_ok() -> crate::prelude::Result {
        let features = Features::try_from(Features::EXAMPLE.as_slice())?;
        assert_eq!(features.median_income, 8.3252);
        assert_eq!(features.longitude, -122.23);
        assert_eq!(features.to_array(), Features::EXAMPLE);
        Ok(())
    }

    #[test]
    fn try_from_wrong_length_fails() {
        let values = [8.3252, 41.0, 6.98, 1.02, 322.0, 2.55, 37.88];
        assert_eq!(
            Features::try_from(values.as_slice()),
            Err(InvalidFeatures::WrongLength(7)),
        );
        assert_eq!(Features::try_from([].as_slice()), Err(InvalidFeatures::WrongLength(0)));
    }

    #[test]
    fn try_from_non_finite_fails() {
        let mut values = Features::EXAMPLE;
        values[6] = f64::INFINITY;
        match Features::try_from(values.as_slice()) {
            Err(InvalidFeatures::NonFinite { name, .. }) => assert_eq!(name, "latitude"),
            result => panic!("unexpected result: {:?}", result),
        }
    }

    #[test]
    fn serialize_named_fields_ok() -> crate::prelude::Result {
        let value = serde_json::to_value(Features::default())?;
        let object = value.as_object().ok_or_else(|| anyhow::anyhow!("expected an object"))?;
        assert_eq!(object.len(), Features::LEN);
        for name in Features::NAMES {
            assert!(object.contains_key(name), "missing `{}`", name);
        }
        Ok(())
    }

    #[test]
    fn deserialize_integers_ok() -> crate::prelude::Result {
        let features: Features = serde_json::from_str(
            // language=JSON
            r#"{
                "median_income": 8.3252,
                "house_age": 41,
                "avg_rooms": 6.98,
                "avg_bedrooms": 1.02,
                "population": 322,
                "avg_occupation": 2.55,
                "latitude": 37.88,
                "longitude": -122.23
            }"#,
        )?;
        assert_eq!(features, Features::default());
        Ok(())
    }
}
