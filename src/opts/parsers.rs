use std::str::FromStr;

use crate::prelude::*;

pub fn sample_rate(value: &str) -> Result<f32> {
    match f32::from_str(value)? {
        value if (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(anyhow!("expected a number between 0 and 1")),
    }
}

pub fn finite_f64(value: &str) -> Result<f64> {
    match f64::from_str(value)? {
        value if value.is_finite() => Ok(value),
        _ => Err(anyhow!("expected a finite number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_ok() -> Result {
        assert_eq!(sample_rate("0")?, 0.0);
        assert_eq!(sample_rate("1")?, 1.0);
        assert!(sample_rate("-0.1").is_err());
        assert!(sample_rate("NaN").is_err());
        Ok(())
    }

    #[test]
    fn finite_f64_ok() -> Result {
        assert_eq!(finite_f64("-122.23")?, -122.23);
        assert!(finite_f64("inf").is_err());
        assert!(finite_f64("abc").is_err());
        Ok(())
    }
}
