//! Frost intensity derived from the minimum temperature reported by a conventional
//! INMET station.

use std::fmt;

/// Intensity of a frost occurrence.
///
/// Thresholds on the minimum temperature `t` (°C), colder meaning stronger:
///
/// | `t`              | intensity   |
/// |------------------|-------------|
/// | `t < 1.0`        | `Strong`    |
/// | `1.0 <= t < 3.0` | `Moderate`  |
/// | `t >= 3.0`       | `Weak`      |
/// | missing / NaN    | `Undefined` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrostIntensity {
    Strong,
    Moderate,
    Weak,
    Undefined,
}

impl FrostIntensity {
    pub const STRONG_BELOW: f64 = 1.0;
    pub const WEAK_FROM: f64 = 3.0;

    /// # Examples
    ///
    /// ```
    /// use agroclima::FrostIntensity;
    ///
    /// assert_eq!(FrostIntensity::from_min_temperature(Some(-2.0)), FrostIntensity::Strong);
    /// assert_eq!(FrostIntensity::from_min_temperature(Some(1.0)), FrostIntensity::Moderate);
    /// assert_eq!(FrostIntensity::from_min_temperature(Some(3.0)), FrostIntensity::Weak);
    /// assert_eq!(FrostIntensity::from_min_temperature(None), FrostIntensity::Undefined);
    /// ```
    pub fn from_min_temperature(temperature: Option<f64>) -> Self {
        match temperature {
            Some(t) if t.is_nan() => FrostIntensity::Undefined,
            Some(t) if t >= Self::WEAK_FROM => FrostIntensity::Weak,
            Some(t) if t >= Self::STRONG_BELOW => FrostIntensity::Moderate,
            Some(_) => FrostIntensity::Strong,
            None => FrostIntensity::Undefined,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FrostIntensity::Strong => "Forte",
            FrostIntensity::Moderate => "Moderada",
            FrostIntensity::Weak => "Fraca",
            FrostIntensity::Undefined => "Indefinida",
        }
    }
}

impl fmt::Display for FrostIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let cases = [
            (Some(-4.2), FrostIntensity::Strong),
            (Some(0.99), FrostIntensity::Strong),
            (Some(1.0), FrostIntensity::Moderate),
            (Some(2.99), FrostIntensity::Moderate),
            (Some(3.0), FrostIntensity::Weak),
            (Some(5.4), FrostIntensity::Weak),
            (Some(f64::NAN), FrostIntensity::Undefined),
            (None, FrostIntensity::Undefined),
        ];
        for (temperature, expected) in cases {
            assert_eq!(
                FrostIntensity::from_min_temperature(temperature),
                expected,
                "temperature {:?}",
                temperature
            );
        }
    }
}
