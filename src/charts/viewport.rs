//! Viewport Module
//! The visible min/max range of a chart's horizontal axis.

use serde::{Deserialize, Serialize};

/// Equality slack for bounds that round-trip through the plot transform.
const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub min: f64,
    pub max: f64,
}

impl Viewport {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn approx_eq(&self, other: Viewport) -> bool {
        (self.min - other.min).abs() < EPS && (self.max - other.max).abs() < EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width() {
        assert_eq!(Viewport::new(10.0, 20.0).width(), 10.0);
    }

    #[test]
    fn test_approx_eq_tolerates_round_trip_noise() {
        let base = Viewport::new(10.0, 20.0);
        assert!(base.approx_eq(Viewport::new(10.0 + 1e-12, 20.0 - 1e-12)));
        assert!(!base.approx_eq(Viewport::new(10.0, 21.0)));
        assert!(!base.approx_eq(Viewport::new(11.0, 20.0)));
    }
}
