//! Three-axis samples and their magnitudes.

/// One physical quantity (acceleration or angular velocity) on three axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Which axis a channel feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl AxisSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Overwrite one axis.
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    /// Euclidean norm of the sample.
    pub fn magnitude(&self) -> f64 {
        magnitude(self.x, self.y, self.z)
    }
}

/// Euclidean norm of a 3-vector. Non-finite inputs propagate.
pub fn magnitude(x: f64, y: f64, z: f64) -> f64 {
    (x * x + y * y + z * z).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_zero() {
        assert_eq!(magnitude(0.0, 0.0, 0.0), 0.0);
        assert_eq!(AxisSample::default().magnitude(), 0.0);
    }

    #[test]
    fn test_magnitude_pythagorean() {
        assert_eq!(magnitude(3.0, 4.0, 0.0), 5.0);
        assert_eq!(magnitude(2.0, 3.0, 6.0), 7.0);
    }

    #[test]
    fn test_magnitude_negative_components() {
        let m = AxisSample::new(-1.0, -2.0, 2.0).magnitude();
        assert_eq!(m, 3.0);
        assert!(m >= 0.0);
    }

    #[test]
    fn test_magnitude_matches_formula() {
        for (x, y, z) in [(0.1_f64, -9.81_f64, 0.3_f64), (12.5, 0.0, -0.25), (1e-3, 1e3, 7.0)] {
            let expected = (x * x + y * y + z * z).sqrt();
            assert!((magnitude(x, y, z) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_magnitude_propagates_nan() {
        assert!(magnitude(f64::NAN, 0.0, 0.0).is_nan());
        assert!(magnitude(f64::INFINITY, 1.0, 0.0).is_infinite());
    }

    #[test]
    fn test_set_axis() {
        let mut sample = AxisSample::default();
        sample.set(Axis::Y, 2.5);
        sample.set(Axis::Z, -1.0);
        assert_eq!(sample, AxisSample::new(0.0, 2.5, -1.0));
    }
}
