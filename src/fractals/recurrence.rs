use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::core::error::ParameterError;

/// One step of an escape-time iteration: `z_next = f(z, c)`.
///
/// Any thread-safe closure `Fn(Complex64, Complex64) -> Complex64` is a valid
/// recurrence, so callers can plug in their own maps without defining a type.
pub trait Recurrence: Sync {
    fn step(&self, z: Complex64, c: Complex64) -> Complex64;
}

impl<F> Recurrence for F
where
    F: Fn(Complex64, Complex64) -> Complex64 + Sync,
{
    fn step(&self, z: Complex64, c: Complex64) -> Complex64 {
        self(z, c)
    }
}

/// Built-in recurrences that can be selected from a parameter file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// z^2 + c, the classic Julia set map.
    Quadratic,
    /// z^exponent + c
    Multibrot { exponent: u32 },
    /// (|Re z| + i |Im z|)^2 + c
    BurningShip,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        RecurrenceRule::Quadratic
    }
}

impl RecurrenceRule {
    pub fn validate(&self) -> Result<(), ParameterError> {
        match self {
            RecurrenceRule::Multibrot { exponent } if *exponent < 2 => {
                Err(ParameterError::invalid_argument(format!(
                    "multibrot exponent must be at least 2, got {}",
                    exponent
                )))
            }
            _ => Ok(()),
        }
    }

    /// Human-readable formula, used in image titles.
    pub fn formula(&self) -> String {
        match self {
            RecurrenceRule::Quadratic => "z^2 + c".to_owned(),
            RecurrenceRule::Multibrot { exponent } => format!("z^{} + c", exponent),
            RecurrenceRule::BurningShip => "(|Re(z)| + i|Im(z)|)^2 + c".to_owned(),
        }
    }
}

impl Recurrence for RecurrenceRule {
    #[inline]
    fn step(&self, z: Complex64, c: Complex64) -> Complex64 {
        match self {
            RecurrenceRule::Quadratic => z * z + c,
            RecurrenceRule::Multibrot { exponent } => z.powu(*exponent) + c,
            RecurrenceRule::BurningShip => {
                let folded = Complex64::new(z.re.abs(), z.im.abs());
                folded * folded + c
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_step() {
        let z = Complex64::new(1.0, 2.0);
        let c = Complex64::new(-0.8, 0.156);
        // (1 + 2i)^2 = -3 + 4i
        let next = RecurrenceRule::Quadratic.step(z, c);
        assert_relative_eq!(next.re, -3.8, epsilon = 1e-12);
        assert_relative_eq!(next.im, 4.156, epsilon = 1e-12);
    }

    #[test]
    fn test_multibrot_matches_repeated_multiplication() {
        let z = Complex64::new(0.3, -0.7);
        let c = Complex64::new(0.1, 0.2);
        let expected = z * z * z + c;
        let actual = RecurrenceRule::Multibrot { exponent: 3 }.step(z, c);
        assert_relative_eq!(actual.re, expected.re, epsilon = 1e-12);
        assert_relative_eq!(actual.im, expected.im, epsilon = 1e-12);

        let quadratic = RecurrenceRule::Multibrot { exponent: 2 }.step(z, c);
        assert_relative_eq!(quadratic.re, (z * z + c).re, epsilon = 1e-12);
        assert_relative_eq!(quadratic.im, (z * z + c).im, epsilon = 1e-12);
    }

    #[test]
    fn test_burning_ship_folds_into_first_quadrant() {
        let c = Complex64::new(0.0, 0.0);
        let z = Complex64::new(-1.0, -2.0);
        // (1 + 2i)^2 = -3 + 4i
        assert_eq!(
            RecurrenceRule::BurningShip.step(z, c),
            Complex64::new(-3.0, 4.0)
        );
    }

    #[test]
    fn test_closures_are_recurrences() {
        let shift = |z: Complex64, c: Complex64| z + c;
        let one = Complex64::new(1.0, 0.0);
        assert_eq!(shift.step(one, one), Complex64::new(2.0, 0.0));
    }

    #[test]
    fn test_validate_and_formula() {
        assert!(RecurrenceRule::Quadratic.validate().is_ok());
        assert!(RecurrenceRule::Multibrot { exponent: 5 }.validate().is_ok());
        assert!(RecurrenceRule::Multibrot { exponent: 1 }.validate().is_err());

        assert_eq!(RecurrenceRule::default().formula(), "z^2 + c");
        assert_eq!(
            RecurrenceRule::Multibrot { exponent: 4 }.formula(),
            "z^4 + c"
        );
    }
}
