use num_traits::Float;
use std::ops::{Add, Mul, Sub};

use crate::core::error::ParameterError;

/// Blends two values given a fraction `alpha` on [0, 1].
pub trait Interpolator<T, V>
where
    T: Float,
    V: Copy + Add<Output = V> + Sub<Output = V> + Mul<T, Output = V>,
{
    fn interpolate(&self, alpha: T, a: &V, b: &V) -> V;
}

/// Linear interpolation: a + (b - a) * alpha
#[derive(Default, Debug, Clone, Copy)]
pub struct LinearInterpolator;

impl<T, V> Interpolator<T, V> for LinearInterpolator
where
    T: Float,
    V: Copy + Add<Output = V> + Sub<Output = V> + Mul<T, Output = V>,
{
    fn interpolate(&self, alpha: T, a: &V, b: &V) -> V {
        *a + (*b - *a) * alpha
    }
}

/// Pairs an input (query) on [0, 1] with the output at that location.
#[derive(Clone, Copy, Debug)]
pub struct InterpolationKeyframe<T, V> {
    pub input: T,
    pub output: V,
}

/// Piecewise interpolation between keyframes spanning the unit interval.
/// Queries outside of [0, 1] are clamped to the end keyframes.
#[derive(Debug, Clone)]
pub struct KeyframeInterpolator<T, V, F> {
    queries: Vec<T>,
    values: Vec<V>,
    interpolator: F,
}

impl<T, V, F> KeyframeInterpolator<T, V, F>
where
    T: Float,
    V: Copy + Add<Output = V> + Sub<Output = V> + Mul<T, Output = V>,
    F: Interpolator<T, V>,
{
    /// Keyframe inputs must start at exactly 0, end at exactly 1, and be
    /// strictly increasing in between.
    pub fn new(
        keyframes: &[InterpolationKeyframe<T, V>],
        interpolator: F,
    ) -> Result<Self, ParameterError> {
        let (first, last) = match (keyframes.first(), keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ParameterError::invalid_argument("keyframes must not be empty")),
        };
        if first.input != T::zero() {
            return Err(ParameterError::invalid_argument(
                "first keyframe input must be 0.0",
            ));
        }
        if last.input != T::one() {
            return Err(ParameterError::invalid_argument(
                "last keyframe input must be 1.0",
            ));
        }
        if keyframes.windows(2).any(|pair| pair[0].input >= pair[1].input) {
            return Err(ParameterError::invalid_argument(
                "keyframe inputs must be strictly increasing",
            ));
        }

        Ok(Self {
            queries: keyframes.iter().map(|k| k.input).collect(),
            values: keyframes.iter().map(|k| k.output).collect(),
            interpolator,
        })
    }

    pub fn evaluate(&self, query: T) -> V {
        // `new` guarantees at least two keyframes: one at 0 and one at 1.
        let last = self.values.len() - 1;
        if query <= T::zero() {
            return self.values[0];
        }
        if query >= T::one() {
            return self.values[last];
        }
        let idx_upp = self.queries.partition_point(|q| query >= *q);
        let idx_low = idx_upp - 1;
        let q_low = self.queries[idx_low];
        let alpha = (query - q_low) / (self.queries[idx_upp] - q_low);
        self.interpolator
            .interpolate(alpha, &self.values[idx_low], &self.values[idx_upp])
    }
}
