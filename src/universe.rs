use crate::{
    constants::SAMPLE_EPSILON,
    error::{Error, Result},
};
use noisy_float::types::R64;

/// Evenly sampled numeric range a linguistic variable is defined over.
///
/// Holds `ceil((max - min) / step) + 1` samples. Sample `i` sits at
/// `min + i * step`, clamped to `max`, so the last sample is always `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    len: usize,
}

impl Universe {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        let invalid = Error::InvalidUniverse { min, max, step };
        let (Some(lower), Some(upper), Some(delta)) =
            (R64::try_new(min), R64::try_new(max), R64::try_new(step))
        else {
            return Err(invalid);
        };
        if lower >= upper || delta <= R64::new(0.0) {
            return Err(invalid);
        }

        // At least one interval so that both `min` and `max` are sampled.
        let intervals = ((max - min) / step - SAMPLE_EPSILON).ceil().max(1.0);
        if !intervals.is_finite() || intervals >= u32::MAX as f64 {
            return Err(invalid);
        }

        Ok(Self {
            min,
            max,
            step,
            len: intervals as usize + 1,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, x: f64) -> bool {
        (self.min..=self.max).contains(&x)
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    pub fn sample(&self, index: usize) -> f64 {
        let Self { min, max, step, .. } = *self;
        (min + index as f64 * step).min(max)
    }

    pub fn samples(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        (0..self.len).map(move |index| self.sample(index))
    }
}
