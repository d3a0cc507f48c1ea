use crate::{
    error::{Error, Result},
    universe::Universe,
};
use noisy_float::types::R64;

/// Shape of a fuzzy set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MembershipFunction {
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    /// Triangle rising on `[a, b]` and falling on `[b, c]`.
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self> {
        check_points("triangular", &[a, b, c])?;
        Ok(Self::Triangular { a, b, c })
    }

    /// Trapezoid rising on `[a, b]`, flat on `[b, c]` and falling on `[c, d]`.
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        check_points("trapezoidal", &[a, b, c, d])?;
        Ok(Self::Trapezoidal { a, b, c, d })
    }

    /// Degree of membership of `x`, always within `[0, 1]`.
    ///
    /// The peak is tested before the feet, so a degenerate slope (`a == b` or
    /// `c == d`) becomes a step that still reaches 1 at the peak itself.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => {
                if x == b {
                    1.0
                } else if x <= a || x >= c {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Self::Trapezoidal { a, b, c, d } => {
                if b <= x && x <= c {
                    1.0
                } else if x <= a || x >= d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }

    /// Outer feet of the set; the degree is zero outside this interval.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangular { a, c, .. } => (a, c),
            Self::Trapezoidal { a, d, .. } => (a, d),
        }
    }

    /// Interval on which the degree is exactly one.
    pub fn peak(&self) -> (f64, f64) {
        match *self {
            Self::Triangular { b, .. } => (b, b),
            Self::Trapezoidal { b, c, .. } => (b, c),
        }
    }

    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe.samples().map(|x| self.degree(x)).collect()
    }
}

fn check_points(shape: &'static str, points: &[f64]) -> Result<()> {
    let invalid = || Error::InvalidMembershipShape {
        shape,
        points: points.to_vec(),
    };

    let checked: Vec<R64> = points
        .iter()
        .map(|&p| R64::try_new(p))
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;

    if checked.windows(2).all(|pair| pair[0] <= pair[1]) {
        Ok(())
    } else {
        Err(invalid())
    }
}
