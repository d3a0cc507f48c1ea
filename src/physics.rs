use crate::error::{Error, Result};
use noisy_float::types::{r64, R64};

/// Longitudinal model of the vehicle: throttle force against linear drag.
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePhysics {
    mass: f64,
    drag_coefficient: f64,
    max_throttle_force: f64,
}

impl VehiclePhysics {
    pub fn new(mass: f64, drag_coefficient: f64, max_throttle_force: f64) -> Result<Self> {
        let is_valid = |value: f64, allow_zero: bool| match R64::try_new(value) {
            Some(value) if allow_zero => value >= r64(0.0),
            Some(value) => value > r64(0.0),
            None => false,
        };

        if !is_valid(mass, false) {
            return Err(Error::InvalidParameter {
                name: "mass",
                value: mass,
            });
        }
        if !is_valid(drag_coefficient, true) {
            return Err(Error::InvalidParameter {
                name: "drag_coefficient",
                value: drag_coefficient,
            });
        }
        if !is_valid(max_throttle_force, true) {
            return Err(Error::InvalidParameter {
                name: "max_throttle_force",
                value: max_throttle_force,
            });
        }

        Ok(Self {
            mass,
            drag_coefficient,
            max_throttle_force,
        })
    }

    /// Drive force for a throttle in percent, clamped to `[0, 100]`.
    pub fn drive_force(&self, throttle_percent: f64) -> f64 {
        throttle_percent.clamp(0.0, 100.0) / 100.0 * self.max_throttle_force
    }

    pub fn drag_force(&self, speed: f64) -> f64 {
        self.drag_coefficient * speed
    }

    pub fn acceleration(&self, throttle_percent: f64, speed: f64) -> f64 {
        let Self { mass, .. } = *self;
        (self.drive_force(throttle_percent) - self.drag_force(speed)) / mass
    }

    /// Speed at which drag balances the drive force of a constant throttle.
    /// Does not depend on mass.
    pub fn terminal_speed(&self, throttle_percent: f64) -> f64 {
        let drive_force = self.drive_force(throttle_percent);
        if drive_force == 0.0 {
            0.0
        } else {
            drive_force / self.drag_coefficient
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn max_throttle_force(&self) -> f64 {
        self.max_throttle_force
    }
}
