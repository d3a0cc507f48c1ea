use crate::{
    constants::{
        DEFAULT_DRAG_COEFFICIENT, DEFAULT_MASS_KG, DEFAULT_MAX_THROTTLE_FORCE_N,
        DEFAULT_TIME_STEP_SEC,
    },
    error::{Error, Result},
    physics::VehiclePhysics,
};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct CarSimulationInit {
    pub mass: f64,
    pub drag_coefficient: f64,
    pub max_throttle_force: f64,
    pub time_step_sec: f64,
}

impl Default for CarSimulationInit {
    fn default() -> Self {
        Self {
            mass: DEFAULT_MASS_KG,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
            max_throttle_force: DEFAULT_MAX_THROTTLE_FORCE_N,
            time_step_sec: DEFAULT_TIME_STEP_SEC,
        }
    }
}

impl CarSimulationInit {
    pub fn build(&self) -> Result<CarSimulation> {
        let Self {
            mass,
            drag_coefficient,
            max_throttle_force,
            time_step_sec,
        } = *self;

        if !(time_step_sec.is_finite() && time_step_sec > 0.0) {
            return Err(Error::InvalidParameter {
                name: "time_step_sec",
                value: time_step_sec,
            });
        }

        Ok(CarSimulation {
            physics: VehiclePhysics::new(mass, drag_coefficient, max_throttle_force)?,
            time_step_sec,
            state: PlantState::default(),
            history: vec![],
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlantState {
    pub position: f64,
    pub speed: f64,
    pub acceleration: f64,
}

/// One recorded simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time_sec: f64,
    pub position: f64,
    pub speed: f64,
    pub acceleration: f64,
    pub throttle: f64,
}

/// Discrete-time single-axis vehicle driven by a throttle percentage.
#[derive(Debug, Clone)]
pub struct CarSimulation {
    physics: VehiclePhysics,
    time_step_sec: f64,
    state: PlantState,
    history: Vec<Sample>,
}

impl CarSimulation {
    /// Advances the vehicle by `time_delta_sec` with explicit Euler steps.
    ///
    /// The throttle is clamped to `[0, 100]` and speed never drops below zero.
    ///
    /// # Panics
    ///
    /// Panics if `time_delta_sec` is not positive.
    pub fn update(&mut self, throttle_percent: f64, time_delta_sec: f64) -> PlantState {
        assert!(time_delta_sec > 0.0);

        let Self {
            ref physics,
            ref mut state,
            ..
        } = *self;

        let acceleration = physics.acceleration(throttle_percent, state.speed);
        let speed = (state.speed + acceleration * time_delta_sec).max(0.0);
        let position = state.position + speed * time_delta_sec;

        *state = PlantState {
            position,
            speed,
            acceleration,
        };
        trace!(throttle_percent, position, speed, acceleration, "plant step");

        *state
    }

    /// [`Self::update`] with the configured time step.
    pub fn step(&mut self, throttle_percent: f64) -> PlantState {
        self.update(throttle_percent, self.time_step_sec)
    }

    pub fn reset(&mut self) {
        self.state = PlantState::default();
        self.history.clear();
    }

    /// Appends the current state with the throttle as commanded, before the
    /// plant's own clamping.
    pub fn record(&mut self, time_sec: f64, throttle: f64) {
        let PlantState {
            position,
            speed,
            acceleration,
        } = self.state;
        self.history.push(Sample {
            time_sec,
            position,
            speed,
            acceleration,
            throttle,
        });
    }

    pub fn state(&self) -> PlantState {
        self.state
    }

    pub fn history(&self) -> &[Sample] {
        &self.history
    }

    pub fn physics(&self) -> &VehiclePhysics {
        &self.physics
    }

    /// Swaps vehicle parameters without touching the kinematic state.
    pub fn set_physics(&mut self, physics: VehiclePhysics) {
        self.physics = physics;
    }

    pub fn time_step_sec(&self) -> f64 {
        self.time_step_sec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(mass: f64) -> CarSimulation {
        CarSimulationInit {
            mass,
            time_step_sec: 0.1,
            ..Default::default()
        }
        .build()
        .unwrap()
    }

    #[test]
    fn first_step_from_rest() {
        let mut car = car(1000.0);
        let state = car.update(50.0, 0.1);
        assert_eq!(state.acceleration, 2.5);
        assert!((state.speed - 0.25).abs() < 1e-12);
        assert!((state.position - 0.025).abs() < 1e-12);
    }

    #[test]
    fn converges_to_terminal_speed_for_any_mass() {
        for mass in [500.0, 1000.0, 2000.0] {
            let mut car = car(mass);
            for _ in 0..6000 {
                car.step(50.0);
            }
            let state = car.state();
            assert!((state.speed - 50.0).abs() < 1e-3, "mass {mass}: {state:?}");
            assert!(state.acceleration.abs() < 1e-3);
        }
    }

    #[test]
    fn speed_stays_zero_at_rest_without_throttle() {
        let mut car = car(1000.0);
        for dt in [0.001, 0.1, 1.0, 10.0] {
            let state = car.update(0.0, dt);
            assert_eq!(state, PlantState::default());
        }
    }

    #[test]
    fn speed_is_floored_at_zero() {
        let mut car = car(100.0);
        car.update(100.0, 1.0);
        assert!(car.state().speed > 0.0);
        // drag over a huge step would reverse the car
        let state = car.update(0.0, 100.0);
        assert_eq!(state.speed, 0.0);
        assert!(state.acceleration < 0.0);
    }

    #[test]
    fn throttle_is_clamped() {
        let mut over = car(1000.0);
        let mut full = car(1000.0);
        assert_eq!(over.update(250.0, 0.1), full.update(100.0, 0.1));
        let mut under = car(1000.0);
        assert_eq!(under.update(-40.0, 0.1).speed, 0.0);
    }

    #[test]
    fn reset_clears_state_and_history() {
        let mut car = car(1000.0);
        car.step(80.0);
        car.record(0.1, 80.0);
        assert_eq!(car.history().len(), 1);
        car.reset();
        assert_eq!(car.state(), PlantState::default());
        assert!(car.history().is_empty());
    }

    #[test]
    fn record_keeps_commanded_throttle() {
        let mut car = car(1000.0);
        car.step(150.0);
        car.record(0.1, 150.0);
        assert_eq!(car.history()[0].throttle, 150.0);
        assert_eq!(car.history()[0].speed, car.state().speed);
    }

    #[test]
    fn set_physics_keeps_state() {
        let mut car = car(1000.0);
        car.step(100.0);
        let before = car.state();
        car.set_physics(VehiclePhysics::new(1500.0, 60.0, 8000.0).unwrap());
        assert_eq!(car.state(), before);
        assert_eq!(car.physics().mass(), 1500.0);
    }

    #[test]
    #[should_panic]
    fn non_positive_time_step_panics() {
        car(1000.0).update(10.0, 0.0);
    }

    #[test]
    fn invalid_time_step_is_rejected_at_build() {
        let init = CarSimulationInit {
            time_step_sec: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            init.build(),
            Err(Error::InvalidParameter {
                name: "time_step_sec",
                ..
            })
        ));
    }
}
