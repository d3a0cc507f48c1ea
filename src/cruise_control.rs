use crate::{
    constants::{DEFAULT_MANUAL_THROTTLE_PERCENT, DEFAULT_TARGET_SPEED_MS, MS_TO_KMH},
    control::{ThrottleController, ThrottleControllerInit},
    error::Result,
    simulation::{CarSimulation, CarSimulationInit, PlantState},
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Throttle chosen by the fuzzy controller.
    Fuzzy,
    /// Fixed throttle percentage.
    Manual(f64),
}

#[derive(Debug, Clone)]
pub struct CruiseControlInit {
    pub throttle_controller: ThrottleControllerInit,
    pub car: CarSimulationInit,
    pub target_speed: f64,
    pub mode: Mode,
}

impl Default for CruiseControlInit {
    fn default() -> Self {
        Self {
            throttle_controller: ThrottleControllerInit::default(),
            car: CarSimulationInit::default(),
            target_speed: DEFAULT_TARGET_SPEED_MS,
            mode: Mode::Fuzzy,
        }
    }
}

impl CruiseControlInit {
    pub fn build(&self) -> Result<CruiseControl> {
        let Self {
            ref throttle_controller,
            ref car,
            target_speed,
            mode,
        } = *self;

        Ok(CruiseControl {
            controller: throttle_controller.build()?,
            car: car.build()?,
            time_sec: 0.0,
            target_speed,
            mode,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub time_sec: f64,
    pub target_speed: f64,
    pub speed_error_kmh: f64,
    pub throttle: f64,
    pub state: PlantState,
}

/// Closes the loop between the throttle controller and the simulated car.
#[derive(Debug, Clone)]
pub struct CruiseControl {
    controller: ThrottleController,
    car: CarSimulation,
    time_sec: f64,
    target_speed: f64,
    mode: Mode,
}

impl CruiseControl {
    pub fn set_target_speed(&mut self, target_speed: f64) {
        self.target_speed = target_speed;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        debug!(?mode, "cruise control mode changed");
        self.mode = mode;
    }

    /// Switches between fuzzy control and the default manual throttle.
    pub fn toggle_mode(&mut self) {
        let mode = match self.mode {
            Mode::Fuzzy => Mode::Manual(DEFAULT_MANUAL_THROTTLE_PERCENT),
            Mode::Manual(_) => Mode::Fuzzy,
        };
        self.set_mode(mode);
    }

    /// One control tick at the car's configured time step.
    pub fn step(&mut self) -> Result<Report> {
        let Self {
            controller,
            car,
            time_sec,
            target_speed,
            mode,
        } = self;

        let current = car.state();
        // The controller's speed universe is in km/h.
        let speed_error_kmh = (*target_speed - current.speed) * MS_TO_KMH;

        let throttle = match *mode {
            Mode::Fuzzy => controller.compute_throttle(speed_error_kmh, current.acceleration)?,
            Mode::Manual(throttle) => throttle,
        };

        let state = car.step(throttle);
        *time_sec += car.time_step_sec();
        car.record(*time_sec, throttle);

        Ok(Report {
            time_sec: *time_sec,
            target_speed: *target_speed,
            speed_error_kmh,
            throttle,
            state,
        })
    }

    /// Runs `duration_sec / dt` ticks, rounded to the nearest whole tick, and
    /// returns the last report.
    pub fn run_for(&mut self, duration_sec: f64) -> Result<Option<Report>> {
        let ticks = (duration_sec / self.car.time_step_sec()).round().max(0.0) as usize;
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step()?);
        }
        Ok(last)
    }

    pub fn reset(&mut self) {
        self.time_sec = 0.0;
        self.car.reset();
    }

    pub fn time_sec(&self) -> f64 {
        self.time_sec
    }

    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn car(&self) -> &CarSimulation {
        &self.car
    }

    pub fn car_mut(&mut self) -> &mut CarSimulation {
        &mut self.car
    }

    pub fn controller(&self) -> &ThrottleController {
        &self.controller
    }
}
