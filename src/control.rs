use crate::{
    constants::{
        ACCELERATION_RANGE_MS2, DEFAULT_RESOLUTION, SPEED_ERROR_RANGE_KMH, THROTTLE_RANGE_PERCENT,
    },
    engine::{ControlSystem, Inference, Inputs, Outputs},
    error::{Error, Result},
    membership::MembershipFunction,
    rule::{Antecedent, Rule},
    universe::Universe,
    variable::LinguisticVariable,
};
use std::{num::NonZeroUsize, panic, thread};

pub const SPEED_ERROR: &str = "speed_error";
pub const ACCELERATION: &str = "acceleration";
pub const THROTTLE: &str = "throttle";

/// Clamps crisp inputs into their universes before running the engine.
#[derive(Debug, Clone)]
pub struct Controller {
    system: ControlSystem,
}

impl Controller {
    pub fn new(system: ControlSystem) -> Self {
        Self { system }
    }

    pub fn system(&self) -> &ControlSystem {
        &self.system
    }

    /// Copy of `inputs` with every known input variable clamped to its
    /// universe. Unknown names pass through untouched.
    pub fn clamp_inputs(&self, inputs: &Inputs) -> Inputs {
        inputs
            .iter()
            .map(|(name, value)| match self.system.variable(name) {
                Some(var) => (name, var.universe().clamp(value)),
                None => (name, value),
            })
            .collect()
    }

    pub fn compute(&self, inputs: &Inputs) -> Result<Outputs> {
        self.system.evaluate(&self.clamp_inputs(inputs))
    }

    pub fn inspect(&self, inputs: &Inputs) -> Result<Inference> {
        self.system.infer(&self.clamp_inputs(inputs))
    }

    /// Evaluates `output` over the grid `x_values` × `y_values`. Rows are split
    /// into contiguous chunks, one scoped thread per available core. `fixed`
    /// supplies any other inputs the rules need.
    pub fn control_surface(
        &self,
        (x_name, x_values): (&str, &[f64]),
        (y_name, y_values): (&str, &[f64]),
        output: &str,
        fixed: &Inputs,
    ) -> Result<ControlSurface> {
        if self.system.output_variables().all(|var| var.name() != output) {
            return Err(Error::UnknownVariable(output.to_string()));
        }

        let row = |y: f64| -> Result<Vec<f64>> {
            x_values
                .iter()
                .map(|&x| {
                    let inputs = fixed.clone().with(x_name, x).with(y_name, y);
                    let outputs = self.compute(&inputs)?;
                    outputs
                        .get(output)
                        .ok_or_else(|| Error::UnknownVariable(output.to_string()))
                })
                .collect()
        };

        let rows =
            |ys: &[f64]| -> Result<Vec<Vec<f64>>> { ys.iter().map(|&y| row(y)).collect() };
        let rows = &rows;

        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let chunk_len = y_values.len().div_ceil(workers).max(1);

        let values = thread::scope(|scope| -> Result<Vec<Vec<f64>>> {
            let handles: Vec<_> = y_values
                .chunks(chunk_len)
                .map(|ys| scope.spawn(move || rows(ys)))
                .collect();
            let mut values = Vec::with_capacity(y_values.len());
            for handle in handles {
                values.extend(handle.join().unwrap_or_else(|err| panic::resume_unwind(err))?);
            }
            Ok(values)
        })?;

        Ok(ControlSurface {
            x_values: x_values.to_vec(),
            y_values: y_values.to_vec(),
            values,
        })
    }
}

/// Output sampled over a 2-D input grid; `values[j][i]` belongs to
/// `(x_values[i], y_values[j])`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSurface {
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl ControlSurface {
    pub fn get(&self, x_index: usize, y_index: usize) -> Option<f64> {
        self.values.get(y_index)?.get(x_index).copied()
    }
}

/// Sampling steps of the throttle controller universes.
#[derive(Debug, Clone)]
pub struct ThrottleControllerInit {
    pub speed_error_step: f64,
    pub acceleration_step: f64,
    pub throttle_step: f64,
}

impl Default for ThrottleControllerInit {
    fn default() -> Self {
        Self {
            speed_error_step: DEFAULT_RESOLUTION,
            acceleration_step: DEFAULT_RESOLUTION,
            throttle_step: DEFAULT_RESOLUTION,
        }
    }
}

impl ThrottleControllerInit {
    pub fn build(&self) -> Result<ThrottleController> {
        let Self {
            speed_error_step,
            acceleration_step,
            throttle_step,
        } = *self;

        let tri = MembershipFunction::triangular;
        let trap = MembershipFunction::trapezoidal;

        let (min, max) = SPEED_ERROR_RANGE_KMH;
        let speed_error = LinguisticVariable::input(
            SPEED_ERROR,
            Universe::new(min, max, speed_error_step)?,
        )
        .with_term("negative_large", trap(-30.0, -30.0, -20.0, -10.0)?)?
        .with_term("negative_small", tri(-15.0, -5.0, 0.0)?)?
        .with_term("zero", tri(-5.0, 0.0, 5.0)?)?
        .with_term("positive_small", tri(0.0, 5.0, 15.0)?)?
        .with_term("positive_large", trap(10.0, 20.0, 30.0, 30.0)?)?;

        let (min, max) = ACCELERATION_RANGE_MS2;
        let acceleration = LinguisticVariable::input(
            ACCELERATION,
            Universe::new(min, max, acceleration_step)?,
        )
        .with_term("negative", trap(-10.0, -10.0, -5.0, 0.0)?)?
        .with_term("zero", tri(-3.0, 0.0, 3.0)?)?
        .with_term("positive", trap(0.0, 5.0, 10.0, 10.0)?)?;

        let (min, max) = THROTTLE_RANGE_PERCENT;
        let throttle =
            LinguisticVariable::output(THROTTLE, Universe::new(min, max, throttle_step)?)
                .with_term("very_low", trap(0.0, 0.0, 10.0, 20.0)?)?
                .with_term("low", tri(10.0, 25.0, 40.0)?)?
                .with_term("medium", tri(30.0, 50.0, 70.0)?)?
                .with_term("high", tri(60.0, 75.0, 90.0)?)?
                .with_term("very_high", trap(80.0, 90.0, 100.0, 100.0)?)?;

        let error = |term: &str| Antecedent::is(SPEED_ERROR, term);
        let accel = |term: &str| Antecedent::is(ACCELERATION, term);
        let rule = |antecedent: Antecedent, term: &str| Rule::new(antecedent, THROTTLE, term);

        let rules = [
            // too fast: back off
            rule(error("negative_large"), "very_low"),
            rule(error("negative_small").and(accel("negative")), "very_low"),
            rule(error("negative_small").and(accel("zero")), "low"),
            rule(error("negative_small").and(accel("positive")), "medium"),
            // on target: hold
            rule(error("zero").and(accel("negative")), "low"),
            rule(error("zero").and(accel("zero")), "medium"),
            rule(error("zero").and(accel("positive")), "medium"),
            // too slow: push
            rule(error("positive_small").and(accel("negative")), "medium"),
            rule(error("positive_small").and(accel("zero")), "high"),
            rule(error("positive_small").and(accel("positive")), "medium"),
            rule(error("positive_large").and(accel("negative")), "very_high"),
            rule(
                error("positive_large").and(accel("zero").or(accel("positive"))),
                "very_high",
            ),
        ];

        let system = ControlSystem::builder()
            .variable(speed_error)?
            .variable(acceleration)?
            .variable(throttle)?
            .rules(rules)?
            .build()?;

        Ok(ThrottleController {
            controller: Controller::new(system),
        })
    }
}

/// Maps speed error (km/h) and acceleration (m/s²) to a throttle percentage.
#[derive(Debug, Clone)]
pub struct ThrottleController {
    controller: Controller,
}

impl ThrottleController {
    pub fn compute_throttle(&self, speed_error_kmh: f64, acceleration: f64) -> Result<f64> {
        self.controller
            .compute(&Self::inputs(speed_error_kmh, acceleration))?
            .get(THROTTLE)
            .ok_or_else(|| Error::UnknownVariable(THROTTLE.to_string()))
    }

    pub fn inspect(&self, speed_error_kmh: f64, acceleration: f64) -> Result<Inference> {
        self.controller
            .inspect(&Self::inputs(speed_error_kmh, acceleration))
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    fn inputs(speed_error_kmh: f64, acceleration: f64) -> Inputs {
        Inputs::new()
            .with(SPEED_ERROR, speed_error_kmh)
            .with(ACCELERATION, acceleration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ThrottleController {
        ThrottleControllerInit::default().build().unwrap()
    }

    #[test]
    fn holds_medium_throttle_on_target() {
        let throttle = controller().compute_throttle(0.0, 0.0).unwrap();
        assert!((throttle - 50.0).abs() < 1e-9, "throttle = {throttle}");
    }

    #[test]
    fn throttle_follows_speed_error() {
        let ctrl = controller();
        let throttle = |error| ctrl.compute_throttle(error, 0.0).unwrap();
        assert!(throttle(-25.0) < 20.0);
        assert!(throttle(-10.0) < throttle(0.0));
        assert!(throttle(0.0) < throttle(10.0));
        assert!(throttle(25.0) > 80.0);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let ctrl = controller();
        assert_eq!(
            ctrl.compute_throttle(80.0, 0.0).unwrap(),
            ctrl.compute_throttle(30.0, 0.0).unwrap()
        );
        assert_eq!(
            ctrl.compute_throttle(-5.0, -40.0).unwrap(),
            ctrl.compute_throttle(-5.0, -10.0).unwrap()
        );
    }

    #[test]
    fn inspect_reports_fuzzified_inputs() {
        let inference = controller().inspect(15.0, -2.0).unwrap();
        let error = &inference.fuzzified[SPEED_ERROR];
        assert_eq!(error["positive_large"], 0.5);
        assert_eq!(error["positive_small"], 0.0);
        assert_eq!(inference.firing_strengths.len(), 12);
        assert_eq!(inference.aggregated[THROTTLE].grid.len(), 101);
    }

    #[test]
    fn finer_resolution_changes_output() {
        let coarse = ThrottleControllerInit {
            throttle_step: 10.0,
            ..Default::default()
        }
        .build()
        .unwrap();
        let fine = ThrottleControllerInit {
            throttle_step: 0.1,
            ..Default::default()
        }
        .build()
        .unwrap();
        let coarse = coarse.compute_throttle(7.0, 1.0).unwrap();
        let fine = fine.compute_throttle(7.0, 1.0).unwrap();
        assert!((coarse - fine).abs() > 1e-6);
        assert!((coarse - fine).abs() < 10.0);
    }

    #[test]
    fn control_surface_matches_pointwise_compute() {
        let ctrl = controller();
        let xs = [-30.0, -10.0, 0.0, 10.0, 30.0];
        let ys = [-10.0, 0.0, 10.0];
        let surface = ctrl
            .controller()
            .control_surface(
                (SPEED_ERROR, &xs[..]),
                (ACCELERATION, &ys[..]),
                THROTTLE,
                &Inputs::new(),
            )
            .unwrap();

        assert_eq!(surface.values.len(), ys.len());
        for (j, &y) in ys.iter().enumerate() {
            for (i, &x) in xs.iter().enumerate() {
                assert_eq!(
                    surface.get(i, j),
                    Some(ctrl.compute_throttle(x, y).unwrap())
                );
            }
        }
    }

    #[test]
    fn control_surface_with_many_rows_keeps_row_order() {
        let ctrl = controller();
        let xs = [-20.0, 0.0, 20.0];
        let ys: Vec<f64> = (0..257).map(|j| -10.0 + j as f64 * 20.0 / 256.0).collect();
        let surface = ctrl
            .controller()
            .control_surface(
                (SPEED_ERROR, &xs[..]),
                (ACCELERATION, &ys[..]),
                THROTTLE,
                &Inputs::new(),
            )
            .unwrap();

        assert_eq!(surface.values.len(), ys.len());
        for (j, &y) in ys.iter().enumerate() {
            assert_eq!(surface.values[j].len(), xs.len());
            assert_eq!(surface.get(1, j), Some(ctrl.compute_throttle(0.0, y).unwrap()));
        }

        let no_rows: [f64; 0] = [];
        let empty = ctrl
            .controller()
            .control_surface(
                (SPEED_ERROR, &xs[..]),
                (ACCELERATION, &no_rows[..]),
                THROTTLE,
                &Inputs::new(),
            )
            .unwrap();
        assert!(empty.values.is_empty());
    }

    #[test]
    fn control_surface_rejects_unknown_output() {
        let err = controller()
            .controller()
            .control_surface(
                (SPEED_ERROR, &[0.0][..]),
                (ACCELERATION, &[0.0][..]),
                "brake",
                &Inputs::new(),
            )
            .unwrap_err();
        assert_eq!(err, Error::UnknownVariable("brake".to_string()));
    }
}
