pub mod constants;
pub mod control;
pub mod cruise_control;
pub mod defuzz;
pub mod engine;
pub mod error;
pub mod membership;
pub mod physics;
pub mod rule;
pub mod simulation;
pub mod universe;
pub mod variable;

pub use control::{ControlSurface, Controller, ThrottleController, ThrottleControllerInit};
pub use cruise_control::{CruiseControl, CruiseControlInit, Mode, Report};
pub use engine::{
    AggregatedOutput, ControlSystem, ControlSystemBuilder, Inference, Inputs, Outputs,
};
pub use error::{Error, Result};
pub use membership::MembershipFunction;
pub use physics::VehiclePhysics;
pub use rule::{Antecedent, Consequent, Rule};
pub use simulation::{CarSimulation, CarSimulationInit, PlantState, Sample};
pub use universe::Universe;
pub use variable::{LinguisticVariable, Role};
