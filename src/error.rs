use crate::variable::Role;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building a control system or evaluating it.
///
/// Everything except [`Error::MissingInput`] and [`Error::NonFiniteInput`] is
/// reported at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("missing crisp input for variable `{0}`")]
    MissingInput(String),

    #[error("crisp input for variable `{0}` is not finite")]
    NonFiniteInput(String),

    #[error("invalid universe [{min}, {max}] with step {step}")]
    InvalidUniverse { min: f64, max: f64, step: f64 },

    #[error("invalid {shape} membership points {points:?}")]
    InvalidMembershipShape {
        shape: &'static str,
        points: Vec<f64>,
    },

    #[error("duplicate {kind} name `{name}`")]
    DuplicateName { kind: &'static str, name: String },

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("variable `{variable}` has no term `{term}`")]
    UnknownTerm { variable: String, term: String },

    #[error("variable `{variable}` is an {actual} variable, expected {expected}")]
    RoleMismatch {
        variable: String,
        expected: Role,
        actual: Role,
    },

    #[error("rule weight {0} is outside (0, 1]")]
    InvalidWeight(f64),

    #[error("rule has no consequent")]
    EmptyConsequent,

    #[error("invalid parameter `{name}` = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
