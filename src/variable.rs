use crate::{
    error::{Error, Result},
    membership::MembershipFunction,
    universe::Universe,
};
use noisy_float::types::{r64, R64};
use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Input,
    Output,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Named fuzzy sets sharing one universe.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    terms: BTreeMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    pub fn input(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, Role::Input, universe)
    }

    pub fn output(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, Role::Output, universe)
    }

    pub fn new(name: impl Into<String>, role: Role, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: BTreeMap::new(),
        }
    }

    /// Adds a term, rejecting a name already used in this variable.
    pub fn with_term(mut self, term: impl Into<String>, mf: MembershipFunction) -> Result<Self> {
        self.add_term(term, mf)?;
        Ok(self)
    }

    pub fn add_term(&mut self, term: impl Into<String>, mf: MembershipFunction) -> Result<()> {
        let term = term.into();
        if self.terms.contains_key(&term) {
            return Err(Error::DuplicateName {
                kind: "term",
                name: term,
            });
        }
        self.terms.insert(term, mf);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term(&self, term: &str) -> Option<&MembershipFunction> {
        self.terms.get(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &MembershipFunction)> {
        self.terms.iter().map(|(name, mf)| (name.as_str(), mf))
    }

    /// Degree of every term at `x`. No clamping is applied.
    pub fn fuzzify(&self, x: f64) -> BTreeMap<String, f64> {
        self.terms
            .iter()
            .map(|(name, mf)| (name.clone(), mf.degree(x)))
            .collect()
    }

    /// Term with the highest degree at `x`, ties resolved by name order.
    /// `None` for a variable without terms or a non-finite `x`.
    pub fn dominant_term(&self, x: f64) -> Option<(&str, f64)> {
        let x = R64::try_new(x)?.raw();
        self.terms
            .iter()
            .map(|(name, mf)| (name.as_str(), r64(mf.degree(x))))
            .rev()
            .max_by_key(|&(_, degree)| degree)
            .map(|(name, degree)| (name, degree.raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance() -> LinguisticVariable {
        LinguisticVariable::input("distance", Universe::new(0.0, 50.0, 1.0).unwrap())
            .with_term(
                "near",
                MembershipFunction::trapezoidal(0.0, 0.0, 5.0, 15.0).unwrap(),
            )
            .unwrap()
            .with_term(
                "medium",
                MembershipFunction::triangular(10.0, 20.0, 30.0).unwrap(),
            )
            .unwrap()
            .with_term(
                "far",
                MembershipFunction::trapezoidal(25.0, 35.0, 50.0, 50.0).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn fuzzify_reports_every_term() {
        let degrees = distance().fuzzify(12.0);
        assert_eq!(degrees.len(), 3);
        assert_eq!(degrees["near"], 0.3);
        assert_eq!(degrees["medium"], 0.2);
        assert_eq!(degrees["far"], 0.0);
    }

    #[test]
    fn out_of_range_input_is_not_clamped() {
        let degrees = distance().fuzzify(60.0);
        assert!(degrees.values().all(|&degree| degree == 0.0));
    }

    #[test]
    fn duplicate_term_is_rejected() {
        let err = distance()
            .with_term(
                "near",
                MembershipFunction::triangular(0.0, 1.0, 2.0).unwrap(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateName {
                kind: "term",
                name: "near".to_string()
            }
        );
    }

    #[test]
    fn dominant_term_picks_highest_degree() {
        let var = distance();
        assert_eq!(var.dominant_term(12.0), Some(("near", 0.3)));
        assert_eq!(var.dominant_term(20.0), Some(("medium", 1.0)));
        assert_eq!(var.dominant_term(45.0), Some(("far", 1.0)));
    }

    #[test]
    fn dominant_term_of_non_finite_input_is_none() {
        let var = distance();
        assert_eq!(var.dominant_term(f64::NAN), None);
        assert_eq!(var.dominant_term(f64::INFINITY), None);

        let empty = LinguisticVariable::input("empty", Universe::new(0.0, 1.0, 0.5).unwrap());
        assert_eq!(empty.dominant_term(0.5), None);
    }
}
