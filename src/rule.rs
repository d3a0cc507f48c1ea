use crate::{
    constants::DEFAULT_RULE_WEIGHT,
    error::{Error, Result},
};
use std::fmt;

/// IF-part of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Antecedent {
    Is { variable: String, term: String },
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
}

impl Antecedent {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Is {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn and(self, other: Antecedent) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Antecedent) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Folds the tree: leaves go through `leaf`, AND takes the minimum and OR
    /// the maximum of the children.
    pub fn evaluate<F>(&self, leaf: &mut F) -> Result<f64>
    where
        F: FnMut(&str, &str) -> Result<f64>,
    {
        match self {
            Self::Is { variable, term } => leaf(variable.as_str(), term.as_str()),
            Self::And(lhs, rhs) => Ok(lhs.evaluate(leaf)?.min(rhs.evaluate(leaf)?)),
            Self::Or(lhs, rhs) => Ok(lhs.evaluate(leaf)?.max(rhs.evaluate(leaf)?)),
        }
    }

    /// `(variable, term)` leaves in left-to-right order.
    pub fn predicates(&self) -> Vec<(&str, &str)> {
        let mut out = vec![];
        self.collect_predicates(&mut out);
        out
    }

    fn collect_predicates<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Self::Is { variable, term } => out.push((variable.as_str(), term.as_str())),
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.collect_predicates(out);
                rhs.collect_predicates(out);
            }
        }
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Is { variable, term } => write!(f, "{variable} is {term}"),
            Self::And(lhs, rhs) => write!(f, "({lhs} AND {rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs} OR {rhs})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consequent {
    pub variable: String,
    pub term: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedent: Antecedent,
    consequents: Vec<Consequent>,
    weight: f64,
}

impl Rule {
    pub fn new(antecedent: Antecedent, variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            antecedent,
            consequents: vec![Consequent {
                variable: variable.into(),
                term: term.into(),
            }],
            weight: DEFAULT_RULE_WEIGHT,
        }
    }

    pub fn with_consequents(antecedent: Antecedent, consequents: Vec<Consequent>) -> Result<Self> {
        if consequents.is_empty() {
            return Err(Error::EmptyConsequent);
        }
        Ok(Self {
            antecedent,
            consequents,
            weight: DEFAULT_RULE_WEIGHT,
        })
    }

    pub fn then(mut self, variable: impl Into<String>, term: impl Into<String>) -> Self {
        self.consequents.push(Consequent {
            variable: variable.into(),
            term: term.into(),
        });
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(Error::InvalidWeight(weight));
        }
        self.weight = weight;
        Ok(self)
    }

    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    pub fn consequents(&self) -> &[Consequent] {
        &self.consequents
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN ", self.antecedent)?;
        for (index, Consequent { variable, term }) in self.consequents.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{variable} is {term}")?;
        }
        if self.weight != DEFAULT_RULE_WEIGHT {
            write!(f, " [{}]", self.weight)?;
        }
        Ok(())
    }
}
