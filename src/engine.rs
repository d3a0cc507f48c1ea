//! Mamdani inference over an immutable rule base.
//!
//! A [`ControlSystem`] is assembled once through [`ControlSystemBuilder`],
//! which checks every name and reference eagerly. Evaluation then takes
//! `&self` only, so one system can serve any number of threads.

use crate::{
    defuzz::centroid,
    error::{Error, Result},
    rule::Rule,
    universe::Universe,
    variable::{LinguisticVariable, Role},
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Crisp values keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs(BTreeMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.insert(variable, value);
        self
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: f64) {
        self.0.insert(variable.into(), value);
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, &value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Inputs {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Defuzzified value of every output variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs(BTreeMap<String, f64>);

impl Outputs {
    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, &value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Aggregated fuzzy set of one output variable.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedOutput {
    pub grid: Vec<f64>,
    pub membership: Vec<f64>,
    pub value: f64,
}

/// Every intermediate of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Degree of each term of each input variable that was supplied.
    pub fuzzified: BTreeMap<String, BTreeMap<String, f64>>,
    /// Firing strength of each rule, in rule base order.
    pub firing_strengths: Vec<f64>,
    pub aggregated: BTreeMap<String, AggregatedOutput>,
    pub outputs: Outputs,
}

#[derive(Debug, Clone)]
struct OutputGrid {
    name: String,
    universe: Universe,
    /// Sampled curve of each term, indexed like `CompiledRule::consequents`.
    curves: Vec<Vec<f64>>,
    term_index: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: Rule,
    /// `(output index, term index)` for each consequent.
    consequents: Vec<(usize, usize)>,
}

#[derive(Debug, Default)]
pub struct ControlSystemBuilder {
    variables: BTreeMap<String, LinguisticVariable>,
    rules: Vec<Rule>,
}

impl ControlSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(mut self, variable: LinguisticVariable) -> Result<Self> {
        let name = variable.name().to_string();
        if self.variables.contains_key(&name) {
            return Err(Error::DuplicateName {
                kind: "variable",
                name,
            });
        }
        self.variables.insert(name, variable);
        Ok(self)
    }

    /// Appends a rule. Every variable and term it mentions must already be
    /// registered with the matching role.
    pub fn rule(mut self, rule: Rule) -> Result<Self> {
        for (variable, term) in rule.antecedent().predicates() {
            self.check_reference(variable, term, Role::Input)?;
        }
        for consequent in rule.consequents() {
            self.check_reference(&consequent.variable, &consequent.term, Role::Output)?;
        }
        self.rules.push(rule);
        Ok(self)
    }

    pub fn rules(self, rules: impl IntoIterator<Item = Rule>) -> Result<Self> {
        rules.into_iter().try_fold(self, Self::rule)
    }

    fn check_reference(&self, variable: &str, term: &str, expected: Role) -> Result<()> {
        let var = self
            .variables
            .get(variable)
            .ok_or_else(|| Error::UnknownVariable(variable.to_string()))?;
        if var.role() != expected {
            return Err(Error::RoleMismatch {
                variable: variable.to_string(),
                expected,
                actual: var.role(),
            });
        }
        if var.term(term).is_none() {
            return Err(Error::UnknownTerm {
                variable: variable.to_string(),
                term: term.to_string(),
            });
        }
        Ok(())
    }

    pub fn build(self) -> Result<ControlSystem> {
        let Self { variables, rules } = self;

        let outputs: Vec<OutputGrid> = variables
            .values()
            .filter(|var| var.role() == Role::Output)
            .map(|var| {
                let (term_index, curves): (BTreeMap<String, usize>, Vec<Vec<f64>>) = var
                    .terms()
                    .enumerate()
                    .map(|(index, (term, mf))| {
                        ((term.to_string(), index), mf.sample(var.universe()))
                    })
                    .unzip();
                OutputGrid {
                    name: var.name().to_string(),
                    universe: var.universe().clone(),
                    curves,
                    term_index,
                }
            })
            .collect();

        let rules = rules
            .into_iter()
            .map(|rule| -> Result<CompiledRule> {
                let consequents = rule
                    .consequents()
                    .iter()
                    .map(|consequent| -> Result<(usize, usize)> {
                        let output = outputs
                            .iter()
                            .position(|grid| grid.name == consequent.variable)
                            .ok_or_else(|| Error::UnknownVariable(consequent.variable.clone()))?;
                        let term = *outputs[output]
                            .term_index
                            .get(&consequent.term)
                            .ok_or_else(|| Error::UnknownTerm {
                                variable: consequent.variable.clone(),
                                term: consequent.term.clone(),
                            })?;
                        Ok((output, term))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledRule { rule, consequents })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            variables = variables.len(),
            outputs = outputs.len(),
            rules = rules.len(),
            "built control system"
        );

        Ok(ControlSystem {
            variables,
            rules,
            outputs,
        })
    }
}

/// Immutable set of linguistic variables and rules.
#[derive(Debug, Clone)]
pub struct ControlSystem {
    variables: BTreeMap<String, LinguisticVariable>,
    rules: Vec<CompiledRule>,
    outputs: Vec<OutputGrid>,
}

impl ControlSystem {
    pub fn builder() -> ControlSystemBuilder {
        ControlSystemBuilder::new()
    }

    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables.values()
    }

    pub fn input_variables(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables().filter(|var| var.role() == Role::Input)
    }

    pub fn output_variables(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables().filter(|var| var.role() == Role::Output)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    /// Degree to which the rule's antecedent holds for `inputs`.
    pub fn firing_strength(&self, rule: &Rule, inputs: &Inputs) -> Result<f64> {
        rule.antecedent().evaluate(&mut |variable, term| {
            let x = inputs
                .get(variable)
                .ok_or_else(|| Error::MissingInput(variable.to_string()))?;
            if !x.is_finite() {
                return Err(Error::NonFiniteInput(variable.to_string()));
            }
            let mf = self
                .variables
                .get(variable)
                .ok_or_else(|| Error::UnknownVariable(variable.to_string()))?
                .term(term)
                .ok_or_else(|| Error::UnknownTerm {
                    variable: variable.to_string(),
                    term: term.to_string(),
                })?;
            Ok(mf.degree(x))
        })
    }

    /// Crisp value of every output variable.
    ///
    /// Inputs are used as given: a value outside its universe only activates
    /// terms whose support reaches it. [`crate::Controller`] clamps first.
    pub fn evaluate(&self, inputs: &Inputs) -> Result<Outputs> {
        let strengths = self.firing_strengths(inputs)?;
        let outputs: Outputs = Outputs(
            self.aggregate(&strengths)
                .iter()
                .zip(&self.outputs)
                .map(|(membership, grid)| {
                    (grid.name.clone(), centroid(&grid.universe, membership))
                })
                .collect(),
        );
        trace!(?outputs, "evaluated");
        Ok(outputs)
    }

    /// Like [`Self::evaluate`], keeping every intermediate result.
    pub fn infer(&self, inputs: &Inputs) -> Result<Inference> {
        let firing_strengths = self.firing_strengths(inputs)?;

        let fuzzified = self
            .input_variables()
            .filter_map(|var| {
                let x = inputs.get(var.name())?;
                Some((var.name().to_string(), var.fuzzify(x)))
            })
            .collect();

        let aggregated: BTreeMap<String, AggregatedOutput> = self
            .aggregate(&firing_strengths)
            .into_iter()
            .zip(&self.outputs)
            .map(|(membership, grid)| {
                let value = centroid(&grid.universe, &membership);
                let output = AggregatedOutput {
                    grid: grid.universe.samples().collect(),
                    membership,
                    value,
                };
                (grid.name.clone(), output)
            })
            .collect();

        let outputs = Outputs(
            aggregated
                .iter()
                .map(|(name, output)| (name.clone(), output.value))
                .collect(),
        );

        Ok(Inference {
            fuzzified,
            firing_strengths,
            aggregated,
            outputs,
        })
    }

    /// Rejects a non-finite value for any supplied input variable, whether a
    /// rule references it or not.
    fn firing_strengths(&self, inputs: &Inputs) -> Result<Vec<f64>> {
        for var in self.input_variables() {
            if let Some(x) = inputs.get(var.name()) {
                if !x.is_finite() {
                    return Err(Error::NonFiniteInput(var.name().to_string()));
                }
            }
        }

        self.rules
            .iter()
            .map(|compiled| self.firing_strength(&compiled.rule, inputs))
            .collect()
    }

    /// Clips every consequent curve at its rule's activation and takes the
    /// pointwise maximum per output.
    fn aggregate(&self, strengths: &[f64]) -> Vec<Vec<f64>> {
        let mut aggregated: Vec<Vec<f64>> = self
            .outputs
            .iter()
            .map(|grid| vec![0.0; grid.universe.len()])
            .collect();

        for (compiled, &strength) in self.rules.iter().zip(strengths) {
            let activation = strength * compiled.rule.weight();
            if activation <= 0.0 {
                continue;
            }
            for &(output, term) in &compiled.consequents {
                let curve = &self.outputs[output].curves[term];
                for (acc, &mu) in aggregated[output].iter_mut().zip(curve) {
                    *acc = acc.max(mu.min(activation));
                }
            }
        }

        aggregated
    }
}
