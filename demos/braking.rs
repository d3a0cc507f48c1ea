use anyhow::Result;
use clap::Parser;
use fuzzy_throttle::{
    Antecedent, ControlSystem, Inputs, LinguisticVariable, MembershipFunction, Rule, Universe,
};

#[derive(Parser)]
struct Opts {
    /// Distance to the nearest vehicle in metres.
    #[clap(default_value = "12")]
    pub distance: f64,
    /// Road humidity in percent.
    #[clap(long, conflicts_with = "ice")]
    pub humidity: Option<f64>,
    /// Road icing in percent.
    #[clap(long)]
    pub ice: Option<f64>,
    /// Sampling step of the braking universe.
    #[clap(long, default_value = "0.1")]
    pub resolution: f64,
}

fn main() -> Result<()> {
    let Opts {
        distance,
        humidity,
        ice,
        resolution,
    } = Opts::parse();

    let mut inputs = Inputs::new().with("distance", distance);
    let builder = ControlSystem::builder()
        .variable(distance_variable()?)?
        .variable(braking_variable(resolution)?)?;

    let builder = match (humidity, ice) {
        (Some(humidity), _) => {
            inputs.insert("humidity", humidity);
            builder
                .variable(humidity_variable()?)?
                .rules(humidity_rules())?
        }
        (None, Some(ice)) => {
            inputs.insert("ice", ice);
            builder
                .variable(ice_variable()?)?
                .rules(ice_rules())?
        }
        (None, None) => builder.rules(distance_rules())?,
    };

    let system = builder.build()?;
    let inference = system.infer(&inputs)?;

    for (variable, degrees) in &inference.fuzzified {
        let dominant = system
            .variable(variable)
            .zip(inputs.get(variable))
            .and_then(|(var, x)| var.dominant_term(x));
        match dominant {
            Some((term, degree)) => {
                println!("{variable}: {degrees:?} -> mostly {term} ({degree:.2})")
            }
            None => println!("{variable}: {degrees:?}"),
        }
    }
    for (rule, strength) in system.rules().zip(&inference.firing_strengths) {
        if *strength > 0.0 {
            println!("{strength:.3}  {rule}");
        }
    }
    if let Some(value) = inference.outputs.get("braking") {
        println!("braking = {value:.2}");
    }

    Ok(())
}

fn distance_variable() -> fuzzy_throttle::Result<LinguisticVariable> {
    LinguisticVariable::input("distance", Universe::new(0.0, 50.0, 1.0)?)
        .with_term("near", MembershipFunction::trapezoidal(0.0, 0.0, 5.0, 15.0)?)?
        .with_term("medium", MembershipFunction::triangular(10.0, 20.0, 30.0)?)?
        .with_term("far", MembershipFunction::trapezoidal(25.0, 35.0, 50.0, 50.0)?)
}

fn braking_variable(resolution: f64) -> fuzzy_throttle::Result<LinguisticVariable> {
    LinguisticVariable::output("braking", Universe::new(0.0, 6.0, resolution)?)
        .with_term("none", MembershipFunction::trapezoidal(0.0, 0.0, 0.5, 1.5)?)?
        .with_term("light", MembershipFunction::triangular(1.0, 2.5, 4.0)?)?
        .with_term("strong", MembershipFunction::trapezoidal(3.0, 4.5, 6.0, 6.0)?)
}

fn humidity_variable() -> fuzzy_throttle::Result<LinguisticVariable> {
    LinguisticVariable::input("humidity", Universe::new(0.0, 100.0, 1.0)?)
        .with_term("dry", MembershipFunction::trapezoidal(0.0, 0.0, 20.0, 40.0)?)?
        .with_term("wet", MembershipFunction::triangular(30.0, 50.0, 70.0)?)?
        .with_term("soaked", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0)?)
}

fn ice_variable() -> fuzzy_throttle::Result<LinguisticVariable> {
    LinguisticVariable::input("ice", Universe::new(0.0, 100.0, 1.0)?)
        .with_term("none", MembershipFunction::trapezoidal(0.0, 0.0, 10.0, 30.0)?)?
        .with_term("moderate", MembershipFunction::triangular(20.0, 50.0, 80.0)?)?
        .with_term("heavy", MembershipFunction::trapezoidal(70.0, 90.0, 100.0, 100.0)?)
}

fn when(variable: &str, term: &str) -> Antecedent {
    Antecedent::is(variable, term)
}

fn brake(antecedent: Antecedent, term: &str) -> Rule {
    Rule::new(antecedent, "braking", term)
}

fn distance_rules() -> Vec<Rule> {
    vec![
        brake(when("distance", "near"), "strong"),
        brake(when("distance", "medium"), "light"),
        brake(when("distance", "far"), "none"),
    ]
}

fn humidity_rules() -> Vec<Rule> {
    let near_and = |term: &str| when("distance", "near").and(when("humidity", term));
    let medium_and = |term: &str| when("distance", "medium").and(when("humidity", term));
    vec![
        brake(near_and("dry"), "strong"),
        brake(near_and("wet"), "strong"),
        brake(near_and("soaked"), "strong"),
        brake(medium_and("dry"), "light"),
        brake(medium_and("wet"), "light"),
        brake(medium_and("soaked"), "strong"),
        brake(when("distance", "far"), "none"),
    ]
}

fn ice_rules() -> Vec<Rule> {
    let and_ice = |distance: &str, ice: &str| when("distance", distance).and(when("ice", ice));
    vec![
        brake(and_ice("near", "none"), "strong"),
        brake(and_ice("near", "moderate"), "strong"),
        brake(and_ice("near", "heavy"), "strong"),
        brake(and_ice("medium", "none"), "light"),
        brake(and_ice("medium", "moderate"), "strong"),
        brake(and_ice("medium", "heavy"), "strong"),
        brake(and_ice("far", "none"), "none"),
        brake(and_ice("far", "moderate"), "light"),
        brake(and_ice("far", "heavy"), "strong"),
    ]
}
