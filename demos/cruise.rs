use anyhow::Result;
use clap::Parser;
use fuzzy_throttle::{CarSimulationInit, CruiseControlInit, Mode, ThrottleControllerInit};

#[derive(Parser)]
struct Opts {
    /// Target speed in m/s.
    #[clap(long, default_value = "20")]
    pub target: f64,
    /// Simulated duration in seconds.
    #[clap(long, default_value = "60")]
    pub duration: f64,
    #[clap(long, default_value = "0.033")]
    pub time_step: f64,
    #[clap(long, default_value = "1000")]
    pub mass: f64,
    /// Fixed throttle percentage instead of fuzzy control.
    #[clap(long)]
    pub manual: Option<f64>,
    /// Sampling step of the throttle universe.
    #[clap(long, default_value = "1")]
    pub resolution: f64,
    /// Print every n-th tick.
    #[clap(long, default_value = "30")]
    pub every: usize,
}

fn main() -> Result<()> {
    let Opts {
        target,
        duration,
        time_step,
        mass,
        manual,
        resolution,
        every,
    } = Opts::parse();

    let mut cruise = CruiseControlInit {
        throttle_controller: ThrottleControllerInit {
            throttle_step: resolution,
            ..Default::default()
        },
        car: CarSimulationInit {
            mass,
            time_step_sec: time_step,
            ..Default::default()
        },
        target_speed: target,
        mode: manual.map_or(Mode::Fuzzy, Mode::Manual),
    }
    .build()?;

    println!(
        "{:>8} {:>10} {:>10} {:>10} {:>10}",
        "t [s]", "v [m/s]", "a [m/s2]", "err [km/h]", "throttle"
    );

    let mut tick = 0;
    while cruise.time_sec() < duration {
        let report = cruise.step()?;
        if tick % every.max(1) == 0 {
            println!(
                "{:>8.2} {:>10.3} {:>10.3} {:>10.2} {:>10.2}",
                report.time_sec,
                report.state.speed,
                report.state.acceleration,
                report.speed_error_kmh,
                report.throttle
            );
        }
        tick += 1;
    }

    let state = cruise.car().state();
    println!(
        "final speed {:.3} m/s after {:.1} m",
        state.speed, state.position
    );

    Ok(())
}
