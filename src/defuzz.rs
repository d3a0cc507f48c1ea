use crate::universe::Universe;
use tracing::debug;

/// Center of gravity of `membership` sampled on the universe grid.
///
/// A curve with no activation defuzzifies to the universe midpoint.
pub fn centroid(universe: &Universe, membership: &[f64]) -> f64 {
    debug_assert_eq!(universe.len(), membership.len());

    let (moment, area) = universe
        .samples()
        .zip(membership)
        .fold((0.0, 0.0), |(moment, area), (x, &mu)| {
            (moment + x * mu, area + mu)
        });

    if area > 0.0 {
        moment / area
    } else {
        let midpoint = universe.midpoint();
        debug!(midpoint, "no activation, falling back to universe midpoint");
        midpoint
    }
}
