use fuzzy_throttle::{MembershipFunction, Universe};
use rand::prelude::*;

fn random_shape(rng: &mut StdRng) -> MembershipFunction {
    let mut points: Vec<f64> = (0..4).map(|_| rng.gen_range(-50.0..50.0)).collect();
    points.sort_by(|l, r| l.total_cmp(r));
    if rng.gen_bool(0.5) {
        MembershipFunction::triangular(points[0], points[1], points[2]).unwrap()
    } else {
        MembershipFunction::trapezoidal(points[0], points[1], points[2], points[3]).unwrap()
    }
}

#[test]
fn sampled_degrees_respect_shape() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let mf = random_shape(&mut rng);
        let (lower, upper) = mf.support();
        let (peak_lo, peak_hi) = mf.peak();
        assert_eq!(mf.degree(peak_lo), 1.0, "{mf:?}");
        assert_eq!(mf.degree(peak_hi), 1.0, "{mf:?}");

        for _ in 0..50 {
            let x = rng.gen_range(-100.0..100.0);
            let degree = mf.degree(x);
            assert!((0.0..=1.0).contains(&degree));
            if x < lower || x > upper {
                assert_eq!(degree, 0.0, "{mf:?} at {x}");
            }
            if (peak_lo..=peak_hi).contains(&x) {
                assert_eq!(degree, 1.0, "{mf:?} at {x}");
            }
        }
    }
}

#[test]
fn sampled_curve_lines_up_with_universe() {
    let mut rng = StdRng::seed_from_u64(3);
    let universe = Universe::new(-50.0, 50.0, 0.5).unwrap();

    for _ in 0..20 {
        let mf = random_shape(&mut rng);
        let curve = mf.sample(&universe);
        assert_eq!(curve.len(), universe.len());
        for (x, mu) in universe.samples().zip(curve) {
            assert_eq!(mu, mf.degree(x));
        }
    }
}
