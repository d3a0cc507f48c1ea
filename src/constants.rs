/// Conversion factor from m/s to km/h.
pub const MS_TO_KMH: f64 = 3.6;

/// Slack used when counting universe samples so that float noise in
/// `(max - min) / step` never produces an extra grid point.
pub const SAMPLE_EPSILON: f64 = 1e-9;

pub const DEFAULT_RULE_WEIGHT: f64 = 1.0;

// Throttle controller universes.
pub const SPEED_ERROR_RANGE_KMH: (f64, f64) = (-30.0, 30.0);
pub const ACCELERATION_RANGE_MS2: (f64, f64) = (-10.0, 10.0);
pub const THROTTLE_RANGE_PERCENT: (f64, f64) = (0.0, 100.0);
pub const DEFAULT_RESOLUTION: f64 = 1.0;

// Vehicle defaults.
pub const DEFAULT_MASS_KG: f64 = 1000.0;
pub const DEFAULT_DRAG_COEFFICIENT: f64 = 50.0;
pub const DEFAULT_MAX_THROTTLE_FORCE_N: f64 = 5000.0;
pub const DEFAULT_TIME_STEP_SEC: f64 = 0.033;

pub const DEFAULT_TARGET_SPEED_MS: f64 = 20.0;
pub const DEFAULT_MANUAL_THROTTLE_PERCENT: f64 = 50.0;
