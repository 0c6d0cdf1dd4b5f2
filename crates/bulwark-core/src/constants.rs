//! Numerical tolerances and tuning defaults.

// --- Solver tolerances ---

/// Coefficients below this are treated as zero by the intercept solver.
pub const SOLVER_EPSILON: f64 = 1e-6;

/// Fused totals below this produce zero averages.
pub const FUSION_TOTAL_EPSILON: f64 = 1e-6;

/// Contributions at or below this threat are expired.
pub const CONTRIBUTION_EXPIRY_THREAT: f64 = 1e-3;

/// Floor for a contribution's lifetime after latency is subtracted.
pub const MIN_CONTRIBUTION_LIFETIME: f64 = 1e-3;

/// Floor for the cooperative confidence exponent.
pub const MIN_CONFIDENCE_EXPONENT: f64 = 1e-3;

/// Slack allowed when checking stored power against a shot's cost.
pub const POWER_EPSILON: f64 = 1e-6;

// --- Fire control ---

/// Shortest cooldown a shot can set when a base cooldown is configured.
pub const MIN_FIRE_COOLDOWN: f64 = 0.01;

/// Value returned by `update` for a manual single shot.
pub const MANUAL_SHOT_ID: &str = "manual_override";

/// Value returned by `update` for a manual burst shot.
pub const MANUAL_BURST_ID: &str = "manual_override_burst";

// --- Synthesized ammunition ---

/// Name of the ammunition created when the catalog is empty.
pub const DEFAULT_AMMUNITION_NAME: &str = "standard";

/// Damage of the synthesized ammunition.
pub const DEFAULT_AMMUNITION_DAMAGE: f64 = 10.0;

/// Heat per shot of the synthesized ammunition.
pub const DEFAULT_AMMUNITION_HEAT: f64 = 1.0;

// --- Turret defaults ---

pub const DEFAULT_MAX_TURN_RATE_DEG: f64 = 120.0;
pub const DEFAULT_MAX_ELEVATION_DEG: f64 = 60.0;
pub const DEFAULT_MIN_ELEVATION_DEG: f64 = -10.0;
pub const DEFAULT_FIRE_ARC_DEG: f64 = 5.0;
pub const DEFAULT_PROJECTILE_SPEED: f64 = 55.0;
pub const DEFAULT_DETECTION_RADIUS: f64 = 50.0;
/// Seconds before a lost target is forgotten.
pub const DEFAULT_TARGET_MEMORY: f64 = 1.5;
pub const DEFAULT_MAX_PREDICTION_TIME: f64 = 3.0;
pub const DEFAULT_FIRE_COOLDOWN: f64 = 0.2;

pub const DEFAULT_HEAT_CAPACITY: f64 = 12.0;
pub const DEFAULT_OVERHEAT_THRESHOLD: f64 = 9.0;
pub const DEFAULT_HEAT_RESUME_THRESHOLD: f64 = 4.0;
pub const DEFAULT_HEAT_DISSIPATION_RATE: f64 = 3.0;

pub const DEFAULT_IDLE_SCAN_SPEED_DEG: f64 = 25.0;
pub const DEFAULT_IDLE_SCAN_YAW_RANGE_DEG: f64 = 45.0;
pub const DEFAULT_IDLE_SCAN_PITCH_DEG: f64 = 6.0;

pub const DEFAULT_COOPERATIVE_THREAT_WEIGHT: f64 = 1.0;
pub const DEFAULT_COOPERATIVE_LATENCY_DECAY: f64 = 0.5;
pub const DEFAULT_COOPERATIVE_CONFIDENCE_EXPONENT: f64 = 1.0;

pub const DEFAULT_RL_REWARD_TARGET: f64 = 0.0;
pub const DEFAULT_RL_REWARD_ADJUST_RATE: f64 = 0.05;
pub const DEFAULT_RL_REWARD_SMOOTHING: f64 = 0.2;
pub const DEFAULT_RL_COOLDOWN_BOUNDS: (f64, f64) = (0.5, 1.5);
pub const DEFAULT_RL_THREAT_BIAS_BOUNDS: (f64, f64) = (0.5, 2.0);
