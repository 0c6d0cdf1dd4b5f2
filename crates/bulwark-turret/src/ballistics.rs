//! Ballistic lead solving and angle arithmetic.
//!
//! Pure functions with no turret state: the closed-form intercept-time solver,
//! yaw/pitch extraction toward a point, and shortest-path angle stepping.

use bulwark_core::constants::SOLVER_EPSILON;
use bulwark_core::types::Vector3;

/// Time-of-flight for a projectile fired now from `origin` to meet a target
/// moving at constant velocity.
///
/// Solves `|target_position + target_velocity * t - origin| = projectile_speed * t`
/// for the smallest positive `t`, clamped to `max_time` when given.
///
/// Returns `0.0` when the projectile speed is not positive or no positive root
/// exists. Callers must read `0.0` as "no valid lead", not "fire immediately".
pub fn solve_intercept_time(
    origin: Vector3,
    target_position: Vector3,
    target_velocity: Vector3,
    projectile_speed: f64,
    max_time: Option<f64>,
) -> f64 {
    if !(projectile_speed > 0.0) {
        return 0.0;
    }

    let to_target = target_position - origin;
    let a = target_velocity.length_squared() - projectile_speed * projectile_speed;
    let b = 2.0 * to_target.dot(target_velocity);
    let c = to_target.length_squared();

    let time = if a.abs() < SOLVER_EPSILON {
        // Equal speeds: the quadratic degenerates to b*t + c = 0.
        if b.abs() < SOLVER_EPSILON {
            return 0.0;
        }
        let t = -c / b;
        if !(t > 0.0) || !t.is_finite() {
            return 0.0;
        }
        t
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return 0.0;
        }
        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b - sqrt_disc) / (2.0 * a);
        let t2 = (-b + sqrt_disc) / (2.0 * a);
        match [t1, t2]
            .into_iter()
            .filter(|t| t.is_finite() && *t > SOLVER_EPSILON)
            .min_by(f64::total_cmp)
        {
            Some(t) => t,
            None => return 0.0,
        }
    };

    match max_time {
        Some(limit) => time.min(limit),
        None => time,
    }
}

/// Yaw and pitch (degrees) that point from `origin` at `point`.
///
/// `yaw = atan2(dx, dz)`, `pitch = asin(dy / distance)`. `None` when the
/// points coincide.
pub fn aim_angles(origin: Vector3, point: Vector3) -> Option<(f64, f64)> {
    let offset = point - origin;
    let distance = offset.length();
    if distance == 0.0 {
        return None;
    }
    let yaw = offset.x.atan2(offset.z).to_degrees();
    let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().to_degrees();
    Some((yaw, pitch))
}

/// Wrap an angle into (-180, 180].
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `current` to `target` (degrees).
pub fn angle_delta(current: f64, target: f64) -> f64 {
    wrap_degrees(target - current)
}

/// Absolute shortest rotation between two angles (degrees).
pub fn angular_distance(current: f64, target: f64) -> f64 {
    angle_delta(current, target).abs()
}

/// Step `current` toward `target` by at most `max_delta` degrees along the
/// shortest path.
pub fn approach_angle(current: f64, target: f64, max_delta: f64) -> f64 {
    let max_delta = max_delta.max(0.0);
    let delta = angle_delta(current, target).clamp(-max_delta, max_delta);
    wrap_degrees(current + delta)
}
