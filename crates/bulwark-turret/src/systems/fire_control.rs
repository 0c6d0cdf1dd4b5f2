//! Orientation stepping, alignment and the fire gates.

use bulwark_core::config::TurretConfig;
use bulwark_core::constants::MIN_FIRE_COOLDOWN;
use bulwark_core::enums::WithholdReason;

use crate::ballistics::{angular_distance, approach_angle, wrap_degrees};
use crate::hooks::OrientationBlend;

/// Turret yaw/pitch in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
}

impl Orientation {
    pub fn new(yaw_deg: f64, pitch_deg: f64) -> Self {
        Self { yaw_deg, pitch_deg }
    }

    /// Wrap yaw and clamp pitch to the elevation limits.
    pub fn clamped(self, config: &TurretConfig) -> Self {
        Self {
            yaw_deg: wrap_degrees(self.yaw_deg),
            pitch_deg: self
                .pitch_deg
                .clamp(config.min_elevation_deg, config.max_elevation_deg),
        }
    }

    /// Within `fire_arc_deg` of `desired` on both axes.
    pub fn aligned_with(&self, desired: Orientation, fire_arc_deg: f64) -> bool {
        angular_distance(self.yaw_deg, desired.yaw_deg) <= fire_arc_deg
            && angular_distance(self.pitch_deg, desired.pitch_deg) <= fire_arc_deg
    }
}

/// Rotate toward `desired` by at most `max_turn_rate_deg * dt` per axis,
/// run the optional blend, then re-clamp.
pub fn rotate_toward(
    current: Orientation,
    desired: Orientation,
    dt: f64,
    config: &TurretConfig,
    blend: Option<&mut (dyn OrientationBlend + '_)>,
) -> Orientation {
    let max_delta = config.max_turn_rate_deg * dt;
    let stepped = Orientation {
        yaw_deg: approach_angle(current.yaw_deg, desired.yaw_deg, max_delta),
        pitch_deg: approach_angle(current.pitch_deg, desired.pitch_deg, max_delta),
    };
    let blended = match blend {
        Some(blend) => {
            let (yaw, pitch) = blend.blend(stepped.yaw_deg, stepped.pitch_deg);
            Orientation::new(yaw, pitch)
        }
        None => stepped,
    };
    blended.clamped(config)
}

/// Cooldown set by a shot under the current adaptive scale.
pub fn fire_cooldown(base: f64, cooldown_scale: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    (base * cooldown_scale.max(0.0)).max(MIN_FIRE_COOLDOWN)
}

/// Gates that depend only on timing and heat, in evaluation order.
pub fn readiness(cooldown: f64, overheated: bool, resumed_this_tick: bool) -> Result<(), WithholdReason> {
    if cooldown > 0.0 {
        return Err(WithholdReason::CoolingDown);
    }
    if overheated {
        return Err(WithholdReason::Overheated);
    }
    if resumed_this_tick {
        return Err(WithholdReason::ResumingFromOverheat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::FnHook;

    #[test]
    fn test_clamped_limits_pitch_and_wraps_yaw() {
        let config = TurretConfig::default();
        let o = Orientation::new(270.0, 80.0).clamped(&config);
        assert_eq!(o.yaw_deg, -90.0);
        assert_eq!(o.pitch_deg, config.max_elevation_deg);
        let o = Orientation::new(0.0, -40.0).clamped(&config);
        assert_eq!(o.pitch_deg, config.min_elevation_deg);
    }

    #[test]
    fn test_alignment_across_seam() {
        let a = Orientation::new(179.0, 0.0);
        assert!(a.aligned_with(Orientation::new(-179.0, 1.0), 3.0));
        assert!(!a.aligned_with(Orientation::new(-179.0, 4.0), 3.0));
    }

    #[test]
    fn test_rotation_respects_turn_rate() {
        let config = TurretConfig {
            max_turn_rate_deg: 100.0,
            ..Default::default()
        };
        let next = rotate_toward(
            Orientation::default(),
            Orientation::new(90.0, 30.0),
            0.1,
            &config,
            None,
        );
        assert!((next.yaw_deg - 10.0).abs() < 1e-9);
        assert!((next.pitch_deg - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_output_is_reclamped() {
        let config = TurretConfig::default();
        let mut sway = FnHook(|yaw: f64, pitch: f64| (yaw + 360.0, pitch + 500.0));
        let next = rotate_toward(
            Orientation::default(),
            Orientation::default(),
            0.1,
            &config,
            Some(&mut sway),
        );
        assert_eq!(next.yaw_deg, 0.0);
        assert_eq!(next.pitch_deg, config.max_elevation_deg);
    }

    #[test]
    fn test_fire_cooldown_scaling() {
        assert_eq!(fire_cooldown(0.0, 1.0), 0.0);
        assert_eq!(fire_cooldown(-1.0, 1.0), 0.0);
        assert!((fire_cooldown(0.2, 0.5) - 0.1).abs() < 1e-12);
        assert_eq!(fire_cooldown(0.2, 0.0), MIN_FIRE_COOLDOWN);
        assert_eq!(fire_cooldown(0.2, -3.0), MIN_FIRE_COOLDOWN);
    }

    #[test]
    fn test_readiness_order() {
        assert_eq!(readiness(0.1, true, true), Err(WithholdReason::CoolingDown));
        assert_eq!(readiness(0.0, true, false), Err(WithholdReason::Overheated));
        assert_eq!(readiness(0.0, false, true), Err(WithholdReason::ResumingFromOverheat));
        assert_eq!(readiness(0.0, false, false), Ok(()));
    }
}
