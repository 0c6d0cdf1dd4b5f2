#[cfg(test)]
mod tests {
    use crate::config::TurretConfig;
    use crate::error::{ConfigError, GeometryError, TurretError};
    use crate::events::TurretEvent;
    use crate::types::*;

    #[test]
    fn test_normalized_unit_length() {
        let v = Vector3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12);
        assert!((v.z - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_zero_vector_fails() {
        let result = Vector3::ZERO.normalized();
        assert_eq!(result, Err(GeometryError::ZeroLengthVector));
    }

    #[test]
    fn test_horizontal_angle_ignores_height() {
        let a = Vector3::new(0.0, 5.0, 1.0);
        let b = Vector3::new(1.0, -3.0, 0.0);
        let angle = a.horizontal_angle_to(b);
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_angle_helpers_degenerate_is_zero() {
        assert_eq!(UP.horizontal_angle_to(Vector3::new(1.0, 0.0, 0.0)), 0.0);
        let elevation = Vector3::new(0.0, 0.0, 1.0).vertical_angle_to(UP);
        assert!((elevation - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
        assert_eq!(Vector3::ZERO.vertical_angle_to(Vector3::new(1.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn test_target_prediction() {
        let target = Target::new("t", Vector3::new(1.0, 0.0, 2.0), Vector3::new(2.0, 1.0, -1.0));
        let predicted = target.predict_position(1.5);
        assert_eq!(predicted, Vector3::new(4.0, 1.5, 0.5));
    }

    #[test]
    fn test_obstruction_from_bool() {
        assert!(!ObstructionSample::from(true).blocked);
        assert!(ObstructionSample::from(false).blocked);
        assert_eq!(ObstructionSample::from(false).hit_position, None);
    }

    #[test]
    fn test_config_defaults_validate() {
        let config = TurretConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.power_enabled());
        assert_eq!(config.rl_cooldown_bounds, (0.5, 1.5));
    }

    #[test]
    fn test_config_from_partial_toml() {
        let text = r#"
            fire_arc_deg = 3.0
            default_ammunition = "piercing"
            rl_cooldown_bounds = [0.25, 1.25]

            [[ammunition_types]]
            name = "standard"
            projectile_speed = 55.0
            damage = 10.0

            [[ammunition_types]]
            name = "piercing"
            projectile_speed = 70.0
            damage = 14.0
            heat_per_shot = 1.8
        "#;
        let config = TurretConfig::from_toml_str(text).unwrap();
        assert_eq!(config.fire_arc_deg, 3.0);
        assert_eq!(config.detection_radius, 50.0, "unspecified keys keep defaults");
        assert_eq!(config.ammunition_types.len(), 2);
        assert_eq!(config.ammunition_types[0].heat_per_shot, 1.0);
        assert_eq!(config.ammunition_types[1].heat_per_shot, 1.8);
        assert_eq!(config.default_ammunition.as_deref(), Some("piercing"));
        assert_eq!(config.rl_cooldown_bounds, (0.25, 1.25));
    }

    #[test]
    fn test_config_rejects_inverted_elevation() {
        let err = TurretConfig::from_toml_str("min_elevation_deg = 70.0").unwrap_err();
        match err {
            ConfigError::Invalid(TurretError::InvalidConfig(msg)) => {
                assert!(msg.contains("min_elevation_deg"), "unexpected message: {msg}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_rejects_inverted_rl_bounds() {
        let config = TurretConfig {
            rl_threat_bias_bounds: (2.0, 1.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TurretError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_negative_resume_threshold() {
        let config = TurretConfig {
            overheat_threshold: 2.0,
            heat_resume_threshold: -1.0,
            ..Default::default()
        };
        match config.validate() {
            Err(TurretError::InvalidConfig(msg)) => assert!(msg.contains("heat_resume_threshold")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_rejects_unreachable_overheat() {
        let config = TurretConfig {
            heat_capacity: 5.0,
            overheat_threshold: 9.0,
            heat_resume_threshold: 1.0,
            ..Default::default()
        };
        match config.validate() {
            Err(TurretError::InvalidConfig(msg)) => assert!(msg.contains("overheat_threshold")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_parse_error() {
        let err = TurretConfig::from_toml_str("fire_arc_deg = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = TurretConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_event_tagged_json() {
        let event = TurretEvent::TargetAcquired {
            target_id: "alpha".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"TargetAcquired","target_id":"alpha"}"#);
    }

    #[test]
    fn test_designation_defaults() {
        let designation = TargetDesignation::new("t1", 2.0);
        assert_eq!(designation.ttl, 2.0);
        assert_eq!(designation.sensor_kind, "generic");
        assert_eq!(designation.confidence, 1.0);
        assert!(designation.sensor_id.is_none());
    }
}
