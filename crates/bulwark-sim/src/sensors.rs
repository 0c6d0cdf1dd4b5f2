//! Allied sensor network feeding threat designations to the turret.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_core::types::{Target, TargetDesignation};

use crate::scenario::{AlliedSensor, SensorFeedConfig};

pub struct AlliedSensorFeed {
    config: SensorFeedConfig,
    timer: f64,
}

impl AlliedSensorFeed {
    pub fn new(config: SensorFeedConfig) -> Self {
        Self { config, timer: 0.0 }
    }

    pub fn config(&self) -> &SensorFeedConfig {
        &self.config
    }

    /// Advance the report clock. Once per `interval` every sensor reports
    /// each target inside its range; between rounds nothing is returned.
    pub fn poll(&mut self, dt: f64, targets: &[Target], rng: &mut ChaCha8Rng) -> Vec<TargetDesignation> {
        self.timer += dt.max(0.0);
        if self.timer < self.config.interval {
            return Vec::new();
        }
        self.timer -= self.config.interval;

        let mut reports = Vec::new();
        for sensor in &self.config.sensors {
            for target in targets {
                if let Some(threat) = assess(sensor, target, rng) {
                    reports.push(
                        TargetDesignation::new(target.id.clone(), threat)
                            .from_sensor(sensor.id.clone(), sensor.kind.clone())
                            .with_ttl(self.config.ttl)
                            .with_quality(sensor.confidence, sensor.latency),
                    );
                }
            }
        }
        reports
    }
}

/// Threat a sensor assigns to a target: priority-weighted and falling off
/// linearly with distance. `None` when out of range.
fn assess(sensor: &AlliedSensor, target: &Target, rng: &mut ChaCha8Rng) -> Option<f64> {
    let distance = sensor.position.distance(target.position);
    if !(sensor.range > 0.0) || distance > sensor.range {
        return None;
    }
    let proximity = 1.0 - distance / sensor.range;
    let noise = if sensor.noise.is_finite() { sensor.noise.abs() } else { 0.0 };
    let jitter = 1.0 + rng.gen_range(-noise..=noise);
    Some(((1 + target.priority.max(0)) as f64 * proximity * jitter).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::types::Vector3;
    use rand::SeedableRng;

    fn feed(noise: f64) -> AlliedSensorFeed {
        AlliedSensorFeed::new(SensorFeedConfig {
            interval: 0.5,
            ttl: 1.5,
            sensors: vec![AlliedSensor {
                id: "radar-1".into(),
                kind: "radar".into(),
                position: Vector3::ZERO,
                range: 40.0,
                confidence: 0.8,
                latency: 0.1,
                noise,
            }],
        })
    }

    fn targets() -> Vec<Target> {
        vec![
            Target::new("near", Vector3::new(0.0, 0.0, 10.0), Vector3::ZERO).with_priority(1),
            Target::new("far", Vector3::new(0.0, 0.0, 80.0), Vector3::ZERO),
        ]
    }

    #[test]
    fn test_reports_once_per_interval() {
        let mut feed = feed(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let targets = targets();

        assert!(feed.poll(0.3, &targets, &mut rng).is_empty());
        let reports = feed.poll(0.3, &targets, &mut rng);
        assert_eq!(reports.len(), 1);
        assert!(feed.poll(0.3, &targets, &mut rng).is_empty());
        assert_eq!(feed.poll(0.2, &targets, &mut rng).len(), 1);
    }

    #[test]
    fn test_report_carries_sensor_quality() {
        let mut feed = feed(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let reports = feed.poll(0.5, &targets(), &mut rng);

        let report = &reports[0];
        assert_eq!(report.target_id, "near");
        assert_eq!(report.sensor_id.as_deref(), Some("radar-1"));
        assert_eq!(report.sensor_kind, "radar");
        assert_eq!(report.ttl, 1.5);
        assert_eq!(report.confidence, 0.8);
        assert_eq!(report.latency, 0.1);
        // (1 + priority 1) * (1 - 10/40)
        assert!((report.threat - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_noise_reports_exact_threat() {
        let mut feed = feed(f64::NAN);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let reports = feed.poll(0.5, &targets(), &mut rng);
        assert_eq!(reports.len(), 1);
        assert!((reports[0].threat - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_noise_stays_within_bounds() {
        let mut feed = feed(0.2);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            for report in feed.poll(0.5, &targets(), &mut rng) {
                assert!(report.threat >= 1.5 * 0.8 - 1e-12);
                assert!(report.threat <= 1.5 * 1.2 + 1e-12);
            }
        }
    }
}
