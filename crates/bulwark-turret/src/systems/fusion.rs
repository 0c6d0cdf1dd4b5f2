//! Cooperative sensor fusion.
//!
//! Allied sensors report threat values per target. Each (target, sensor)
//! pair holds one decaying contribution weighted by report confidence and
//! latency; a target's fused threat is the sum of its live contributions.

use std::collections::BTreeMap;

use bulwark_core::config::TurretConfig;
use bulwark_core::constants::*;
use bulwark_core::telemetry::FusionSummary;
use bulwark_core::types::TargetDesignation;
use tracing::trace;

/// Identity of a contribution within one target's entry.
///
/// Named sensors replace their previous report; anonymous reports each get a
/// fresh sequence number and never overwrite anything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensorKey {
    Named(String),
    Anonymous(u64),
}

/// One sensor's decaying threat report.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorContribution {
    pub threat: f64,
    pub time_remaining: f64,
    pub decay_rate: f64,
    pub sensor_kind: String,
    pub confidence: f64,
    pub confidence_weight: f64,
    pub latency: f64,
    pub latency_weight: f64,
}

impl SensorContribution {
    fn decay(&mut self, dt: f64) {
        self.time_remaining -= dt;
        self.threat = (self.threat - self.decay_rate * dt).max(0.0);
    }

    pub fn expired(&self) -> bool {
        self.time_remaining <= 0.0 || self.threat <= CONTRIBUTION_EXPIRY_THREAT
    }

    /// Threat after confidence and latency weighting.
    pub fn effective_threat(&self) -> f64 {
        self.threat.max(0.0) * self.confidence_weight * self.latency_weight
    }
}

/// All live contributions for one target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedDesignation {
    pub contributions: BTreeMap<SensorKey, SensorContribution>,
}

impl AggregatedDesignation {
    pub fn total_threat(&self) -> f64 {
        self.contributions
            .values()
            .map(SensorContribution::effective_threat)
            .sum()
    }

    /// Effective threat per sensor kind.
    pub fn sensor_breakdown(&self) -> BTreeMap<String, f64> {
        let mut breakdown = BTreeMap::new();
        for contribution in self.contributions.values() {
            let effective = contribution.effective_threat();
            if effective <= 0.0 {
                continue;
            }
            *breakdown
                .entry(contribution.sensor_kind.clone())
                .or_insert(0.0) += effective;
        }
        breakdown
    }
}

/// Weighting parameters taken from the turret config.
#[derive(Debug, Clone, Copy)]
pub struct FusionWeights {
    pub latency_decay: f64,
    pub confidence_exponent: f64,
}

impl From<&TurretConfig> for FusionWeights {
    fn from(config: &TurretConfig) -> Self {
        Self {
            latency_decay: config.cooperative_latency_decay,
            confidence_exponent: config.cooperative_confidence_exponent,
        }
    }
}

/// Per-target designation table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FusionTable {
    designations: BTreeMap<String, AggregatedDesignation>,
    next_anonymous: u64,
}

impl FusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge sensor reports. Non-positive or non-finite threat/ttl and
    /// zero-weight reports are dropped silently.
    pub fn ingest<'a>(
        &mut self,
        designations: impl IntoIterator<Item = &'a TargetDesignation>,
        weights: FusionWeights,
    ) {
        for designation in designations {
            if !(designation.threat > 0.0 && designation.threat.is_finite())
                || !(designation.ttl > 0.0 && designation.ttl.is_finite())
            {
                trace!(target_id = %designation.target_id, "dropping designation with no threat or lifetime");
                continue;
            }

            let confidence = if designation.confidence.is_nan() {
                0.0
            } else {
                designation.confidence.clamp(0.0, 1.0)
            };
            let exponent = weights.confidence_exponent.max(MIN_CONFIDENCE_EXPONENT);
            let confidence_weight = confidence.powf(exponent);

            let latency = designation.latency.max(0.0);
            let decay_factor = weights.latency_decay.max(0.0);
            let latency_weight = if decay_factor > 0.0 {
                (-latency * decay_factor).exp()
            } else {
                1.0
            };
            if !(confidence_weight > 0.0) || !(latency_weight > 0.0) {
                trace!(target_id = %designation.target_id, "dropping zero-weight designation");
                continue;
            }

            let lifetime = (designation.ttl - latency).max(MIN_CONTRIBUTION_LIFETIME);
            let decay_rate = designation
                .decay_rate
                .unwrap_or(designation.threat / lifetime);

            let key = match &designation.sensor_id {
                Some(id) => SensorKey::Named(id.clone()),
                None => {
                    let key = SensorKey::Anonymous(self.next_anonymous);
                    self.next_anonymous += 1;
                    key
                }
            };

            self.designations
                .entry(designation.target_id.clone())
                .or_default()
                .contributions
                .insert(
                    key,
                    SensorContribution {
                        threat: designation.threat,
                        time_remaining: lifetime,
                        decay_rate,
                        sensor_kind: designation.sensor_kind.clone(),
                        confidence,
                        confidence_weight,
                        latency,
                        latency_weight,
                    },
                );
        }
    }

    /// Age every contribution by `dt`, dropping expired contributions and
    /// targets left without any.
    pub fn decay(&mut self, dt: f64) {
        if self.designations.is_empty() {
            return;
        }
        self.designations.retain(|_, designation| {
            designation.contributions.retain(|_, contribution| {
                contribution.decay(dt);
                !contribution.expired()
            });
            !designation.contributions.is_empty()
        });
    }

    /// Fused threat for a target (0 when unknown).
    pub fn total_threat(&self, target_id: &str) -> f64 {
        self.designations
            .get(target_id)
            .map(AggregatedDesignation::total_threat)
            .unwrap_or(0.0)
    }

    pub fn get(&self, target_id: &str) -> Option<&AggregatedDesignation> {
        self.designations.get(target_id)
    }

    pub fn contains(&self, target_id: &str) -> bool {
        self.designations.contains_key(target_id)
    }

    /// Number of targets with live contributions.
    pub fn len(&self) -> usize {
        self.designations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designations.is_empty()
    }

    /// Telemetry view across every target.
    pub fn summary(&self) -> FusionSummary {
        let mut summary = FusionSummary::default();
        let mut confidence_sum = 0.0;
        let mut latency_sum = 0.0;
        for designation in self.designations.values() {
            for contribution in designation.contributions.values() {
                let effective = contribution.effective_threat();
                if effective <= 0.0 {
                    continue;
                }
                summary.threat_score += effective;
                summary.designation_count += 1;
                *summary
                    .sensor_breakdown
                    .entry(contribution.sensor_kind.clone())
                    .or_insert(0.0) += effective;
                confidence_sum += contribution.confidence * effective;
                latency_sum += contribution.latency * effective;
            }
        }
        if summary.threat_score > FUSION_TOTAL_EPSILON {
            summary.average_confidence = confidence_sum / summary.threat_score;
            summary.average_latency = latency_sum / summary.threat_score;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> FusionWeights {
        FusionWeights::from(&TurretConfig::default())
    }

    #[test]
    fn test_full_confidence_contributes_full_threat() {
        let mut table = FusionTable::new();
        table.ingest(&[TargetDesignation::new("t1", 5.0)], weights());
        assert!((table.total_threat("t1") - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_reports_dropped() {
        let mut table = FusionTable::new();
        let reports = [
            TargetDesignation::new("zero", 0.0),
            TargetDesignation::new("negative", -1.0),
            TargetDesignation::new("nan", f64::NAN),
            TargetDesignation::new("no-ttl", 3.0).with_ttl(0.0),
            TargetDesignation::new("blind", 3.0).with_quality(0.0, 0.0),
        ];
        table.ingest(&reports, weights());
        assert!(table.is_empty());
    }

    #[test]
    fn test_latency_and_confidence_weighting() {
        let mut table = FusionTable::new();
        let weights = FusionWeights {
            latency_decay: 0.5,
            confidence_exponent: 2.0,
        };
        table.ingest(
            &[TargetDesignation::new("t1", 4.0).with_quality(0.5, 1.0)],
            weights,
        );
        let expected = 4.0 * 0.25 * (-0.5_f64).exp();
        assert!((table.total_threat("t1") - expected).abs() < 1e-12);

        let contribution = table.get("t1").unwrap().contributions.values().next().unwrap();
        // Lifetime shortened by latency, default decay fades over it.
        assert!((contribution.time_remaining - 1.0).abs() < 1e-12);
        assert!((contribution.decay_rate - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_named_sensor_replaces_anonymous_accumulates() {
        let mut table = FusionTable::new();
        table.ingest(
            &[
                TargetDesignation::new("t1", 2.0).from_sensor("radar-1", "radar"),
                TargetDesignation::new("t1", 3.0).from_sensor("radar-1", "radar"),
            ],
            weights(),
        );
        assert!((table.total_threat("t1") - 3.0).abs() < 1e-12);

        table.ingest(
            &[
                TargetDesignation::new("t1", 1.0),
                TargetDesignation::new("t1", 1.0),
            ],
            weights(),
        );
        assert_eq!(table.get("t1").unwrap().contributions.len(), 3);
        assert!((table.total_threat("t1") - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_named_sensor_does_not_collide_with_anonymous_key() {
        let mut table = FusionTable::new();
        table.ingest(&[TargetDesignation::new("t1", 1.0)], weights());
        table.ingest(
            &[TargetDesignation::new("t1", 1.0).from_sensor("0", "generic")],
            weights(),
        );
        assert_eq!(table.get("t1").unwrap().contributions.len(), 2);
    }

    #[test]
    fn test_decay_removes_expired_targets() {
        let mut table = FusionTable::new();
        table.ingest(
            &[TargetDesignation::new("t1", 5.0).with_ttl(2.0)],
            weights(),
        );
        table.decay(1.0);
        assert!((table.total_threat("t1") - 2.5).abs() < 1e-12);
        table.decay(1.0);
        assert!(!table.contains("t1"));
        assert_eq!(table.total_threat("t1"), 0.0);
    }

    #[test]
    fn test_explicit_decay_rate_expires_on_lifetime() {
        let mut table = FusionTable::new();
        table.ingest(
            &[TargetDesignation::new("t1", 5.0)
                .with_ttl(1.0)
                .with_decay_rate(0.0)],
            weights(),
        );
        table.decay(0.5);
        assert!((table.total_threat("t1") - 5.0).abs() < 1e-12);
        table.decay(0.5);
        assert!(table.is_empty());
    }

    #[test]
    fn test_summary_breakdown_and_averages() {
        let mut table = FusionTable::new();
        let weights = FusionWeights {
            latency_decay: 0.0,
            confidence_exponent: 1.0,
        };
        table.ingest(
            &[
                TargetDesignation::new("a", 2.0)
                    .from_sensor("r", "radar")
                    .with_quality(1.0, 0.0),
                TargetDesignation::new("b", 2.0)
                    .from_sensor("e", "eo")
                    .with_quality(0.5, 1.0),
            ],
            weights,
        );
        let summary = table.summary();
        assert_eq!(summary.designation_count, 2);
        assert!((summary.threat_score - 3.0).abs() < 1e-12);
        assert!((summary.sensor_breakdown["radar"] - 2.0).abs() < 1e-12);
        assert!((summary.sensor_breakdown["eo"] - 1.0).abs() < 1e-12);
        // (1.0 * 2 + 0.5 * 1) / 3
        assert!((summary.average_confidence - 2.5 / 3.0).abs() < 1e-12);
        // (0 * 2 + 1 * 1) / 3
        assert!((summary.average_latency - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = FusionTable::new().summary();
        assert_eq!(summary, FusionSummary::default());
    }
}
