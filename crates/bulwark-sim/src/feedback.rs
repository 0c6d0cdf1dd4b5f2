//! Heat, power and obstruction notices collected for the status line.

use std::cell::RefCell;
use std::rc::Rc;

use bulwark_core::types::ObstructionSample;
use bulwark_turret::hooks::TurretFeedback;

/// Shared log of feedback notices. Clones share the same buffer, so the
/// harness keeps one handle and gives the turret another.
#[derive(Debug, Clone, Default)]
pub struct FeedbackLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl FeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every notice recorded since the last drain.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    fn push(&self, entry: String) {
        self.entries.borrow_mut().push(entry);
    }
}

pub fn heat_label(heat: f64, capacity: f64, overheated: bool) -> &'static str {
    if overheated {
        "overheated"
    } else if heat < capacity * 0.25 {
        "cooling"
    } else {
        "warm"
    }
}

pub fn power_label(power: f64, capacity: f64) -> &'static str {
    let ratio = power / capacity;
    if ratio < 0.25 {
        "low"
    } else if ratio < 0.9 {
        "charging"
    } else {
        "full"
    }
}

impl TurretFeedback for FeedbackLog {
    fn heat_changed(&mut self, heat: f64, capacity: f64, overheated: bool) {
        let label = heat_label(heat, capacity, overheated);
        self.push(format!("heat {heat:.1} ({label})"));
    }

    fn power_changed(&mut self, power: f64, capacity: f64) {
        if capacity <= 0.0 {
            return;
        }
        let label = power_label(power, capacity);
        self.push(format!("power {power:.1} ({label})"));
    }

    fn obstruction_sampled(&mut self, sample: &ObstructionSample) {
        if sample.blocked {
            self.push(format!("cover cost {:.1}", sample.navigation_cost));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_thresholds() {
        assert_eq!(heat_label(9.0, 10.0, true), "overheated");
        assert_eq!(heat_label(2.0, 10.0, false), "cooling");
        assert_eq!(heat_label(2.5, 10.0, false), "warm");
        assert_eq!(power_label(2.0, 12.0), "low");
        assert_eq!(power_label(6.0, 12.0), "charging");
        assert_eq!(power_label(12.0, 12.0), "full");
    }

    #[test]
    fn test_clones_share_one_buffer() {
        let log = FeedbackLog::new();
        let mut handle = log.clone();
        handle.heat_changed(1.2, 10.0, false);
        handle.power_changed(10.5, 12.0);
        handle.power_changed(0.0, 0.0);
        handle.obstruction_sampled(&ObstructionSample::clear());
        assert_eq!(log.drain(), vec!["heat 1.2 (cooling)", "power 10.5 (charging)"]);
        assert!(log.drain().is_empty());
    }
}
