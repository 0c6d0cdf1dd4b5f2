//! Spherical cover objects and the line-of-sight query the turret consults.

use bulwark_core::types::{ObstructionSample, Vector3, VectorExt};
use bulwark_turret::hooks::ObstructionCheck;

use crate::scenario::CoverSphere;

/// Navigation cost reported for an unobstructed line.
pub const CLEAR_NAVIGATION_COST: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverField {
    spheres: Vec<CoverSphere>,
}

impl CoverField {
    pub fn new(spheres: Vec<CoverSphere>) -> Self {
        Self { spheres }
    }

    pub fn spheres(&self) -> &[CoverSphere] {
        &self.spheres
    }

    /// Test the segment `origin -> point` against each sphere in declaration
    /// order. The first sphere crossed strictly between the endpoints blocks
    /// the line; its radius is reported as the navigation cost.
    pub fn sample(&self, origin: Vector3, point: Vector3) -> ObstructionSample {
        let direction = point - origin;
        let a = direction.length_squared();
        if a == 0.0 {
            return clear();
        }

        for sphere in &self.spheres {
            let oc = origin - sphere.center;
            let b = 2.0 * oc.dot(direction);
            let c = oc.length_squared() - sphere.radius * sphere.radius;
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                continue;
            }

            let root = discriminant.sqrt();
            let near = (-b - root) / (2.0 * a);
            let far = (-b + root) / (2.0 * a);
            let hit = [near, far].into_iter().find(|t| *t > 0.0 && *t < 1.0);
            if let Some(t) = hit {
                let hit_position = origin + direction * t;
                return ObstructionSample {
                    blocked: true,
                    hit_position: Some(hit_position),
                    surface_normal: (hit_position - sphere.center).normalized().ok(),
                    navigation_cost: sphere.radius,
                };
            }
        }
        clear()
    }
}

fn clear() -> ObstructionSample {
    ObstructionSample {
        navigation_cost: CLEAR_NAVIGATION_COST,
        ..ObstructionSample::clear()
    }
}

impl ObstructionCheck for CoverField {
    fn check(&mut self, origin: Vector3, point: Vector3) -> ObstructionSample {
        self.sample(origin, point)
    }
}
