//! Contact world: the hostile actors the turret is shown each tick.
//!
//! Contacts live as hecs entities. The turret never sees the world directly,
//! only the sorted [`Target`] list returned by [`ContactWorld::targets`].

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_core::types::{Target, Vector3};

use crate::scenario::SpawnVolume;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContactId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority(pub i32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vector3);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vector3);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceleration(pub Vector3);

pub struct ContactWorld {
    world: World,
    next_id: u32,
    despawn_buffer: Vec<Entity>,
}

impl Default for ContactWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactWorld {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            next_id: 0,
            despawn_buffer: Vec::new(),
        }
    }

    /// Spawn one contact with explicit kinematics. Returns its id.
    pub fn spawn(
        &mut self,
        position: Vector3,
        velocity: Vector3,
        acceleration: Vector3,
        priority: i32,
    ) -> String {
        let id = format!("target-{}", self.next_id);
        self.next_id += 1;
        self.world.spawn((
            ContactId(id.clone()),
            Priority(priority),
            Position(position),
            Velocity(velocity),
            Acceleration(acceleration),
        ));
        id
    }

    /// Spawn a contact with kinematics drawn uniformly from `volume`.
    pub fn spawn_random(&mut self, rng: &mut ChaCha8Rng, volume: &SpawnVolume) -> String {
        let position = sample_box(rng, volume.position_min, volume.position_max);
        let velocity = sample_box(rng, volume.velocity_min, volume.velocity_max);
        let acceleration = sample_box(rng, volume.acceleration_min, volume.acceleration_max);
        let priority = rng.gen_range(0..=volume.max_priority);
        self.spawn(position, velocity, acceleration, priority)
    }

    /// Integrate every contact: velocity first, then position.
    pub fn advance(&mut self, dt: f64) {
        for (_entity, (pos, vel, acc)) in
            self.world
                .query_mut::<(&mut Position, &mut Velocity, &Acceleration)>()
        {
            vel.0 += acc.0 * dt;
            pos.0 += vel.0 * dt;
        }
    }

    /// Remove contacts at or beyond `range` from `origin`. Returns the removed count.
    pub fn despawn_beyond(&mut self, origin: Vector3, range: f64) -> usize {
        self.despawn_buffer.clear();

        for (entity, pos) in self.world.query_mut::<&Position>() {
            if pos.0.distance(origin) >= range {
                self.despawn_buffer.push(entity);
            }
        }

        let removed = self.despawn_buffer.len();
        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
        removed
    }

    /// Snapshot of all contacts as turret targets, ordered by id.
    pub fn targets(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = self
            .world
            .query::<(&ContactId, &Position, &Velocity, &Priority)>()
            .iter()
            .map(|(_entity, (id, pos, vel, priority))| {
                Target::new(id.0.clone(), pos.0, vel.0)
                    .with_priority(priority.0)
                    .airborne(vel.0.y > 0.0)
            })
            .collect();
        targets.sort_by(|a, b| a.id.cmp(&b.id));
        targets
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sample_box(rng: &mut ChaCha8Rng, min: Vector3, max: Vector3) -> Vector3 {
    Vector3::new(
        rng.gen_range(min.x..=max.x),
        rng.gen_range(min.y..=max.y),
        rng.gen_range(min.z..=max.z),
    )
}
