//! Spawn placement by bounded rejection sampling

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Playable area enemies spawn into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    bounds_min: Vec3,
    bounds_max: Vec3,
    ground_level: f32,
}

impl Arena {
    /// Bounds are ordered component-wise, so corners may be given in any order
    pub fn new(corner_a: Vec3, corner_b: Vec3, ground_level: f32) -> Self {
        Self {
            bounds_min: corner_a.min(corner_b),
            bounds_max: corner_a.max(corner_b),
            ground_level,
        }
    }

    pub fn bounds_min(&self) -> Vec3 {
        self.bounds_min
    }

    pub fn bounds_max(&self) -> Vec3 {
        self.bounds_max
    }

    pub fn ground_level(&self) -> f32 {
        self.ground_level
    }

    /// Whether a point lies within the horizontal footprint
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.bounds_min.x
            && point.x <= self.bounds_max.x
            && point.z >= self.bounds_min.z
            && point.z <= self.bounds_max.z
    }

    /// Uniform random point on the ground inside the footprint
    pub fn random_ground_point<R: Rng>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            rng.random_range(self.bounds_min.x..=self.bounds_max.x),
            self.ground_level,
            rng.random_range(self.bounds_min.z..=self.bounds_max.z),
        )
    }
}

/// Draw candidates until one is not `occupied`, giving up after
/// `max_attempts` consecutive rejections.
pub fn sample_spawn_position<R, F>(
    rng: &mut R,
    arena: &Arena,
    max_attempts: u32,
    mut occupied: F,
) -> Option<Vec3>
where
    R: Rng,
    F: FnMut(Vec3) -> bool,
{
    for _ in 0..max_attempts {
        let candidate = arena.random_ground_point(rng);
        if !occupied(candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Arena {
        Arena::new(Vec3::new(10.0, 0.0, 10.0), Vec3::new(-10.0, 0.0, -10.0), 0.5)
    }

    #[test]
    fn test_bounds_are_ordered() {
        let arena = arena();
        assert_eq!(arena.bounds_min(), Vec3::new(-10.0, 0.0, -10.0));
        assert_eq!(arena.bounds_max(), Vec3::new(10.0, 0.0, 10.0));
    }

    #[test]
    fn test_samples_inside_bounds_on_ground() {
        let mut rng = Pcg32::seed_from_u64(7);
        let arena = arena();
        for _ in 0..200 {
            let p = sample_spawn_position(&mut rng, &arena, 100, |_| false).unwrap();
            assert!(arena.contains_xz(p));
            assert_eq!(p.y, 0.5);
        }
    }

    #[test]
    fn test_accepts_first_free_candidate() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut calls = 0;
        let p = sample_spawn_position(&mut rng, &arena(), 100, |_| {
            calls += 1;
            calls < 4
        });
        assert!(p.is_some());
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut calls = 0;
        let p = sample_spawn_position(&mut rng, &arena(), 100, |_| {
            calls += 1;
            true
        });
        assert!(p.is_none());
        assert_eq!(calls, 100);
    }

    #[test]
    fn test_rejects_occupied_region() {
        let mut rng = Pcg32::seed_from_u64(3);
        let arena = arena();
        for _ in 0..100 {
            let p = sample_spawn_position(&mut rng, &arena, 100, |c| c.x < 0.0).unwrap();
            assert!(p.x >= 0.0);
        }
    }

    #[test]
    fn test_degenerate_arena_is_a_point() {
        let mut rng = Pcg32::seed_from_u64(3);
        let arena = Arena::new(Vec3::new(2.0, 0.0, 3.0), Vec3::new(2.0, 0.0, 3.0), 0.0);
        let p = sample_spawn_position(&mut rng, &arena, 1, |_| false).unwrap();
        assert_eq!(p, Vec3::new(2.0, 0.0, 3.0));
    }
}
