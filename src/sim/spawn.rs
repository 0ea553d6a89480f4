//! Spawn slot allocation
//!
//! One-dimensional dart throwing: random candidates along the x axis are
//! accepted only if they keep the minimum spacing to every accepted point.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::SimError;
use crate::consts::{SPAWN_REJECTION_LIMIT, SPAWN_RETRY_LIMIT};

/// Horizontal layout that spawn slots must respect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnLayout {
    pub viewport_width: f32,
    /// Largest sprite dimension
    pub item_size: f32,
    pub margin: f32,
}

impl SpawnLayout {
    pub fn new(viewport_width: f32, item_size: f32, margin: f32) -> Self {
        Self {
            viewport_width,
            item_size,
            margin,
        }
    }

    /// Minimum distance between any two slots
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.item_size + self.margin
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.margin
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.viewport_width - self.item_size - self.margin
    }

    /// Whether any slot fits at all
    pub fn has_room(&self) -> bool {
        self.spacing() > 0.0 && self.max_x() >= self.min_x()
    }

    /// Upper bound on how many slots to attempt
    pub fn max_count(&self) -> usize {
        if self.spacing() <= 0.0 {
            return 0;
        }
        (self.viewport_width / self.spacing()).floor().max(0.0) as usize
    }

    /// Whether `x` is a legal slot position for this layout
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Uniform candidate in the valid range (caller checks `has_room`)
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.random_range(self.min_x()..=self.max_x())
    }

    /// One dart-thrown slot at least `spacing` from every `occupied` slot,
    /// giving up after the usual run of rejections
    pub fn sample_clear<R: Rng + ?Sized>(&self, rng: &mut R, occupied: &[f32]) -> Option<f32> {
        if !self.has_room() {
            return None;
        }
        let spacing = self.spacing();
        (0..SPAWN_REJECTION_LIMIT)
            .map(|_| self.sample(rng))
            .find(|candidate| occupied.iter().all(|o| (o - candidate).abs() >= spacing))
    }

    /// Throw darts until a random target count is reached or 1000 candidates
    /// in a row are rejected. May return fewer points than targeted, including none.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f32> {
        if !self.has_room() {
            return Vec::new();
        }

        let target = rng.random_range(0..=self.max_count());
        let spacing = self.spacing();
        let mut points: Vec<f32> = Vec::with_capacity(target);
        let mut rejections = 0;

        while points.len() < target {
            let candidate = self.sample(rng);
            if points.iter().all(|p| (p - candidate).abs() >= spacing) {
                points.push(candidate);
                rejections = 0;
            } else {
                rejections += 1;
                if rejections >= SPAWN_REJECTION_LIMIT {
                    break;
                }
            }
        }

        points
    }

    /// Generate until at least one point comes back. The simulation cannot run
    /// without a slot, so an empty result is retried and eventually an error.
    pub fn generate_non_empty<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f32>, SimError> {
        if self.has_room() {
            for attempt in 1..=SPAWN_RETRY_LIMIT {
                let points = self.generate(rng);
                if !points.is_empty() {
                    return Ok(points);
                }
                log::warn!("Spawn generation came back empty (attempt {})", attempt);
            }
        }

        Err(SimError::NoSpawnPoints {
            width: self.viewport_width,
            attempts: SPAWN_RETRY_LIMIT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_well_spaced(layout: &SpawnLayout, points: &[f32]) {
        for (i, a) in points.iter().enumerate() {
            assert!(layout.contains(*a), "{} outside [{}, {}]", a, layout.min_x(), layout.max_x());
            for b in &points[i + 1..] {
                assert!((a - b).abs() >= layout.spacing());
            }
        }
    }

    #[test]
    fn test_narrow_phone_scenario() {
        let layout = SpawnLayout::new(375.0, 50.0, 20.0);
        assert_eq!(layout.max_count(), 5);

        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let points = layout.generate(&mut rng);
            assert!(points.len() <= 5);
            assert_well_spaced(&layout, &points);
        }
    }

    #[test]
    fn test_no_room_yields_nothing() {
        let layout = SpawnLayout::new(100.0, 80.0, 20.0);
        assert!(!layout.has_room());
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(layout.generate(&mut rng).is_empty());
        assert!(matches!(
            layout.generate_non_empty(&mut rng),
            Err(SimError::NoSpawnPoints { .. })
        ));
    }

    #[test]
    fn test_non_empty_retries_until_points() {
        let layout = SpawnLayout::new(375.0, 80.0, 20.0);
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let points = layout.generate_non_empty(&mut rng).unwrap();
            assert!(!points.is_empty());
        }
    }

    #[test]
    fn test_sample_clear() {
        let layout = SpawnLayout::new(400.0, 80.0, 20.0);
        let mut rng = Pcg32::seed_from_u64(5);

        let x = layout.sample_clear(&mut rng, &[60.0]).unwrap();
        assert!(layout.contains(x));
        assert!((x - 60.0).abs() >= layout.spacing());

        // [20, 300] is fully covered
        assert_eq!(layout.sample_clear(&mut rng, &[60.0, 160.0, 260.0]), None);
    }

    #[test]
    fn test_same_seed_same_points() {
        let layout = SpawnLayout::new(1024.0, 80.0, 20.0);
        let a = layout.generate(&mut Pcg32::seed_from_u64(42));
        let b = layout.generate(&mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_points_spaced_and_in_range(
            seed in any::<u64>(),
            width in 50.0f32..2000.0,
            size in 10.0f32..120.0,
            margin in 0.0f32..40.0,
        ) {
            let layout = SpawnLayout::new(width, size, margin);
            let mut rng = Pcg32::seed_from_u64(seed);
            let points = layout.generate(&mut rng);
            prop_assert!(points.len() <= layout.max_count());
            for (i, a) in points.iter().enumerate() {
                prop_assert!(layout.contains(*a));
                for b in &points[i + 1..] {
                    prop_assert!((a - b).abs() >= layout.spacing());
                }
            }
        }
    }
}
