//! Fruit entities and their per-frame kinematics

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::approach;
use crate::assets::FruitAsset;
use crate::consts::{BOUNCE_GRAVITY, BOUNCE_SPEED, BOUNCE_SPIN, SKEWERED_EASE};

/// Which kinematics rule applies to a fruit this frame.
///
/// Skewered and bouncing are separate variants, so a fruit can never be both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FruitMotion {
    /// Falling straight down, spinning
    Falling,
    /// Knocked off the full stack, under gravity
    Bouncing { vel: Vec2, angular_vel: f32 },
    /// Held on the skewer, easing toward its stack slot
    Skewered { target_y: f32 },
}

/// A fruit sprite in the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fruit {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Index into the simulation's asset list
    pub asset: usize,
    /// Accumulated spin (radians)
    pub angle: f32,
    /// ±1, applied when drawing
    pub rotate_direction: f32,
    /// Spawn slot this fruit holds in the recycling scheme
    pub slot_x: f32,
    pub motion: FruitMotion,
}

impl Fruit {
    /// Spawn above the viewport at `slot_x` with a random sprite and spin direction
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        id: u32,
        slot_x: f32,
        assets: &[FruitAsset],
        viewport_height: f32,
    ) -> Self {
        let mut fruit = Self {
            id,
            pos: Vec2::new(slot_x, 0.0),
            width: 0.0,
            height: 0.0,
            asset: 0,
            angle: 0.0,
            rotate_direction: 1.0,
            slot_x,
            motion: FruitMotion::Falling,
        };
        fruit.respawn(rng, slot_x, assets, viewport_height);
        fruit
    }

    /// Reset to a fresh falling state at a new slot, keeping the id
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        slot_x: f32,
        assets: &[FruitAsset],
        viewport_height: f32,
    ) {
        if !assets.is_empty() {
            self.asset = rng.random_range(0..assets.len());
            self.width = assets[self.asset].width;
            self.height = assets[self.asset].height;
        }
        let drop = if viewport_height > 0.0 {
            rng.random_range(0.0..viewport_height)
        } else {
            0.0
        };
        self.pos = Vec2::new(slot_x, -self.height - drop);
        self.slot_x = slot_x;
        self.angle = 0.0;
        self.rotate_direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.motion = FruitMotion::Falling;
    }

    #[inline]
    pub fn is_skewered(&self) -> bool {
        matches!(self.motion, FruitMotion::Skewered { .. })
    }

    #[inline]
    pub fn is_bouncing(&self) -> bool {
        matches!(self.motion, FruitMotion::Bouncing { .. })
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        matches!(self.motion, FruitMotion::Falling)
    }

    /// Bottom edge (leading edge while falling)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    /// Half of the larger dimension, used as a collision radius
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.width.max(self.height) / 2.0
    }

    /// Rotation to draw with
    #[inline]
    pub fn draw_angle(&self) -> f32 {
        self.rotate_direction * self.angle
    }

    /// Falling step. Speeds come from the caller so phases can alter them.
    pub fn fall(&mut self, rotate_speed: f32, fall_speed: f32) {
        if self.is_falling() {
            self.angle += rotate_speed;
            self.pos.y += fall_speed;
        }
    }

    /// Knock this fruit away from `from`. Skewered fruit ignore it.
    pub fn bounce(&mut self, from: Vec2) {
        if self.is_skewered() {
            return;
        }
        let dir = self.pos - from;
        let heading = dir.y.atan2(dir.x);
        let vel = Vec2::new(heading.cos(), heading.sin()) * BOUNCE_SPEED;
        let angular_vel = if vel.x > 0.0 { BOUNCE_SPIN } else { -BOUNCE_SPIN };
        self.motion = FruitMotion::Bouncing { vel, angular_vel };
    }

    /// One frame of whichever rule applies
    pub fn update(&mut self, rotate_speed: f32, fall_speed: f32) {
        match self.motion {
            FruitMotion::Falling => self.fall(rotate_speed, fall_speed),
            FruitMotion::Bouncing {
                mut vel,
                angular_vel,
            } => {
                vel.y += BOUNCE_GRAVITY;
                self.pos += vel;
                self.angle += angular_vel;
                self.motion = FruitMotion::Bouncing { vel, angular_vel };
            }
            FruitMotion::Skewered { target_y } => {
                self.pos.y = approach(self.pos.y, target_y, SKEWERED_EASE);
            }
        }
    }

    /// Jump straight to the stack slot (used while the skewer flies off)
    pub fn snap_to_target(&mut self) {
        if let FruitMotion::Skewered { target_y } = self.motion {
            self.pos.y = target_y;
        }
    }

    /// Whether an airborne fruit has left the area it may occupy
    pub fn is_out_of_bounds(&self, viewport_width: f32, viewport_height: f32, margin: f32) -> bool {
        match self.motion {
            FruitMotion::Skewered { .. } => false,
            FruitMotion::Falling => self.pos.y - self.height / 2.0 > viewport_height,
            FruitMotion::Bouncing { .. } => {
                self.pos.x < -margin
                    || self.pos.x > viewport_width + margin
                    || self.pos.y < -margin
                    || self.pos.y > viewport_height
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assets() -> Vec<FruitAsset> {
        vec![
            FruitAsset {
                id: "strawberry".into(),
                width: 60.0,
                height: 80.0,
            },
            FruitAsset {
                id: "grape".into(),
                width: 50.0,
                height: 50.0,
            },
        ]
    }

    fn fruit_at(x: f32, y: f32) -> Fruit {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut fruit = Fruit::spawn(&mut rng, 1, x, &assets(), 800.0);
        fruit.pos = Vec2::new(x, y);
        fruit
    }

    #[test]
    fn test_spawn_above_viewport() {
        let mut rng = Pcg32::seed_from_u64(9);
        for id in 0..50 {
            let fruit = Fruit::spawn(&mut rng, id, 120.0, &assets(), 800.0);
            assert!(fruit.bottom() <= 0.0);
            assert_eq!(fruit.pos.x, 120.0);
            assert_eq!(fruit.slot_x, 120.0);
            assert!(fruit.rotate_direction == 1.0 || fruit.rotate_direction == -1.0);
            assert!(fruit.is_falling());
        }
    }

    #[test]
    fn test_falling_step() {
        let mut fruit = fruit_at(100.0, 10.0);
        fruit.update(0.1, 2.0);
        assert_eq!(fruit.pos.y, 12.0);
        assert!((fruit.angle - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_direction_and_spin() {
        let mut fruit = fruit_at(110.0, 90.0);
        fruit.bounce(Vec2::new(100.0, 100.0));

        let heading = (-10.0f32).atan2(10.0);
        match fruit.motion {
            FruitMotion::Bouncing { vel, angular_vel } => {
                assert!((vel.x - heading.cos() * 6.0).abs() < 1e-5);
                assert!((vel.y - heading.sin() * 6.0).abs() < 1e-5);
                assert_eq!(angular_vel, 0.1);
            }
            other => panic!("expected bouncing, got {:?}", other),
        }
    }

    #[test]
    fn test_bounce_left_spins_backwards() {
        let mut fruit = fruit_at(90.0, 90.0);
        fruit.bounce(Vec2::new(100.0, 100.0));
        assert!(matches!(
            fruit.motion,
            FruitMotion::Bouncing { angular_vel, .. } if angular_vel == -0.1
        ));
    }

    #[test]
    fn test_bouncing_applies_gravity() {
        let mut fruit = fruit_at(100.0, 100.0);
        fruit.motion = FruitMotion::Bouncing {
            vel: Vec2::new(1.0, -2.0),
            angular_vel: 0.1,
        };
        fruit.update(0.5, 5.0);
        assert!((fruit.pos.x - 101.0).abs() < 1e-5);
        assert!((fruit.pos.y - (100.0 - 1.85)).abs() < 1e-5);
        assert!((fruit.angle - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_skewered_eases_and_ignores_fall() {
        let mut fruit = fruit_at(100.0, 100.0);
        fruit.motion = FruitMotion::Skewered { target_y: 200.0 };
        fruit.update(0.1, 50.0);
        assert!((fruit.pos.y - 105.0).abs() < 1e-5);
        assert_eq!(fruit.angle, 0.0);

        fruit.bounce(Vec2::ZERO);
        assert!(fruit.is_skewered());

        fruit.snap_to_target();
        assert_eq!(fruit.pos.y, 200.0);
    }

    #[test]
    fn test_bounds() {
        let mut fruit = fruit_at(100.0, 900.0);
        assert!(fruit.is_out_of_bounds(400.0, 800.0, 100.0));

        fruit.pos = Vec2::new(-50.0, 300.0);
        assert!(!fruit.is_out_of_bounds(400.0, 800.0, 100.0));
        fruit.motion = FruitMotion::Bouncing {
            vel: Vec2::ZERO,
            angular_vel: 0.0,
        };
        assert!(!fruit.is_out_of_bounds(400.0, 800.0, 100.0));
        fruit.pos.x = -101.0;
        assert!(fruit.is_out_of_bounds(400.0, 800.0, 100.0));
    }

    proptest! {
        #[test]
        fn prop_never_skewered_and_bouncing(ops in proptest::collection::vec(0u8..4, 0..40)) {
            let mut fruit = fruit_at(100.0, 100.0);
            let mut skewer = crate::sim::Skewer::new(100.0, 770.0);
            for op in ops {
                match op {
                    0 => {
                        skewer.add_fruit(fruit.clone());
                        fruit = skewer.fruits.pop().unwrap();
                    }
                    1 => fruit.bounce(Vec2::new(90.0, 120.0)),
                    2 => fruit.update(0.1, 2.0),
                    _ => fruit.snap_to_target(),
                }
                prop_assert!(!(fruit.is_skewered() && fruit.is_bouncing()));
            }
        }
    }
}
