//! Collision detection between falling fruit and the skewer
//!
//! Two checks: the catch window at the skewer tip, and repulsion off an
//! already-full stack.

use glam::Vec2;

use super::fruit::Fruit;
use super::skewer::Skewer;
use crate::consts::{CATCH_BAND, CATCH_RADIUS_X, STACK_OVERLAP_TOLERANCE};

/// Whether a free fruit's leading edge is sweeping through the tip's catch window.
///
/// The window is thin, so a fruit moving more than `CATCH_BAND` per frame can
/// pass through without being caught.
pub fn collides(fruit: &Fruit, skewer: &Skewer) -> bool {
    if fruit.is_skewered() {
        return false;
    }

    let tip_y = skewer.tip_y();
    let bottom = fruit.bottom();
    (fruit.pos.x - skewer.x).abs() <= CATCH_RADIUS_X && bottom >= tip_y && bottom <= tip_y + CATCH_BAND
}

/// Center of the first stacked fruit a falling fruit overlaps, if any.
///
/// Stack order decides ties; there is no nearest-match search.
pub fn stacked_contact(fruit: &Fruit, skewer: &Skewer) -> Option<Vec2> {
    if !fruit.is_falling() {
        return None;
    }

    skewer
        .fruits
        .iter()
        .find(|stacked| {
            let reach = fruit.half_extent() + stacked.half_extent() - STACK_OVERLAP_TOLERANCE;
            fruit.pos.distance(stacked.pos) < reach
        })
        .map(|stacked| stacked.pos)
}
