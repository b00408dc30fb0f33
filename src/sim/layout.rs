//! Dot layout generation
//!
//! Scatters dots in the grid rectangle by rejection sampling against a minimum
//! spacing. After `MAX_PLACEMENT_ATTEMPTS` misses the last sample is kept even
//! if it crowds a neighbor, so a dense grid always fills up.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{DOT_SIZE, MAX_PLACEMENT_ATTEMPTS};

/// A clickable dot on the memory grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    /// Unique within a round, 0..count
    pub id: u32,
    /// Top-left position in grid pixels
    pub pos: Vec2,
}

/// Minimum spacing between dots for a grid of the given width
#[inline]
pub fn min_distance(width: f32) -> f32 {
    (width / 20.0).clamp(20.0, 30.0)
}

/// Place `count` dots inside `[0, width - DOT_SIZE] x [0, height - DOT_SIZE]`
pub fn generate_dots<R: Rng + ?Sized>(rng: &mut R, count: usize, width: f32, height: f32) -> Vec<Dot> {
    let spacing = min_distance(width);
    let max_x = (width - DOT_SIZE).max(0.0);
    let max_y = (height - DOT_SIZE).max(0.0);
    let mut dots: Vec<Dot> = Vec::with_capacity(count);

    for id in 0..count as u32 {
        let mut attempts = 0;
        let pos = loop {
            let candidate = Vec2::new(rng.random::<f32>() * max_x, rng.random::<f32>() * max_y);
            attempts += 1;
            let crowded = dots.iter().any(|d| d.pos.distance(candidate) < spacing);
            if !crowded || attempts >= MAX_PLACEMENT_ATTEMPTS {
                break candidate;
            }
        };
        dots.push(Dot { id, pos });
    }

    dots
}
