//! Symmetry test patterns
//!
//! A pattern is a square grid of filled/empty cells stored row-major. Cells are
//! generated in index order and every neighbor lookup only sees cells that were
//! already generated, so the generators are sequential rather than a 2D pass.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::PatternComplexity;

/// State of a single pattern cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Filled,
    Empty,
}

impl Cell {
    #[inline]
    pub fn is_filled(self) -> bool {
        self == Cell::Filled
    }
}

/// A `size` x `size` grid of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    size: usize,
    cells: Vec<Cell>,
}

impl Pattern {
    /// All-empty pattern
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Wrap row-major cells; `None` unless there are exactly `size * size`
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Option<Self> {
        (cells.len() == size * size).then_some(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }

    /// Reflect left-right: column `c` moves to `size - 1 - c` in every row
    pub fn mirror(&self) -> Pattern {
        let size = self.size;
        let mut cells = vec![Cell::Empty; self.cells.len()];
        for row in 0..size {
            for col in 0..size {
                cells[row * size + (size - 1 - col)] = self.cells[row * size + col];
            }
        }
        Pattern { size, cells }
    }

    /// True if `other` is the left-right reflection of `self`
    pub fn mirrors(&self, other: &Pattern) -> bool {
        self.size == other.size && self.mirror() == *other
    }
}

/// Reflect a pattern left-right
pub fn mirror_pattern(pattern: &Pattern) -> Pattern {
    pattern.mirror()
}

/// Generate a pattern with the algorithm for `complexity`
pub fn generate_pattern<R: Rng + ?Sized>(
    rng: &mut R,
    complexity: PatternComplexity,
    filled_chance: f64,
    size: usize,
) -> Pattern {
    let cells = match complexity {
        PatternComplexity::Simple => generate_simple(rng, size, filled_chance),
        PatternComplexity::Moderate => generate_moderate(rng, size, filled_chance),
        PatternComplexity::Complex => generate_complex(rng, size, filled_chance),
        PatternComplexity::Expert => generate_expert(rng, size, filled_chance),
    };
    Pattern { size, cells }
}

/// Relative boost when the previous cell or the one above is filled
const SIMPLE_RUN_BOOST: f64 = 1.3;
/// Fill chance next to an already filled cell
const MODERATE_CLUSTER_CHANCE: f64 = 0.6;
const MODERATE_ISOLATED_FACTOR: f64 = 0.9;
/// Cluster centers placed for complex patterns (inclusive range)
const COMPLEX_MIN_CLUSTERS: usize = 2;
const COMPLEX_MAX_CLUSTERS: usize = 4;
const COMPLEX_BASE_FACTOR: f64 = 0.3;
const COMPLEX_MAX_CHANCE: f64 = 0.9;
const EXPERT_MAX_CHANCE: f64 = 0.95;

#[inline]
fn draw<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> Cell {
    if rng.random::<f64>() < chance {
        Cell::Filled
    } else {
        Cell::Empty
    }
}

/// Filled 8-neighbors of `index` among the cells generated so far
fn filled_neighbors(cells: &[Cell], index: usize, size: usize) -> usize {
    let row = (index / size) as isize;
    let col = (index % size) as isize;
    let size = size as isize;
    let mut count = 0;

    for dr in -1..=1 {
        for dc in -1..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let (r, c) = (row + dr, col + dc);
            if r < 0 || r >= size || c < 0 || c >= size {
                continue;
            }
            let neighbor = (r * size + c) as usize;
            if neighbor < cells.len() && cells[neighbor].is_filled() {
                count += 1;
            }
        }
    }
    count
}

/// Level 1: independent draws with a small bias toward horizontal/vertical runs
fn generate_simple<R: Rng + ?Sized>(rng: &mut R, size: usize, filled_chance: f64) -> Vec<Cell> {
    let total = size * size;
    let mut cells = Vec::with_capacity(total);

    for i in 0..total {
        let previous = i > 0 && cells[i - 1] == Cell::Filled;
        let above = i >= size && cells[i - size] == Cell::Filled;

        let mut chance = filled_chance;
        if previous || above {
            chance *= SIMPLE_RUN_BOOST;
        }
        let cell = draw(rng, chance.min(1.0));
        cells.push(cell);
    }
    cells
}

/// Level 2: cells next to filled cells fill at a fixed higher rate
fn generate_moderate<R: Rng + ?Sized>(rng: &mut R, size: usize, filled_chance: f64) -> Vec<Cell> {
    let total = size * size;
    let mut cells = Vec::with_capacity(total);

    for i in 0..total {
        let chance = if filled_neighbors(&cells, i, size) > 0 {
            MODERATE_CLUSTER_CHANCE
        } else {
            filled_chance * MODERATE_ISOLATED_FACTOR
        };
        let cell = draw(rng, chance);
        cells.push(cell);
    }
    cells
}

struct ClusterCenter {
    row: f64,
    col: f64,
    strength: f64,
}

/// Level 3: fill chance falls off exponentially around random cluster centers
fn generate_complex<R: Rng + ?Sized>(rng: &mut R, size: usize, filled_chance: f64) -> Vec<Cell> {
    let clusters = rng.random_range(COMPLEX_MIN_CLUSTERS..=COMPLEX_MAX_CLUSTERS);
    let centers: Vec<ClusterCenter> = (0..clusters)
        .map(|_| ClusterCenter {
            row: rng.random_range(0..size) as f64,
            col: rng.random_range(0..size) as f64,
            strength: rng.random_range(0.3..0.8),
        })
        .collect();

    let total = size * size;
    let mut cells = Vec::with_capacity(total);

    for i in 0..total {
        let row = (i / size) as f64;
        let col = (i % size) as f64;

        let influence: f64 = centers
            .iter()
            .map(|c| {
                let distance = ((row - c.row).powi(2) + (col - c.col).powi(2)).sqrt();
                c.strength * (-distance / 2.0).exp()
            })
            .sum();

        let chance = (influence + filled_chance * COMPLEX_BASE_FACTOR).min(COMPLEX_MAX_CHANCE);
        cells.push(draw(rng, chance));
    }
    cells
}

/// Level 4: checkerboard, diagonal and edge weighting plus noise and neighbor pull
fn generate_expert<R: Rng + ?Sized>(rng: &mut R, size: usize, filled_chance: f64) -> Vec<Cell> {
    let total = size * size;
    let mut cells = Vec::with_capacity(total);

    for i in 0..total {
        let row = i / size;
        let col = i % size;
        let mut chance = filled_chance;

        if (row + col) % 2 == 0 {
            chance *= 1.1;
        }
        if row.abs_diff(col) <= 1 {
            chance *= 1.15;
        }
        let edge_distance = row.min(col).min(size - 1 - row).min(size - 1 - col);
        if edge_distance <= 1 {
            chance *= 0.9;
        }

        chance += rng.random_range(-0.1..0.1);

        if i > 0 {
            match filled_neighbors(&cells, i, size) {
                0 => {}
                1 => chance *= 1.1,
                _ => chance *= 1.3,
            }
        }

        let chance = chance.clamp(0.0, EXPERT_MAX_CHANCE);
        cells.push(draw(rng, chance));
    }
    cells
}
