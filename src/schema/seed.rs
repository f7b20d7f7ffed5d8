//! Seed patterns for initializing boolean automata from JSON configs.
//!
//! A seed is the serializable counterpart of an initializer closure: the CLI
//! loads one next to the engine config and installs it as the engine's
//! initializer, so `reset` reproduces the exact same starting grid.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::engine::Grid;

/// Complete seed specification for grid initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to fill the grid with.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random {
                density: 0.5,
                seed: 0,
            },
        }
    }
}

/// Predefined seeding patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Leave every cell dead.
    Blank,
    /// Bernoulli fill: each cell is alive with probability `density`,
    /// drawn from a deterministic RNG seeded with `seed`.
    Random { density: f64, seed: u64 },
    /// Explicit list of live cells. Out-of-bounds entries are ignored.
    Points { cells: Vec<(i32, i32)> },
}

impl Seed {
    /// Fill `grid` with this pattern. Deterministic for a given seed value
    /// and grid size.
    pub fn apply(&self, grid: &mut Grid<bool>) {
        match &self.pattern {
            Pattern::Blank => {}
            Pattern::Random { density, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                let density = density.clamp(0.0, 1.0);
                for y in 0..grid.height() as i32 {
                    for x in 0..grid.width() as i32 {
                        grid.set(x, y, rng.gen_bool(density));
                    }
                }
            }
            Pattern::Points { cells } => {
                for &(x, y) in cells {
                    grid.set(x, y, true);
                }
            }
        }
    }

    /// Build an initializer closure applying this seed.
    pub fn initializer(&self) -> impl FnMut(&mut Grid<bool>) + 'static {
        let seed = self.clone();
        move |grid| seed.apply(grid)
    }
}
