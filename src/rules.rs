//! Shipped transition rules.
//!
//! These are ordinary rule functions/closures, not a privileged part of the
//! engine: anything matching the transition-rule signature works. They
//! double as reference implementations for the neighbor-sampling contract.

use rand::Rng;

use crate::engine::Grid;

/// Conway's Game of Life (B3/S23) over boolean cells.
///
/// A live cell survives with two or three live neighbors; a dead cell is
/// born with exactly three.
pub fn conway(grid: &Grid<bool>, x: i32, y: i32, alive: bool) -> bool {
    let live = grid.neighbors8(x, y).iter().filter(|&&n| n).count();
    matches!((alive, live), (true, 2) | (true, 3) | (false, 3))
}

/// Cell states for Brian's Brain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrainCell {
    #[default]
    Dead,
    Alive,
    Dying,
}

/// Brian's Brain: alive cells always start dying, dying cells always die,
/// and a dead cell fires when exactly two neighbors are alive.
pub fn brians_brain(grid: &Grid<BrainCell>, x: i32, y: i32, cell: BrainCell) -> BrainCell {
    match cell {
        BrainCell::Alive => BrainCell::Dying,
        BrainCell::Dying => BrainCell::Dead,
        BrainCell::Dead => {
            let firing = grid
                .neighbors8(x, y)
                .iter()
                .filter(|&&n| n == BrainCell::Alive)
                .count();
            if firing == 2 {
                BrainCell::Alive
            } else {
                BrainCell::Dead
            }
        }
    }
}

/// Stochastic smoke-test rule: a cell dies when its left neighbor is alive,
/// flips a coin when its right neighbor is alive, and lives otherwise.
/// Useful for exercising the engine under a non-deterministic rule; pass a
/// seeded RNG for reproducible runs.
pub fn drift<R: Rng + 'static>(
    mut rng: R,
) -> impl FnMut(&Grid<bool>, i32, i32, bool) -> bool + 'static {
    move |grid, x, y, _| {
        if grid.get(x - 1, y) {
            false
        } else if grid.get(x + 1, y) {
            rng.gen_bool(0.5)
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Automaton;
    use crate::schema::EngineConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(width: usize, height: usize) -> EngineConfig {
        EngineConfig {
            width,
            height,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn conway_blinker_oscillates() {
        let mut automaton = Automaton::builder(config(5, 5), conway)
            .initializer(|grid| {
                grid.set(1, 2, true);
                grid.set(2, 2, true);
                grid.set(3, 2, true);
            })
            .build()
            .unwrap();

        automaton.tick();
        // Horizontal blinker flips vertical.
        assert!(automaton.get_cell(2, 1));
        assert!(automaton.get_cell(2, 2));
        assert!(automaton.get_cell(2, 3));
        assert_eq!(automaton.grid().population(), 3);

        automaton.tick();
        // And back.
        assert!(automaton.get_cell(1, 2));
        assert!(automaton.get_cell(2, 2));
        assert!(automaton.get_cell(3, 2));
        assert_eq!(automaton.grid().population(), 3);
    }

    #[test]
    fn conway_block_is_stable() {
        let mut automaton = Automaton::builder(config(4, 4), conway)
            .initializer(|grid| {
                grid.set(1, 1, true);
                grid.set(2, 1, true);
                grid.set(1, 2, true);
                grid.set(2, 2, true);
            })
            .build()
            .unwrap();

        let before = automaton.grid().clone();
        automaton.tick();
        assert_eq!(automaton.grid(), &before);
    }

    #[test]
    fn brians_brain_state_transitions() {
        let mut automaton = Automaton::builder(config(3, 3), brians_brain)
            .initializer(|grid| {
                grid.set(0, 1, BrainCell::Alive);
                grid.set(2, 1, BrainCell::Alive);
                grid.set(0, 0, BrainCell::Dying);
            })
            .build()
            .unwrap();

        automaton.tick();
        // Alive cells always decay to dying, dying to dead.
        assert_eq!(automaton.get_cell(0, 1), BrainCell::Dying);
        assert_eq!(automaton.get_cell(2, 1), BrainCell::Dying);
        assert_eq!(automaton.get_cell(0, 0), BrainCell::Dead);
        // The dead center saw exactly two alive neighbors and fires.
        assert_eq!(automaton.get_cell(1, 1), BrainCell::Alive);
        // A dead cell with one alive neighbor stays dead.
        assert_eq!(automaton.get_cell(2, 0), BrainCell::Dead);
    }

    #[test]
    fn brians_brain_three_alive_neighbors_stays_dead() {
        let mut automaton = Automaton::builder(config(3, 3), brians_brain)
            .initializer(|grid| {
                grid.set(0, 0, BrainCell::Alive);
                grid.set(2, 0, BrainCell::Alive);
                grid.set(0, 2, BrainCell::Alive);
            })
            .build()
            .unwrap();

        automaton.tick();
        assert_eq!(automaton.get_cell(1, 1), BrainCell::Dead);
    }

    #[test]
    fn drift_is_deterministic_under_a_seeded_rng() {
        let run = |seed: u64| {
            let mut automaton =
                Automaton::builder(config(8, 8), drift(StdRng::seed_from_u64(seed)))
                    .build()
                    .unwrap();
            for _ in 0..5 {
                automaton.tick();
            }
            automaton.grid().clone()
        };

        assert_eq!(run(7), run(7));
    }

    #[test]
    fn drift_kills_cells_with_live_left_neighbor() {
        let mut automaton = Automaton::builder(config(3, 1), drift(StdRng::seed_from_u64(0)))
            .initializer(|grid| grid.set(0, 0, true))
            .build()
            .unwrap();

        automaton.tick();
        // (1,0) has a live left neighbor in the old generation and dies.
        assert!(!automaton.get_cell(1, 0));
        // (2,0) has dead left and right neighbors and comes alive.
        assert!(automaton.get_cell(2, 0));
    }
}
