//! Engine module - grid storage, the automaton state machine, and
//! scheduling collaborators.

mod automaton;
mod grid;
mod scheduler;

pub use automaton::*;
pub use grid::*;
pub use scheduler::*;
