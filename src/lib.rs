//! Generic synchronous cellular automaton engine.
//!
//! This crate advances a rectangular grid of opaque cell values through
//! generations using a user-supplied transition rule. Every generation is
//! computed from the previous one as a whole, so rules never observe
//! partially updated state. Rendering and periodic driving are pluggable
//! collaborators behind narrow traits, keeping the core headless-testable.
//!
//! # Architecture
//!
//! - `engine`: the [`Grid`], the [`Automaton`] state machine, and the
//!   [`Scheduler`] collaborators.
//! - `schema`: serde configuration ([`EngineConfig`]) and seed patterns.
//! - `render`: the [`RenderSurface`] trait and an in-memory pixel surface.
//! - `rules`: shipped example rules (Conway, Brian's Brain, a stochastic
//!   drift rule).
//!
//! # Example
//!
//! ```rust
//! use automata::{Automaton, EngineConfig, rules::conway};
//!
//! let config = EngineConfig {
//!     width: 5,
//!     height: 5,
//!     ..EngineConfig::default()
//! };
//!
//! // A horizontal blinker.
//! let mut automaton = Automaton::builder(config, conway)
//!     .initializer(|grid| {
//!         grid.set(1, 2, true);
//!         grid.set(2, 2, true);
//!         grid.set(3, 2, true);
//!     })
//!     .build()
//!     .unwrap();
//!
//! automaton.tick();
//! assert_eq!(automaton.generations(), 1);
//! assert!(automaton.get_cell(2, 1)); // flipped vertical
//! ```

pub mod engine;
pub mod render;
pub mod rules;
pub mod schema;

// Re-export commonly used types
pub use engine::{
    Automaton, AutomatonBuilder, Cell, EngineError, Grid, IntervalScheduler, ManualScheduler,
    ScheduleHandle, Scheduler,
};
pub use render::{GridLine, PixelSurface, RenderSurface, Rgb};
pub use schema::{ConfigError, EngineConfig, GridLinesConfig, Pattern, Seed};
