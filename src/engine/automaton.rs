//! The automaton state machine.
//!
//! An [`Automaton`] owns one [`Grid`], a generation counter, and the
//! user-supplied transition rule, and orchestrates the synchronous
//! generation advance plus the `start`/`stop`/`step`/`reset` lifecycle.
//! Rendering and periodic driving are delegated to externally supplied
//! collaborators behind the [`RenderSurface`] and [`Scheduler`] traits.
//!
//! # Synchronous update guarantee
//!
//! `tick` computes the entire next generation into a fresh grid before
//! swapping it in. The rule only ever receives a reference to the prior
//! generation, so no cell's computation can observe another cell's
//! post-tick value.

use std::time::Duration;

use log::{debug, trace};

use crate::render::{GridLine, RenderSurface, Rgb};
use crate::schema::{ConfigError, EngineConfig};

use super::{Cell, Grid, ScheduleHandle, Scheduler};

/// Per-cell transition rule. Receives the prior-generation grid, the cell
/// coordinates, and the cell's current value; returns the next value.
pub type TransitionRule<C> = Box<dyn FnMut(&Grid<C>, i32, i32, C) -> C>;

/// Seeds the grid at construction and on non-blank reset.
pub type Initializer<C> = Box<dyn FnMut(&mut Grid<C>)>;

/// Invoked after every completed tick with the new generation count.
pub type GenerationHook = Box<dyn FnMut(u64)>;

/// Maps a cell value to a render color; `None` means "leave background".
pub type ColorMap<C> = Box<dyn Fn(C, i32, i32) -> Option<Rgb>>;

/// Lifecycle misuse errors. Recoverable: the automaton state is unchanged
/// when one of these is returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("the automaton is already running")]
    AlreadyRunning,
    #[error("the automaton is not running")]
    NotRunning,
    #[error("no scheduler is attached")]
    NoScheduler,
}

/// A generic synchronous cellular automaton.
pub struct Automaton<C: Cell> {
    config: EngineConfig,
    grid: Grid<C>,
    generations: u64,
    rule: TransitionRule<C>,
    initializer: Option<Initializer<C>>,
    on_generation: Option<GenerationHook>,
    color_map: Option<ColorMap<C>>,
    surface: Option<Box<dyn RenderSurface>>,
    scheduler: Option<Box<dyn Scheduler>>,
    /// Live schedule handle; `Some` iff the automaton is running.
    handle: Option<ScheduleHandle>,
}

impl<C: Cell> std::fmt::Debug for Automaton<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automaton")
            .field("config", &self.config)
            .field("generations", &self.generations)
            .field("running", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

/// Staged construction for [`Automaton`]: collaborators are optional, the
/// rule is not, and the config is validated exactly once in [`build`].
///
/// [`build`]: AutomatonBuilder::build
pub struct AutomatonBuilder<C: Cell> {
    config: EngineConfig,
    rule: TransitionRule<C>,
    initializer: Option<Initializer<C>>,
    on_generation: Option<GenerationHook>,
    color_map: Option<ColorMap<C>>,
    surface: Option<Box<dyn RenderSurface>>,
    scheduler: Option<Box<dyn Scheduler>>,
}

impl<C: Cell> AutomatonBuilder<C> {
    /// Install an initializer that seeds the grid at construction and on
    /// every non-blank reset.
    pub fn initializer(mut self, f: impl FnMut(&mut Grid<C>) + 'static) -> Self {
        self.initializer = Some(Box::new(f));
        self
    }

    /// Install a hook invoked after every completed tick.
    pub fn on_generation(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.on_generation = Some(Box::new(f));
        self
    }

    /// Install the cell-value-to-color mapping used by render passes.
    pub fn color_map(mut self, f: impl Fn(C, i32, i32) -> Option<Rgb> + 'static) -> Self {
        self.color_map = Some(Box::new(f));
        self
    }

    /// Attach a render surface. The engine resizes it to
    /// `width * cell_scale` by `height * cell_scale` pixels.
    pub fn surface(mut self, surface: impl RenderSurface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Attach the scheduler that will drive `start`/`pump`.
    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// Validate the configuration and construct the automaton: allocate the
    /// grid, run the initializer once, perform an initial render pass if a
    /// surface is attached, and start the schedule if `auto_tick` is set.
    pub fn build(self) -> Result<Automaton<C>, ConfigError> {
        self.config.validate()?;
        if self.config.auto_tick && self.scheduler.is_none() {
            return Err(ConfigError::AutoTickWithoutScheduler);
        }

        let grid = Grid::new(self.config.width, self.config.height);
        let mut automaton = Automaton {
            config: self.config,
            grid,
            generations: 0,
            rule: self.rule,
            initializer: self.initializer,
            on_generation: self.on_generation,
            color_map: self.color_map,
            surface: self.surface,
            scheduler: self.scheduler,
            handle: None,
        };

        if let Some(init) = automaton.initializer.as_mut() {
            init(&mut automaton.grid);
        }
        if automaton.surface.is_some() {
            automaton.resize_surface();
            automaton.draw();
        }
        if automaton.config.auto_tick {
            // Scheduler presence was checked above.
            automaton
                .start()
                .map_err(|_| ConfigError::AutoTickWithoutScheduler)?;
        }

        Ok(automaton)
    }
}

impl<C: Cell> Automaton<C> {
    /// Start building an automaton from a config and a transition rule.
    pub fn builder(
        config: EngineConfig,
        rule: impl FnMut(&Grid<C>, i32, i32, C) -> C + 'static,
    ) -> AutomatonBuilder<C> {
        AutomatonBuilder {
            config,
            rule: Box::new(rule),
            initializer: None,
            on_generation: None,
            color_map: None,
            surface: None,
            scheduler: None,
        }
    }

    /// Advance exactly one generation.
    ///
    /// The whole next generation is computed from the current grid in
    /// row-major order, then swapped in; the generation counter increments
    /// by one, the generation hook fires, and if `auto_draw` is set a
    /// render pass runs.
    pub fn tick(&mut self) {
        let mut next = Grid::new(self.grid.width(), self.grid.height());
        {
            let rule = &mut self.rule;
            let grid = &self.grid;
            for y in 0..grid.height() as i32 {
                for x in 0..grid.width() as i32 {
                    next.set(x, y, rule(grid, x, y, grid.get(x, y)));
                }
            }
        }
        self.grid = next;
        self.generations += 1;
        trace!("advanced to generation {}", self.generations);

        if let Some(hook) = self.on_generation.as_mut() {
            hook(self.generations);
        }
        if self.config.auto_draw {
            self.draw();
        }
    }

    /// Register the periodic schedule at `1 / tick_speed` seconds per tick.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.handle.is_some() {
            return Err(EngineError::AlreadyRunning);
        }
        let scheduler = self.scheduler.as_mut().ok_or(EngineError::NoScheduler)?;
        let period = Duration::from_secs_f32(1.0 / self.config.tick_speed);
        self.handle = Some(scheduler.schedule(period));
        debug!(
            "started: {:.1} ticks/s ({:?} period)",
            self.config.tick_speed, period
        );
        Ok(())
    }

    /// Cancel the periodic schedule. After this returns, no further tick
    /// can be delivered through `pump`.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        let handle = self.handle.take().ok_or(EngineError::NotRunning)?;
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.cancel(handle);
        }
        debug!("stopped at generation {}", self.generations);
        Ok(())
    }

    /// Run every tick the scheduler reports as due. Host loops call this
    /// while the automaton is running; it is a no-op when idle.
    pub fn pump(&mut self) {
        let Some(handle) = self.handle else {
            return;
        };
        let due = match self.scheduler.as_mut() {
            Some(scheduler) => scheduler.due_ticks(handle),
            None => 0,
        };
        for _ in 0..due {
            self.tick();
        }
    }

    /// Manual single-generation advance. Ignored while running (the
    /// schedule is the tick source then); returns whether a tick ran.
    pub fn step(&mut self) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.tick();
        true
    }

    /// Stop if running, zero the generation counter, reallocate the grid,
    /// re-run the initializer unless `blank_reset` is set, and repaint.
    pub fn reset(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.cancel(handle);
            }
        }
        self.generations = 0;
        self.grid = Grid::new(self.config.width, self.config.height);
        if !self.config.blank_reset {
            if let Some(init) = self.initializer.as_mut() {
                init(&mut self.grid);
            }
        }
        debug!("reset");
        self.resize_surface();
        self.draw();
    }

    /// Full render pass: clear to the background color, paint every cell
    /// the color map resolves, then overlay grid lines. No-op without a
    /// surface.
    pub fn draw(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let config = &self.config;
        let scale = config.cell_scale;

        surface.clear(config.bg_color);
        if let Some(color_map) = self.color_map.as_deref() {
            for (x, y, value) in self.grid.iter() {
                if let Some(color) = color_map(value, x, y) {
                    surface.fill_cell(x as u32, y as u32, scale, color);
                }
            }
        }

        let lines = &config.grid_lines;
        if lines.draw {
            for x in (0..config.width as u32).step_by(lines.every as usize) {
                surface.fill_grid_line(GridLine::Vertical { x_px: x * scale }, lines.color);
            }
            for y in (0..config.height as u32).step_by(lines.every as usize) {
                surface.fill_grid_line(GridLine::Horizontal { y_px: y * scale }, lines.color);
            }
        }
    }

    fn resize_surface(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            let width_px = self.config.width as u32 * self.config.cell_scale;
            let height_px = self.config.height as u32 * self.config.cell_scale;
            surface.resize(width_px, height_px);
        }
    }

    /// True iff a schedule handle is held.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Completed generations since construction or the last reset.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    /// Cell value at `(x, y)`; the cell default when out of bounds.
    pub fn get_cell(&self, x: i32, y: i32) -> C {
        self.grid.get(x, y)
    }

    /// Write a cell value; silently ignored out of bounds.
    pub fn set_cell(&mut self, x: i32, y: i32, value: C) {
        self.grid.set(x, y, value);
    }

    /// Moore-neighborhood values around `(x, y)` in the documented order.
    pub fn get_neighbors(&self, x: i32, y: i32) -> [C; 8] {
        self.grid.neighbors8(x, y)
    }

    /// Read-only view of the current generation.
    pub fn grid(&self) -> &Grid<C> {
        &self.grid
    }

    /// The resolved configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.grid.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ManualScheduler;
    use crate::render::PixelSurface;
    use crate::rules::conway;
    use std::cell::{Cell as StdCell, RefCell};
    use std::rc::Rc;

    fn small_config(width: usize, height: usize) -> EngineConfig {
        EngineConfig {
            width,
            height,
            ..EngineConfig::default()
        }
    }

    fn identity(_: &Grid<bool>, _: i32, _: i32, v: bool) -> bool {
        v
    }

    #[test]
    fn build_rejects_invalid_dimensions() {
        let err = Automaton::builder(small_config(0, 5), identity)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidDimensions);
    }

    #[test]
    fn build_rejects_auto_tick_without_scheduler() {
        let mut config = small_config(4, 4);
        config.auto_tick = true;
        let err = Automaton::builder(config, identity).build().unwrap_err();
        assert_eq!(err, ConfigError::AutoTickWithoutScheduler);
    }

    #[test]
    fn initializer_runs_once_at_construction() {
        let calls = Rc::new(StdCell::new(0u32));
        let counter = Rc::clone(&calls);
        let automaton = Automaton::builder(small_config(4, 4), identity)
            .initializer(move |grid| {
                counter.set(counter.get() + 1);
                grid.set(2, 2, true);
            })
            .build()
            .unwrap();
        assert_eq!(calls.get(), 1);
        assert!(automaton.get_cell(2, 2));
        assert_eq!(automaton.generations(), 0);
        assert!(!automaton.is_running());
    }

    #[test]
    fn tick_observes_only_the_prior_generation() {
        // Shift rule: each cell copies its left neighbor. With in-place
        // updates a single live cell would smear across the whole row;
        // synchronous update moves it by exactly one column per tick.
        let mut automaton = Automaton::builder(small_config(4, 1), |grid, x, y, _| {
            grid.get(x - 1, y)
        })
        .initializer(|grid| grid.set(0, 0, true))
        .build()
        .unwrap();

        automaton.tick();
        assert_eq!(automaton.generations(), 1);
        assert!(!automaton.get_cell(0, 0));
        assert!(automaton.get_cell(1, 0));
        assert!(!automaton.get_cell(2, 0));
        assert!(!automaton.get_cell(3, 0));
    }

    #[test]
    fn generation_hook_sees_each_new_count() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut automaton = Automaton::builder(small_config(3, 3), identity)
            .on_generation(move |n| sink.borrow_mut().push(n))
            .build()
            .unwrap();
        automaton.tick();
        automaton.tick();
        automaton.tick();
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn lone_conway_cell_dies() {
        let mut automaton = Automaton::builder(small_config(3, 3), conway)
            .initializer(|grid| grid.set(1, 1, true))
            .build()
            .unwrap();
        automaton.tick();
        assert_eq!(automaton.grid().population(), 0);
        assert_eq!(automaton.generations(), 1);
    }

    #[test]
    fn all_alive_conway_corners_survive() {
        let mut automaton = Automaton::builder(small_config(5, 5), conway)
            .initializer(|grid| {
                for y in 0..5 {
                    for x in 0..5 {
                        grid.set(x, y, true);
                    }
                }
            })
            .build()
            .unwrap();
        automaton.tick();

        // Corners have 3 live neighbors and survive; every other cell has
        // 5 or 8 and dies of overpopulation.
        for y in 0..5 {
            for x in 0..5 {
                let corner = (x == 0 || x == 4) && (y == 0 || y == 4);
                assert_eq!(automaton.get_cell(x, y), corner, "cell ({x}, {y})");
            }
        }
        assert_eq!(automaton.grid().population(), 4);
    }

    #[test]
    fn start_twice_fails() {
        let mut automaton = Automaton::builder(small_config(3, 3), identity)
            .scheduler(ManualScheduler::new())
            .build()
            .unwrap();
        automaton.start().unwrap();
        assert!(automaton.is_running());
        assert_eq!(automaton.start(), Err(EngineError::AlreadyRunning));
        assert!(automaton.is_running());
    }

    #[test]
    fn stop_when_idle_fails() {
        let mut automaton = Automaton::builder(small_config(3, 3), identity)
            .scheduler(ManualScheduler::new())
            .build()
            .unwrap();
        assert_eq!(automaton.stop(), Err(EngineError::NotRunning));
        automaton.start().unwrap();
        automaton.stop().unwrap();
        assert_eq!(automaton.stop(), Err(EngineError::NotRunning));
    }

    #[test]
    fn start_without_scheduler_fails() {
        let mut automaton = Automaton::builder(small_config(3, 3), identity)
            .build()
            .unwrap();
        assert_eq!(automaton.start(), Err(EngineError::NoScheduler));
    }

    #[test]
    fn pump_runs_exactly_the_due_ticks() {
        let scheduler = Rc::new(RefCell::new(ManualScheduler::new()));
        let mut automaton = Automaton::builder(small_config(3, 3), identity)
            .scheduler(Rc::clone(&scheduler))
            .build()
            .unwrap();

        automaton.start().unwrap();
        automaton.pump();
        assert_eq!(automaton.generations(), 0);

        scheduler.borrow_mut().fire(3);
        automaton.pump();
        assert_eq!(automaton.generations(), 3);

        automaton.pump();
        assert_eq!(automaton.generations(), 3);
    }

    #[test]
    fn stop_prevents_further_ticks() {
        let scheduler = Rc::new(RefCell::new(ManualScheduler::new()));
        let mut automaton = Automaton::builder(small_config(3, 3), identity)
            .scheduler(Rc::clone(&scheduler))
            .build()
            .unwrap();

        automaton.start().unwrap();
        scheduler.borrow_mut().fire(5);
        automaton.stop().unwrap();
        automaton.pump();
        assert_eq!(automaton.generations(), 0);
        assert!(!scheduler.borrow().has_schedules());
    }

    #[test]
    fn step_is_ignored_while_running() {
        let mut automaton = Automaton::builder(small_config(3, 3), identity)
            .scheduler(ManualScheduler::new())
            .build()
            .unwrap();

        assert!(automaton.step());
        assert_eq!(automaton.generations(), 1);

        automaton.start().unwrap();
        assert!(!automaton.step());
        assert_eq!(automaton.generations(), 1);
    }

    #[test]
    fn auto_tick_starts_running_at_construction() {
        let scheduler = Rc::new(RefCell::new(ManualScheduler::new()));
        let mut config = small_config(3, 3);
        config.auto_tick = true;
        let mut automaton = Automaton::builder(config, identity)
            .scheduler(Rc::clone(&scheduler))
            .build()
            .unwrap();

        assert!(automaton.is_running());
        scheduler.borrow_mut().fire(2);
        automaton.pump();
        assert_eq!(automaton.generations(), 2);
    }

    #[test]
    fn reset_reproduces_the_initial_grid() {
        let mut automaton = Automaton::builder(small_config(4, 4), conway)
            .initializer(|grid| {
                grid.set(1, 1, true);
                grid.set(2, 1, true);
                grid.set(1, 2, true);
                grid.set(2, 2, true);
            })
            .build()
            .unwrap();

        let initial = automaton.grid().clone();
        automaton.tick();
        automaton.tick();
        assert_eq!(automaton.generations(), 2);

        automaton.reset();
        assert_eq!(automaton.generations(), 0);
        assert_eq!(automaton.grid(), &initial);
    }

    #[test]
    fn blank_reset_skips_the_initializer() {
        let mut config = small_config(4, 4);
        config.blank_reset = true;
        let mut automaton = Automaton::builder(config, identity)
            .initializer(|grid| grid.set(0, 0, true))
            .build()
            .unwrap();

        assert_eq!(automaton.grid().population(), 1);
        automaton.reset();
        assert_eq!(automaton.grid().population(), 0);
        assert_eq!(automaton.generations(), 0);
    }

    #[test]
    fn reset_stops_a_running_automaton() {
        let scheduler = Rc::new(RefCell::new(ManualScheduler::new()));
        let mut automaton = Automaton::builder(small_config(3, 3), identity)
            .scheduler(Rc::clone(&scheduler))
            .build()
            .unwrap();

        automaton.start().unwrap();
        automaton.reset();
        assert!(!automaton.is_running());
        assert!(!scheduler.borrow().has_schedules());
        // start/reset are idempotent partners: restarting works.
        automaton.start().unwrap();
        assert!(automaton.is_running());
    }

    #[test]
    fn construction_resizes_the_surface() {
        let surface = Rc::new(RefCell::new(PixelSurface::new(0, 0)));
        let mut config = small_config(4, 3);
        config.cell_scale = 2;
        let _automaton = Automaton::builder(config, identity)
            .surface(Rc::clone(&surface))
            .build()
            .unwrap();
        assert_eq!(surface.borrow().width(), 8);
        assert_eq!(surface.borrow().height(), 6);
    }

    #[test]
    fn draw_paints_mapped_cells_and_background() {
        let surface = Rc::new(RefCell::new(PixelSurface::new(0, 0)));
        let mut config = small_config(2, 2);
        config.cell_scale = 1;
        config.grid_lines.draw = false;
        let mut automaton = Automaton::builder(config, identity)
            .initializer(|grid| grid.set(1, 0, true))
            .color_map(|alive: bool, _, _| alive.then_some(Rgb::BLACK))
            .surface(Rc::clone(&surface))
            .build()
            .unwrap();

        automaton.draw();
        let surface = surface.borrow();
        assert_eq!(surface.pixel(1, 0), Some(Rgb::BLACK));
        assert_eq!(surface.pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(surface.pixel(0, 1), Some(Rgb::WHITE));
    }

    #[test]
    fn auto_draw_repaints_after_tick() {
        let surface = Rc::new(RefCell::new(PixelSurface::new(0, 0)));
        let mut config = small_config(3, 1);
        config.cell_scale = 1;
        config.grid_lines.draw = false;
        // Shift-right rule again; the painted pixel must follow the cell.
        let mut automaton = Automaton::builder(config, |grid: &Grid<bool>, x, y, _| {
            grid.get(x - 1, y)
        })
        .initializer(|grid| grid.set(0, 0, true))
        .color_map(|alive: bool, _, _| alive.then_some(Rgb::BLACK))
        .surface(Rc::clone(&surface))
        .build()
        .unwrap();

        assert_eq!(surface.borrow().pixel(0, 0), Some(Rgb::BLACK));
        automaton.tick();
        assert_eq!(surface.borrow().pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(surface.borrow().pixel(1, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn grid_lines_overlay_on_top_of_cells() {
        let surface = Rc::new(RefCell::new(PixelSurface::new(0, 0)));
        let mut config = small_config(2, 2);
        config.cell_scale = 4;
        config.grid_lines.every = 1;
        config.grid_lines.color = Rgb::GRAY;
        let mut automaton = Automaton::builder(config, identity)
            .color_map(|alive: bool, _, _| alive.then_some(Rgb::BLACK))
            .surface(Rc::clone(&surface))
            .build()
            .unwrap();

        automaton.set_cell(0, 0, true);
        automaton.draw();
        let surface = surface.borrow();
        // Line columns/rows sit at multiples of cell_scale.
        assert_eq!(surface.pixel(0, 0), Some(Rgb::GRAY));
        assert_eq!(surface.pixel(4, 0), Some(Rgb::GRAY));
        assert_eq!(surface.pixel(0, 4), Some(Rgb::GRAY));
        // Interior of the live cell stays black.
        assert_eq!(surface.pixel(2, 2), Some(Rgb::BLACK));
    }
}
