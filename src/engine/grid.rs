//! Grid storage and bounds-checked cell access.
//!
//! The grid is the only state a transition rule may observe. Out-of-bounds
//! reads return the cell default and out-of-bounds writes are ignored, so
//! rules can sample past the board edge without special-casing it: the edge
//! behaves like a fixed border of default ("dead") cells.

/// Marker trait for cell values.
///
/// The engine never interprets a cell value; it only needs to copy it,
/// produce a default (the out-of-bounds sentinel), and compare it for
/// population counting. Any such type is a cell.
pub trait Cell: Copy + Default + PartialEq + 'static {}

impl<T: Copy + Default + PartialEq + 'static> Cell for T {}

/// Moore neighborhood offsets in the order `neighbors8` reports them:
/// column-major over (dx, dy), skipping (0, 0).
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Rectangular cell grid with row-major storage (`index = y * width + x`).
///
/// `cells.len() == width * height` holds after every mutation; `set` cannot
/// grow or shrink the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<C> {
    width: usize,
    height: usize,
    cells: Vec<C>,
}

impl<C: Cell> Grid<C> {
    /// Allocate a grid filled with the cell default.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![C::default(); width * height],
        }
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for degenerate zero-area grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index for in-bounds coordinates.
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// Value at `(x, y)`, or the cell default when out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> C {
        match self.index(x, y) {
            Some(idx) => self.cells[idx],
            None => C::default(),
        }
    }

    /// Write `value` at `(x, y)`. Out-of-bounds writes are silently dropped,
    /// mirroring the read contract.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: C) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = value;
        }
    }

    /// The eight Moore-neighborhood values around `(x, y)`, in
    /// [`NEIGHBOR_OFFSETS`] order. Neighbors past the board edge read as the
    /// cell default. The order is fixed so rule evaluation is reproducible.
    pub fn neighbors8(&self, x: i32, y: i32) -> [C; 8] {
        let mut out = [C::default(); 8];
        for (slot, (dx, dy)) in out.iter_mut().zip(NEIGHBOR_OFFSETS) {
            *slot = self.get(x + dx, y + dy);
        }
        out
    }

    /// Row-major iterator over `(x, y, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, C)> + '_ {
        self.cells.iter().enumerate().map(|(idx, &value)| {
            (
                (idx % self.width) as i32,
                (idx / self.width) as i32,
                value,
            )
        })
    }

    /// Raw row-major cell slice.
    pub fn cells(&self) -> &[C] {
        &self.cells
    }

    /// Number of cells holding a non-default value.
    pub fn population(&self) -> usize {
        let default = C::default();
        self.cells.iter().filter(|&&c| c != default).count()
    }
}
