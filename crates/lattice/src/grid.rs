//! Per-cell occupancy storage.
//!
//! A [`Grid`] is a fixed-size row-major array of cells, each holding an
//! insertion-ordered bag of values (typically agent ids). It is pure
//! storage: no bounds wrapping, no collision logic, no knowledge of what
//! the values mean. Callers must pass in-bounds coordinates.

use glam::IVec2;

/// Fixed-size 2D array of insertion-ordered occupancy bags.
///
/// Generic over the occupant type so the substrate stays engine-agnostic;
/// the simulation crate instantiates it with its agent id type.
#[derive(Debug, Clone)]
pub struct Grid<T: Copy + PartialEq> {
    width: i32,
    height: i32,
    cells: Vec<Vec<T>>,
}

impl<T: Copy + PartialEq> Grid<T> {
    /// Creates an empty grid of `width * height` cells.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Vec::new(); len],
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, pos: IVec2) -> usize {
        debug_assert!(
            pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height,
            "grid access out of bounds: {pos}"
        );
        (pos.y * self.width + pos.x) as usize
    }

    /// The occupants of the cell at `pos`, in insertion order.
    #[must_use]
    pub fn at(&self, pos: IVec2) -> &[T] {
        &self.cells[self.index(pos)]
    }

    /// Appends `value` to the bag at `pos`.
    pub fn insert(&mut self, pos: IVec2, value: T) {
        let idx = self.index(pos);
        self.cells[idx].push(value);
    }

    /// Removes the first occurrence of `value` from the bag at `pos`.
    ///
    /// Returns false when the value was not present.
    pub fn remove(&mut self, pos: IVec2, value: T) -> bool {
        let idx = self.index(pos);
        let bag = &mut self.cells[idx];
        match bag.iter().position(|v| *v == value) {
            Some(i) => {
                bag.remove(i);
                true
            }
            None => false,
        }
    }

    /// Iterates all cells in row-major order with their occupant bags.
    ///
    /// This is the surface rendering consumers read each frame.
    // Cell count fits i32 by construction (width * height is i32).
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &[T])> + '_ {
        self.cells.iter().enumerate().map(|(i, bag)| {
            let i = i as i32;
            (IVec2::new(i % self.width, i / self.width), bag.as_slice())
        })
    }

    /// Total number of occupants across all cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// True when no cell has any occupant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }
}
