use super::Rect;

/// Occupancy map for a raster of fixed width and unbounded height.
///
/// Cells live in a flat arena indexed by `y * width + x`. Rows are
/// allocated on demand when a rectangle is occupied below the current
/// bottom, so any row past [`OccupancyGrid::rows`] reads as free. Cells are
/// never cleared once occupied.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            rows: 0,
            cells: Vec::new(),
        }
    }

    /// Grid width in cells
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows backed by the arena
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns true if the cell is occupied. Columns outside `[0, width)` count
    /// as occupied so that nothing can ever be placed there.
    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        if x >= self.width {
            return true;
        }
        if y >= self.rows {
            return false;
        }
        self.cells[self.index(x, y)]
    }

    /// Check that every cell of `rect` is inside the grid and unoccupied,
    /// stopping at the first conflict.
    pub fn is_free(&self, rect: &Rect) -> bool {
        if rect.right() > self.width {
            return false;
        }
        for dx in 0..rect.width {
            for dy in 0..rect.height {
                if self.is_occupied(rect.x + dx, rect.y + dy) {
                    return false;
                }
            }
        }
        true
    }

    /// Mark every cell of `rect` as occupied, growing the arena as needed.
    ///
    /// Callers must check [`OccupancyGrid::is_free`] first.
    pub fn occupy(&mut self, rect: &Rect) {
        debug_assert!(self.is_free(rect), "occupying a non-free rectangle");
        self.grow_to(rect.bottom());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let idx = self.index(x, y);
                self.cells[idx] = true;
            }
        }
    }

    /// Returns true if no cell in row `y` is occupied
    pub fn row_is_empty(&self, y: u32) -> bool {
        (0..self.width).all(|x| !self.is_occupied(x, y))
    }

    /// First row, scanning from the top, in which every column is free.
    ///
    /// Always terminates: the row just past the arena is free by construction.
    pub fn height(&self) -> u32 {
        (0..=self.rows)
            .find(|&y| self.row_is_empty(y))
            .unwrap_or(self.rows)
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn grow_to(&mut self, rows: u32) {
        if rows > self.rows {
            self.rows = rows;
            self.cells
                .resize(self.rows as usize * self.width as usize, false);
        }
    }
}
