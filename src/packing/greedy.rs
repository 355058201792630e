use super::{OccupancyGrid, Rect};

/// First-fit tile packer.
///
/// Rows are scanned from the top and columns from the left; the first
/// position whose whole footprint is free wins. Results depend on insertion
/// order and are not globally dense.
#[derive(Debug, Clone)]
pub struct GreedyPacker {
    grid: OccupancyGrid,
}

impl GreedyPacker {
    pub fn new(width: u32) -> Self {
        Self {
            grid: OccupancyGrid::new(width),
        }
    }

    /// Place a `width` x `height` footprint and return where it landed.
    ///
    /// Returns `None` only for footprints that can never fit: zero-sized or
    /// wider than the grid. Height is unbounded, so everything else succeeds.
    pub fn insert(&mut self, width: u32, height: u32) -> Option<Rect> {
        let rect = self.find_position(width, height)?;
        self.grid.occupy(&rect);
        Some(rect)
    }

    /// Find the first-fit position without occupying it
    pub fn find_position(&self, width: u32, height: u32) -> Option<Rect> {
        if width == 0 || height == 0 || width > self.grid.width() {
            return None;
        }

        // The row just past the arena is empty, so the scan always succeeds there
        (0..=self.grid.rows()).find_map(|y| {
            (0..self.grid.width()).find_map(|x| {
                if x + width > self.grid.width() || self.grid.is_occupied(x, y) {
                    return None;
                }
                let candidate = Rect::new(x, y, width, height);
                self.grid.is_free(&candidate).then_some(candidate)
            })
        })
    }

    /// Minimal number of rows containing every placement
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Fraction of tiles in the used area that are occupied (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let total = u64::from(self.grid.width()) * u64::from(self.height());
        if total == 0 {
            return 0.0;
        }
        self.grid.occupied_count() as f64 / total as f64
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_insert() {
        let mut packer = GreedyPacker::new(6);
        let rect = packer.insert(1, 1).unwrap();

        assert_eq!(rect, Rect::new(0, 0, 1, 1));
        assert_eq!(packer.height(), 1);
    }

    #[test]
    fn test_fills_row_before_moving_down() {
        let mut packer = GreedyPacker::new(3);
        let positions: Vec<_> = (0..4)
            .map(|_| {
                let r = packer.insert(1, 1).unwrap();
                (r.x, r.y)
            })
            .collect();

        assert_eq!(positions, vec![(0, 0), (1, 0), (2, 0), (0, 1)]);
        assert_eq!(packer.height(), 2);
    }

    #[test]
    fn test_skips_past_occupied_cells() {
        let mut packer = GreedyPacker::new(6);
        packer.insert(1, 1).unwrap();

        let wide = packer.insert(2, 1).unwrap();
        let small = packer.insert(1, 1).unwrap();

        assert_eq!((wide.x, wide.y), (1, 0));
        assert_eq!((small.x, small.y), (3, 0));
        assert_eq!(packer.height(), 1);
    }

    #[test]
    fn test_tall_footprint_blocks_rows_below() {
        let mut packer = GreedyPacker::new(2);
        let tall = packer.insert(1, 3).unwrap();
        let wide = packer.insert(2, 1).unwrap();
        let small = packer.insert(1, 1).unwrap();

        assert_eq!((tall.x, tall.y), (0, 0));
        // Cannot fit beside the tall sprite, so it lands below it
        assert_eq!((wide.x, wide.y), (0, 3));
        // Backfills the gap next to the tall sprite
        assert_eq!((small.x, small.y), (1, 0));
        assert_eq!(packer.height(), 4);
    }

    #[test]
    fn test_full_width_footprint() {
        let mut packer = GreedyPacker::new(6);
        let rect = packer.insert(6, 2).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 6, 2));
        assert!((packer.occupancy() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_degenerate_footprints() {
        let mut packer = GreedyPacker::new(6);
        assert!(packer.insert(7, 1).is_none());
        assert!(packer.insert(0, 1).is_none());
        assert!(packer.insert(1, 0).is_none());
        assert_eq!(packer.height(), 0);
        assert_eq!(packer.grid().occupied_count(), 0);
    }

    #[test]
    fn test_no_overlaps_for_mixed_sequence() {
        let sizes = [
            (2, 1),
            (1, 3),
            (3, 2),
            (1, 1),
            (4, 1),
            (2, 2),
            (1, 1),
            (5, 1),
            (1, 2),
            (3, 3),
            (1, 1),
            (2, 4),
        ];
        let mut packer = GreedyPacker::new(5);
        let placed: Vec<Rect> = sizes
            .iter()
            .map(|&(w, h)| packer.insert(w, h).unwrap())
            .collect();

        for (i, a) in placed.iter().enumerate() {
            assert!(a.right() <= 5, "{:?} exceeds grid width", a);
            for b in &placed[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }

        let tiles: u64 = placed.iter().map(Rect::area).sum();
        assert_eq!(packer.grid().occupied_count() as u64, tiles);
    }

    #[test]
    fn test_deterministic_for_identical_state() {
        let build = || {
            let mut packer = GreedyPacker::new(4);
            packer.insert(3, 1).unwrap();
            packer.insert(1, 2).unwrap();
            packer
        };

        let mut a = build();
        let mut b = build();
        assert_eq!(a.find_position(2, 2), b.find_position(2, 2));
        assert_eq!(a.insert(2, 2), b.insert(2, 2));
    }

    #[test]
    fn test_height_row_is_free_and_rows_above_are_not() {
        let mut packer = GreedyPacker::new(3);
        for &(w, h) in &[(1, 2), (3, 1), (2, 1), (1, 1)] {
            packer.insert(w, h).unwrap();
        }

        let height = packer.height();
        assert!(packer.grid().row_is_empty(height));
        for y in 0..height {
            assert!(!packer.grid().row_is_empty(y));
        }
    }
}
