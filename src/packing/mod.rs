mod grid;
mod greedy;
mod rect;

pub use greedy::GreedyPacker;
pub use grid::OccupancyGrid;
pub use rect::Rect;
