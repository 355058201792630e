mod builder;
mod report;
mod types;

pub use builder::{AtlasBuilder, BuiltAtlas, footprint};
pub use report::{BuildReport, IgnoreReason, IgnoredSprite};
pub use types::Atlas;
