pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod output;
pub mod packing;
pub mod sprite;

pub use atlas::{Atlas, AtlasBuilder, BuildReport, BuiltAtlas, IgnoreReason};
pub use cli::{CliArgs, Command};
pub use config::{AtlasParams, MissingShadowPolicy};
pub use error::{ErrorKind, TilesheetError};
pub use matching::{ShadowMatches, match_shadows};
pub use packing::GreedyPacker;
pub use sprite::{PlacedSprite, SpriteInput};
