mod load;
mod save;
mod types;

pub use load::LoadedConfig;
pub use save::{relative_pattern, save_config};
pub use types::{
    AtlasParams, CONFIG_VERSION, CompressConfig, MissingShadowPolicy, TilesheetConfig,
};
