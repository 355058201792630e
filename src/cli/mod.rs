mod args;

pub use args::{BuildArgs, CliArgs, Command, CompressionLevel, InitArgs, MatchArgs};
