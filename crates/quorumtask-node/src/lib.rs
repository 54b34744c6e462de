mod config;
mod cli;
mod runner;

pub use config::{init_tracing, NodeConfig};
pub use cli::{Args, Command};
pub use runner::{CommandReport, NonEmptyValidator, RoundRunner};
