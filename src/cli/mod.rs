pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, HealthArgs, RunArgs};
pub use handlers::{collect_source_paths, handle_health, handle_run};
