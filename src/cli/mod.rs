pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, FormatArgs, OutputFormatArg, RunArgs};
pub use output::{OutputFormat, OutputFormatter, ProviderStatus};
