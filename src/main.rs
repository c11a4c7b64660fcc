use toolharvest::cli::commands::{CliArgs, Commands};
use toolharvest::cli::handlers::{handle_config, handle_providers, handle_run};
use toolharvest::config::AppConfig;
use toolharvest::util::logging::{parse_level, LoggingConfig};
use toolharvest::util::init_logging;
use toolharvest::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config = AppConfig::load(args.config.as_deref());
    let configured_level = config.as_ref().ok().map(|c| c.crawler.log_level.as_str());
    init_logging_from_args(&args, configured_level);

    debug!("toolharvest v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let exit_code = match &args.command {
        Commands::Run(run_args) => handle_run(run_args, &config, args.quiet).await,
        Commands::Providers(format_args) => handle_providers(format_args, &config),
        Commands::Config(format_args) => handle_config(format_args, &config),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, configured_level: Option<&str>) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        configured_level.map(parse_level).unwrap_or(Level::WARN)
    };

    let mut config = LoggingConfig::with_level(level).with_json(args.log_json);
    if args.log_file {
        config = config.with_log_dir(".");
    }
    init_logging(config);
}
