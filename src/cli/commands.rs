use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Harvests AI tool records from LLM providers into a deduplicated dataset
#[derive(Parser, Debug)]
#[command(
    name = "toolharvest",
    about = "Harvests AI tool records from LLM providers into a deduplicated dataset",
    version,
    author,
    long_about = "toolharvest asks one or more LLM providers (DeepSeek, SiliconFlow, Kimi, \
                  Doubao or any OpenAI-compatible endpoint) for AI tool records, then merges \
                  them into a JSON dataset, deduplicating by URL and name."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'c',
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (defaults to $TOOLHARVEST_CONFIG, then ./toolharvest.yaml)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose output (debug level)")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(
        long,
        global = true,
        help = "Also write logs to toolharvest_YYYYMMDD.log in the current directory"
    )]
    pub log_file: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Extract tools from providers and merge them into the dataset",
        long_about = "Prompts each selected provider for AI tool records, deduplicates them, \
                      merges them with the existing dataset and saves the result.\n\n\
                      Examples:\n  \
                      toolharvest run\n  \
                      toolharvest run --content 'AI video editors'\n  \
                      toolharvest run --providers deepseek,kimi\n  \
                      toolharvest run --single --format json"
    )]
    Run(RunArgs),

    #[command(
        about = "List configured providers and their availability",
        long_about = "Shows each provider from the config file, the model it uses and whether \
                      its API key environment variable is set.\n\n\
                      Examples:\n  \
                      toolharvest providers\n  \
                      toolharvest providers --format json"
    )]
    Providers(FormatArgs),

    #[command(about = "Print the resolved configuration (API keys are never shown)")]
    Config(FormatArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(
        long,
        env = "TOOLHARVEST_CONTENT",
        default_value = "",
        hide_env_values = true,
        help = "Seed content embedded in the extraction prompt"
    )]
    pub content: String,

    #[arg(
        short = 'p',
        long,
        env = "TOOLHARVEST_PROVIDERS",
        value_name = "LIST",
        help = "Comma-separated providers to query (defaults to every available provider)"
    )]
    pub providers: Option<String>,

    #[arg(long, help = "Query only the first selected provider")]
    pub single: bool,

    #[arg(
        long,
        value_name = "FILE",
        help = "Dataset file (overrides data.data_dir/data.tools_file)"
    )]
    pub data_file: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct FormatArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
