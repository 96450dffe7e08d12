use clap::{Parser, Subcommand, Args, ValueEnum};

#[derive(Parser)]
#[command(name = "labsight", version, about = "Lab report analysis service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log line format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Analyze a local lab report file
    Analyze(AnalyzeArgs),
    /// List stored reports, newest first
    List(ListArgs),
    /// Show one stored report
    Show(ShowArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// SQLite database path
    #[arg(long)]
    pub db: Option<String>,

    /// Directory with the built client to serve
    #[arg(long)]
    pub static_dir: Option<String>,

    /// Do not insert the sample report into an empty database
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// PDF or image file to analyze
    pub file: String,

    /// Media type override (default: guessed from the file extension)
    #[arg(long)]
    pub media_type: Option<String>,

    /// SQLite database path
    #[arg(long)]
    pub db: Option<String>,

    /// Print the interpretation without storing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Clone)]
pub struct ListArgs {
    /// SQLite database path
    #[arg(long)]
    pub db: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ShowArgs {
    /// Report id
    pub id: i64,

    /// SQLite database path
    #[arg(long)]
    pub db: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
