use clap::Parser;
use labsight::cli::{self, commands::LogFormat};
use labsight::config;
use labsight::errors::LabsightError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color);
    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        cli::Commands::Serve(args) => cli::serve::handle_serve(args, config_path).await,
        cli::Commands::Analyze(args) => cli::analyze::handle_analyze(args, config_path).await,
        cli::Commands::List(args) => cli::query::handle_list(args, config_path).await,
        cli::Commands::Show(args) => cli::query::handle_show(args, config_path).await,
        cli::Commands::Validate(args) => handle_validate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            LabsightError::Config(_) => 2,
            LabsightError::Database(_) => 3,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), LabsightError> {
    let path = std::path::PathBuf::from(&args.config);
    let config = config::parse_config(&path).await?;
    println!("Configuration is valid: {}", args.config);
    print!("{}", serde_yaml::to_string(&config.redacted())?);
    Ok(())
}
