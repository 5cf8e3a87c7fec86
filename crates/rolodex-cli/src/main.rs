//! Rolodex CLI - Save profile pages to a Google Sheet.

use clap::Parser;
use rolodex_cli::commands;
use rolodex_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> rolodex_cli::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await?,
        Command::Save(args) => commands::execute_save(args, &config, &formatter).await?,
        Command::Note(args) => commands::execute_note(args, &config, &formatter).await?,
        Command::Review(args) => commands::execute_review(args, &config, &formatter).await?,
        Command::Auth(args) => {
            commands::execute_auth(args, &mut config, &config_path, &formatter).await?
        }
        Command::Settings(args) => {
            commands::execute_settings(args, &mut config, &config_path, &formatter).await?
        }
        Command::Serve(args) => commands::execute_serve(args, config, config_path).await?,
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
