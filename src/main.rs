//! DB Playground - a terminal SQL playground over in-memory sample tables.

use db_playground::cli::Cli;
use db_playground::config::Config;
use db_playground::error::Result;
use db_playground::{logging, tui};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();

    logging::init(logging::LogTarget::for_mode(cli.is_headless()));

    match run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);

    if cli.is_headless() {
        return tui::headless::run_headless(cli, &config).await;
    }

    tui::run(&config).await?;
    Ok(0)
}
