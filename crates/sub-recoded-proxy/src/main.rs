mod cli;

use clap::Parser;
use cli::{handle_config, load_config, rewrite_document, run_proxy, Cli, Commands};
use sub_recoded_proxy::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            init_logging(&config.logging, cli.verbose, cli.quiet)?;
            run_proxy(&config).await?;
        }
        Commands::Rewrite { base, proxy_base, file } => {
            rewrite_document(&config, &base, proxy_base, file)?;
        }
        Commands::Config { action } => {
            handle_config(&config, action)?;
        }
    }

    Ok(())
}
