//! LPR Uslugi bot CLI entry point.

use clap::Parser;

use uslugi_bot::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve(args) => uslugi_bot::cli::commands::serve::execute(args, config_path).await,
        Commands::SetWebhook(args) => {
            uslugi_bot::cli::commands::webhook::execute(args, config_path, cli.json).await
        }
        Commands::CheckConfig(args) => {
            uslugi_bot::cli::commands::config::execute(&args, config_path, cli.json)
        }
    };

    if let Err(err) = result {
        uslugi_bot::cli::handle_error(err, cli.json);
    }
}
