use clap::Parser;
use flogin::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run(config).await,
        Command::Migrate { revert } => cli::migrate::run(config, revert).await,
        Command::MigrateCredentials => cli::migrate::run_credentials(config).await,
    }
}
