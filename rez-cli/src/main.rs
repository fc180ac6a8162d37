//! REZ CLI - Command line tool for exploring renewable-energy zones.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "rez-cli",
    version,
    about = "Renewable energy zone explorer toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: rez_cmd::Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    rez_cmd::run(cli.command).await
}
