use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use campusfix::{relay, Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "campusfix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer with a deterministic offline client instead of calling Gemini
    #[arg(long, global = true)]
    mock_llm: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = ContainerConfig::from_env();
    config.mock_llm = cli.mock_llm;
    config.complaints_file = cli.command.complaints_file().cloned();

    let container = Container::new(config).await?;

    if let Commands::Serve { port, public } = cli.command {
        let host = if public {
            Ipv4Addr::UNSPECIFIED
        } else {
            Ipv4Addr::LOCALHOST
        };
        info!("Starting CampusFix relay with model {}", container.model_name());
        relay::serve(container.relay_state(), SocketAddr::from((host, port))).await?;
        return Ok(());
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
