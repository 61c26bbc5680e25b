use clap::Parser;
use patch_server::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    patch_server::init_tracing();
    let cli = Cli::parse();
    patch_server::run(cli).await
}
