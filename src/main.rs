use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Cli, Command};
use server::make_app;
use store::{MemoryStore, Records};

mod config;
mod console;
mod datamodel;
mod server;
mod store;

#[cfg(test)]
mod client;
#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let command = cli.command_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).context("invalid log filter")?)
        .with_writer(std::io::stderr)
        .init();

    let store = if cli.empty {
        MemoryStore::new(Records::default())
    } else {
        MemoryStore::seeded()
    };
    let repository = store.shared();

    match command {
        Command::Serve => {
            let app = make_app(repository, !cli.serve.no_graphiql);

            let listener = tokio::net::TcpListener::bind(cli.serve.listen)
                .await
                .with_context(|| format!("failed to bind {}", cli.serve.listen))?;
            tracing::info!(address = %cli.serve.listen, "listening");
            axum::serve(listener, app).await?;
        }
        Command::Console => {
            let schema = server::build_schema(repository.clone());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            console::run(&schema, &repository, stdin, tokio::io::stdout()).await?;
        }
        Command::Sdl => {
            print!("{}", server::build_schema(repository).sdl());
        }
    }

    Ok(())
}
