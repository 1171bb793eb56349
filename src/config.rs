//! Command line and environment configuration.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};

/// A GraphQL demo server over an in-memory library of authors and books.
#[derive(Parser, Debug)]
#[command(name = "bookshelf", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,

    /// Start with no authors and no books instead of the seed data
    #[arg(long, global = true, env = "BOOKSHELF_EMPTY")]
    pub empty: bool,

    /// Log filter, in `tracing_subscriber::EnvFilter` syntax
    #[arg(
        long,
        global = true,
        env = "BOOKSHELF_LOG",
        default_value = "bookshelf=info,tower_http=info"
    )]
    pub log: String,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve the GraphQL endpoint over HTTP (the default)
    Serve,
    /// Read one query per line from stdin and print each result
    Console,
    /// Print the GraphQL schema and exit
    Sdl,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(
        long,
        global = true,
        env = "BOOKSHELF_LISTEN",
        default_value = "0.0.0.0:5000"
    )]
    pub listen: SocketAddr,

    /// Do not serve the GraphiQL page on `GET /graphql`
    #[arg(long, global = true, env = "BOOKSHELF_NO_GRAPHIQL")]
    pub no_graphiql: bool,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
