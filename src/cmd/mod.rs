use crate::{pkg::server::listen, prelude::Result, token::create_token};
use clap::{Parser, Subcommand};

mod migrate;

#[derive(Parser)]
#[command(about = "starts lite job board web services")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    Listen,
    Migrate,
    /// Mint a bearer token for the given user
    Token {
        username: String,
        #[arg(long)]
        admin: bool,
    },
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        Some(SubCommandType::Token { username, admin }) => {
            println!("{}", create_token(&username, admin)?);
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
