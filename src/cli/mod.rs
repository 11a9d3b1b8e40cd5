use clap::{Parser, Subcommand};
use sqlx::Executor;

use crate::auth::create_token;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

const SCHEMA: &str = include_str!("../../sql/jobly-schema.sql");

#[derive(Parser)]
#[command(name = "jobly")]
#[command(about = "Jobly CLI - tokens, configuration and schema for the Jobly API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print a signed bearer token")]
    Token {
        #[arg(long)]
        username: String,

        #[arg(long, help = "Grant admin rights (required for writes)")]
        admin: bool,
    },

    #[command(about = "Print the effective configuration as JSON (secret omitted)")]
    Config,

    #[command(about = "Create the companies and jobs tables if they do not exist")]
    Schema,
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Token { username, admin } => {
            let token = create_token(&username, admin, &config.security)?;
            println!("{}", token);
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        Commands::Schema => {
            let pool = DatabaseManager::connect(config).await?;
            pool.execute(SCHEMA).await?;
            println!("✓ Schema applied to {}", config.database_name());
        }
    }
    Ok(())
}
