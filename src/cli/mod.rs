pub mod client;
pub mod commands;
pub mod config;
pub mod token_store;
pub mod types;
pub mod utils;
pub mod validate;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::{ApiClient, ClientError};

#[derive(Parser)]
#[command(name = "schedule")]
#[command(about = "Schedule CLI - todos, goals and the shared feed from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "API base URL (overrides SCHEDULE_API_URL)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Auth(commands::auth::AuthCommands),

    #[command(about = "Your dated todos")]
    Todo {
        #[command(subcommand)]
        cmd: commands::todo::TodoCommands,
    },

    #[command(about = "Everyone else's todos, newest first")]
    Feed(commands::feed::FeedArgs),

    #[command(about = "Your daily goals")]
    Goal {
        #[command(subcommand)]
        cmd: commands::goal::GoalCommands,
    },

    #[command(about = "Likes on todos")]
    Like {
        #[command(subcommand)]
        cmd: commands::like::LikeCommands,
    },

    #[command(about = "Comments on todos")]
    Comment {
        #[command(subcommand)]
        cmd: commands::comment::CommentCommands,
    },

    #[command(about = "Check server health")]
    Health,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let base_url = config::resolve_server_url(cli.server.as_deref())?;
    let api = ApiClient::new(base_url, token_store::select_token_store());

    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::handle(cmd, &api, output_format.clone()).await,
        Commands::Todo { cmd } => commands::todo::handle(cmd, &api, output_format.clone()).await,
        Commands::Feed(args) => commands::feed::handle(args, &api, output_format.clone()).await,
        Commands::Goal { cmd } => commands::goal::handle(cmd, &api, output_format.clone()).await,
        Commands::Like { cmd } => commands::like::handle(cmd, &api, output_format.clone()).await,
        Commands::Comment { cmd } => commands::comment::handle(cmd, &api, output_format.clone()).await,
        Commands::Health => commands::server::health(&api, output_format.clone()).await,
    };

    // JSON callers get failures on stdout in the same envelope as successes
    match (result, &output_format) {
        (Err(e), OutputFormat::Json) => {
            let code = error_code(&e);
            utils::output_error(&output_format, &e.to_string(), code)?;
            Err(e)
        }
        (result, _) => result,
    }
}

fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<ClientError>()? {
        ClientError::NotLoggedIn => Some("NOT_LOGGED_IN"),
        ClientError::SessionExpired => Some("SESSION_EXPIRED"),
        ClientError::Api { .. } => Some("API_ERROR"),
        ClientError::Invalid(_) => Some("VALIDATION_ERROR"),
        _ => None,
    }
}
