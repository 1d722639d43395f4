use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum LikeCommands {
    #[command(about = "Like a todo, or remove your like")]
    Toggle {
        #[arg(help = "Todo ID")]
        todo_id: i64,
    },

    #[command(about = "Show like count and whether you liked a todo")]
    Status {
        #[arg(help = "Todo ID")]
        todo_id: i64,
    },
}

pub async fn handle(cmd: LikeCommands, api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        LikeCommands::Toggle { todo_id } => {
            let liked = api.toggle_like(todo_id).await?;
            let message = if liked { "Like added" } else { "Like removed" };
            output_success(&output_format, message, Some(json!({ "liked": liked })))
        }
        LikeCommands::Status { todo_id } => {
            let status = api.like_status(todo_id).await?;
            let message = format!(
                "{} like(s){}",
                status.like_count,
                if status.is_liked { ", including yours" } else { "" }
            );
            output_success(&output_format, &message, Some(serde_json::to_value(&status)?))
        }
    }
}
