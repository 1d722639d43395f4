use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::{comment_line, output_list, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum CommentCommands {
    #[command(about = "List comments on a todo, oldest first")]
    List {
        #[arg(help = "Todo ID")]
        todo_id: i64,
    },

    #[command(about = "Comment on a todo")]
    Add {
        #[arg(help = "Todo ID")]
        todo_id: i64,
        #[arg(help = "Comment text")]
        content: String,
    },

    #[command(about = "Delete one of your comments")]
    Delete {
        #[arg(help = "Comment ID")]
        id: i64,
    },
}

pub async fn handle(cmd: CommentCommands, api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CommentCommands::List { todo_id } => {
            let comments = api.list_comments(todo_id).await?;
            output_list(&output_format, "comments", &comments, "No comments yet", comment_line)
        }
        CommentCommands::Add { todo_id, content } => {
            let content = content.trim();
            if content.is_empty() {
                anyhow::bail!("Please enter a comment");
            }

            let comment = api.add_comment(todo_id, content).await?;
            output_success(
                &output_format,
                &format!("Comment {} added", comment.id),
                Some(json!({ "comment": comment })),
            )
        }
        CommentCommands::Delete { id } => {
            api.delete_comment(id).await?;
            output_success(&output_format, &format!("Comment {} deleted", id), None)
        }
    }
}
