use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use super::today;
use crate::cli::client::{ApiClient, ImageFile};
use crate::cli::utils::{output_list, output_success, todo_line};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TodoCommands {
    #[command(about = "List your todos for a day")]
    List {
        #[arg(long, help = "Day as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },

    #[command(about = "Add a todo with text, an image, or both")]
    Add {
        #[arg(help = "Todo text")]
        content: Option<String>,
        #[arg(long, help = "Day as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
        #[arg(long, help = "Image file (jpeg, jpg, png, gif; 5MB max)")]
        image: Option<PathBuf>,
    },

    #[command(about = "Change the text or image of a todo")]
    Edit {
        #[arg(help = "Todo ID")]
        id: i64,
        #[arg(long, help = "New text")]
        content: Option<String>,
        #[arg(long, help = "Replacement image file")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete a todo")]
    Delete {
        #[arg(help = "Todo ID")]
        id: i64,
    },
}

pub async fn handle(cmd: TodoCommands, api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TodoCommands::List { date } => {
            let date = date.unwrap_or_else(today);
            let todos = api.list_todos(&date).await?;
            output_list(&output_format, "todos", &todos, &format!("No todos for {}", date), todo_line)
        }
        TodoCommands::Add { content, date, image } => {
            let content = content.as_deref().map(str::trim).filter(|c| !c.is_empty());
            if content.is_none() && image.is_none() {
                anyhow::bail!("Please enter some text or attach an image");
            }

            let image = match image {
                Some(path) => Some(ImageFile::load(&path).await?),
                None => None,
            };
            let date = date.unwrap_or_else(today);

            let todo_id = api.create_todo(content, &date, image).await?;
            output_success(&output_format, &format!("Todo {} added", todo_id), Some(json!({ "todoId": todo_id })))
        }
        TodoCommands::Edit { id, content, image } => {
            if content.is_none() && image.is_none() {
                anyhow::bail!("Nothing to change: pass --content and/or --image");
            }

            let image = match image {
                Some(path) => Some(ImageFile::load(&path).await?),
                None => None,
            };

            api.update_todo(id, content.as_deref(), image).await?;
            output_success(&output_format, &format!("Todo {} updated", id), None)
        }
        TodoCommands::Delete { id } => {
            api.delete_todo(id).await?;
            output_success(&output_format, &format!("Todo {} deleted", id), None)
        }
    }
}
