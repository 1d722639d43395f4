use clap::Subcommand;
use serde_json::json;

use super::today;
use crate::cli::client::ApiClient;
use crate::cli::utils::{goal_line, output_list, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum GoalCommands {
    #[command(about = "List your goals for a day")]
    List {
        #[arg(long, help = "Day as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },

    #[command(about = "Add a goal")]
    Add {
        #[arg(help = "Goal title")]
        title: String,
        #[arg(long, help = "Day as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },

    #[command(about = "Mark a goal as achieved")]
    Complete {
        #[arg(help = "Goal ID")]
        id: i64,
    },
}

pub async fn handle(cmd: GoalCommands, api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::List { date } => {
            let date = date.unwrap_or_else(today);
            let goals = api.list_goals(&date).await?;
            output_list(&output_format, "goals", &goals, &format!("No goals for {}", date), goal_line)
        }
        GoalCommands::Add { title, date } => {
            let title = title.trim();
            if title.is_empty() {
                anyhow::bail!("Please enter a goal title");
            }

            let date = date.unwrap_or_else(today);
            let goal_id = api.create_goal(title, &date).await?;
            output_success(&output_format, &format!("Goal {} added", goal_id), Some(json!({ "goalId": goal_id })))
        }
        GoalCommands::Complete { id } => {
            api.complete_goal(id).await?;
            output_success(&output_format, &format!("Goal {} completed", id), None)
        }
    }
}
