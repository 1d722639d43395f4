use clap::Args;

use crate::cli::client::ApiClient;
use crate::cli::utils::feed_line;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct FeedArgs {
    #[arg(long, help = "Page number (defaults to 1)")]
    pub page: Option<u32>,
    #[arg(long, help = "Todos per page (defaults to 10)")]
    pub limit: Option<u32>,
}

/// Other users' todos, newest first
pub async fn handle(args: FeedArgs, api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let feed = api.feed(args.page, args.limit).await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&feed)?),
        OutputFormat::Text => {
            if feed.todos.is_empty() {
                println!("Nothing in the feed yet");
            }
            for item in &feed.todos {
                println!("{}", feed_line(item));
            }
            println!("-- page {} of {} ({} todos)", feed.current_page, feed.total_pages.max(1), feed.total);
        }
    }
    Ok(())
}
