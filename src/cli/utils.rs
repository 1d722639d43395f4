use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::types::{Comment, FeedItem, Goal, Todo};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print a collection as JSON, or one text line per item
pub fn output_list<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[T],
    empty_message: &str,
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: items }))?);
        }
        OutputFormat::Text if items.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for item in items {
                println!("{}", line(item));
            }
        }
    }
    Ok(())
}

pub fn todo_line(todo: &Todo) -> String {
    let mut line = format!("[{}] {}", todo.id, todo.content);
    if let Some(image) = &todo.image_url {
        line.push_str(&format!(" (image: {})", image));
    }
    line
}

pub fn feed_line(item: &FeedItem) -> String {
    let heart = if item.is_liked { "♥" } else { "♡" };
    format!(
        "[{}] {} {}: {}  {} {}  💬 {}",
        item.todo.id, item.todo.date, item.todo.user_name, item.todo.content, heart, item.like_count, item.comment_count
    )
}

pub fn goal_line(goal: &Goal) -> String {
    let mark = if goal.is_completed { "x" } else { " " };
    format!("[{}] [{}] {}", goal.id, mark, goal.title)
}

pub fn comment_line(comment: &Comment) -> String {
    format!("[{}] {} ({}): {}", comment.id, comment.user_name, comment.created_at, comment.content)
}
