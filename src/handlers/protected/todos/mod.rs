// handlers/protected/todos/mod.rs - /api/todos handlers
//
// GET    /api/todos?date=YYYY-MM-DD   list   - caller's todos for a day
// POST   /api/todos                   create - multipart: content?, date, image?
// PATCH  /api/todos/:id               update - multipart: content?, image?
// DELETE /api/todos/:id               delete
// GET    /api/todos/feed?page&limit   feed   - other users' todos

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::services::ImageUpload;

pub mod create;
pub mod delete;
pub mod feed;
pub mod list;
pub mod update;

pub use create::create;
pub use delete::delete;
pub use feed::feed;
pub use list::list;
pub use update::update;

/// Fields of the multipart form used by create and update
#[derive(Debug, Default)]
pub struct TodoForm {
    pub content: Option<String>,
    pub date: Option<String>,
    pub image: Option<ImageUpload>,
}

impl TodoForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = TodoForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("content") => form.content = Some(field.text().await?),
                Some("date") => form.date = Some(field.text().await?),
                Some("image") => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    // browsers send an empty part when no file was picked
                    if !(file_name.is_empty() && bytes.is_empty()) {
                        form.image = Some(ImageUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Content with surrounding whitespace removed; `None` when blank
    pub fn trimmed_content(&self) -> Option<String> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}
