use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::cli::token_store::{valid_token, TokenStore};
use crate::cli::types::{Comment, Feed, Goal, LikeStatus, LoginResponse, Todo};
use crate::cli::validate::{image_mime, validate_image};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not logged in. Run `schedule login` first")]
    NotLoggedIn,

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Invalid(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Local I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Image to attach to a todo form
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Read and check an image from disk before it is sent
    pub async fn load(path: &Path) -> Result<Self, ClientError> {
        let size = tokio::fs::metadata(path).await?.len();
        validate_image(path, size).map_err(ClientError::Invalid)?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(Self {
            file_name,
            mime: image_mime(path),
            bytes: tokio::fs::read(path).await?,
        })
    }

    fn into_part(self) -> Result<Part, ClientError> {
        Ok(Part::bytes(self.bytes).file_name(self.file_name).mime_str(self.mime)?)
    }
}

/// Typed wrapper over the scheduling API
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(mut base_url: Url, store: Arc<dyn TokenStore>) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            base_url,
            http: reqwest::Client::new(),
            store,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn url_with_query(&self, path: &str, pairs: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = self.url(path)?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send without credentials and return the success body
    async fn send_public(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        read_body(response).await
    }

    /// Send with the stored bearer token. A 401 means the server no longer
    /// accepts the session, so the token is dropped locally as well.
    async fn send_authed(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let token = valid_token(self.store.as_ref())?.ok_or(ClientError::NotLoggedIn)?;

        let response = request.bearer_auth(token).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("Server rejected session, clearing stored token");
            self.store.remove()?;
            return Err(ClientError::SessionExpired);
        }

        read_body(response).await
    }

    // Auth

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<i64, ClientError> {
        let request = self
            .http
            .post(self.url("/api/auth/signup")?)
            .json(&json!({ "name": name, "email": email, "password": password }));
        let body = self.send_public(request).await?;
        field(body, "userId")
    }

    /// Log in and keep the returned token in the store
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/api/auth/login")?)
            .json(&json!({ "email": email, "password": password }));
        let body = self.send_public(request).await?;

        let login: LoginResponse = serde_json::from_value(body)?;
        self.store.set(&login.token)?;
        Ok(login)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.remove()?;
        Ok(())
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let response = self.http.get(self.url("/health")?).send().await?;
        Ok(response.json().await?)
    }

    // Todos

    pub async fn list_todos(&self, date: &str) -> Result<Vec<Todo>, ClientError> {
        let url = self.url_with_query("/api/todos", &[("date", date.to_string())])?;
        let body = self.send_authed(self.http.get(url)).await?;
        field(body, "todos")
    }

    pub async fn create_todo(
        &self,
        content: Option<&str>,
        date: &str,
        image: Option<ImageFile>,
    ) -> Result<i64, ClientError> {
        let mut form = Form::new().text("date", date.to_string());
        if let Some(content) = content {
            form = form.text("content", content.to_string());
        }
        if let Some(image) = image {
            form = form.part("image", image.into_part()?);
        }

        let request = self.http.post(self.url("/api/todos")?).multipart(form);
        let body = self.send_authed(request).await?;
        field(body, "todoId")
    }

    pub async fn update_todo(
        &self,
        id: i64,
        content: Option<&str>,
        image: Option<ImageFile>,
    ) -> Result<(), ClientError> {
        let mut form = Form::new();
        if let Some(content) = content {
            form = form.text("content", content.to_string());
        }
        if let Some(image) = image {
            form = form.part("image", image.into_part()?);
        }

        let request = self.http.patch(self.url(&format!("/api/todos/{}", id))?).multipart(form);
        self.send_authed(request).await?;
        Ok(())
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&format!("/api/todos/{}", id))?);
        self.send_authed(request).await?;
        Ok(())
    }

    pub async fn feed(&self, page: Option<u32>, limit: Option<u32>) -> Result<Feed, ClientError> {
        let mut pairs = Vec::new();
        if let Some(page) = page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = limit {
            pairs.push(("limit", limit.to_string()));
        }

        let url = self.url_with_query("/api/todos/feed", &pairs)?;
        let body = self.send_authed(self.http.get(url)).await?;
        Ok(serde_json::from_value(body)?)
    }

    // Goals

    pub async fn list_goals(&self, date: &str) -> Result<Vec<Goal>, ClientError> {
        let url = self.url_with_query("/api/goals", &[("date", date.to_string())])?;
        let body = self.send_authed(self.http.get(url)).await?;
        field(body, "goals")
    }

    pub async fn create_goal(&self, title: &str, date: &str) -> Result<i64, ClientError> {
        let request = self
            .http
            .post(self.url("/api/goals")?)
            .json(&json!({ "title": title, "date": date }));
        let body = self.send_authed(request).await?;
        field(body, "goalId")
    }

    pub async fn complete_goal(&self, id: i64) -> Result<(), ClientError> {
        let request = self.http.patch(self.url(&format!("/api/goals/{}/complete", id))?);
        self.send_authed(request).await?;
        Ok(())
    }

    // Likes

    /// Returns whether the caller now likes the todo
    pub async fn toggle_like(&self, todo_id: i64) -> Result<bool, ClientError> {
        let request = self.http.post(self.url(&format!("/api/todos/{}/like", todo_id))?);
        let body = self.send_authed(request).await?;
        field(body, "liked")
    }

    pub async fn like_status(&self, todo_id: i64) -> Result<LikeStatus, ClientError> {
        let request = self.http.get(self.url(&format!("/api/todos/{}/likes", todo_id))?);
        let body = self.send_authed(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    // Comments

    pub async fn list_comments(&self, todo_id: i64) -> Result<Vec<Comment>, ClientError> {
        let request = self.http.get(self.url(&format!("/api/todos/{}/comments", todo_id))?);
        let body = self.send_authed(request).await?;
        field(body, "comments")
    }

    pub async fn add_comment(&self, todo_id: i64, content: &str) -> Result<Comment, ClientError> {
        let request = self
            .http
            .post(self.url(&format!("/api/todos/{}/comments", todo_id))?)
            .json(&json!({ "content": content }));
        let body = self.send_authed(request).await?;
        field(body, "comment")
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&format!("/api/comments/{}", id))?);
        self.send_authed(request).await?;
        Ok(())
    }
}

/// Success body, or the server's `message` as an `Api` error
async fn read_body(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() && body["success"] == Value::Bool(true) {
        return Ok(body);
    }

    let message = body["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

fn field<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, ClientError> {
    Ok(serde_json::from_value(body[key].take())?)
}
