pub mod auth;
pub mod comment;
pub mod feed;
pub mod goal;
pub mod like;
pub mod server;
pub mod todo;

/// Today's local date as `YYYY-MM-DD`
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
