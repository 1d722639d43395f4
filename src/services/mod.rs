pub mod comment_service;
pub mod goal_service;
pub mod like_service;
pub mod todo_service;
pub mod upload_service;
pub mod user_service;

pub use comment_service::CommentService;
pub use goal_service::GoalService;
pub use like_service::{LikeService, LikeStatus};
pub use todo_service::{FeedPage, TodoService};
pub use upload_service::{ImageUpload, UploadError, UploadStore};
pub use user_service::UserService;
