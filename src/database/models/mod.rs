pub mod comment;
pub mod goal;
pub mod todo;
pub mod user;

pub use comment::CommentView;
pub use goal::Goal;
pub use todo::{FeedTodo, StoredTodo, TodoView};
pub use user::{User, UserSummary};
