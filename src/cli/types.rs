use serde::{Deserialize, Serialize};

/// Profile returned with a login token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    pub date: String,
    pub image_url: Option<String>,
    pub user_id: i64,
    pub user_name: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(flatten)]
    pub todo: Todo,
    pub like_count: i64,
    pub is_liked: bool,
    #[serde(default)]
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub todos: Vec<FeedItem>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub is_completed: bool,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub created_at: String,
    pub user_id: i64,
    pub user_name: String,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub like_count: i64,
    pub is_liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feed_item_reads_flattened_todo() {
        let item: FeedItem = serde_json::from_value(json!({
            "id": 4,
            "content": "run",
            "date": "2024-01-01",
            "imageUrl": null,
            "userId": 2,
            "userName": "Bob",
            "createdAt": "2024-01-01T08:00:00Z",
            "likeCount": 3,
            "isLiked": true,
            "commentCount": 1
        }))
        .unwrap();

        assert_eq!(item.todo.user_name, "Bob");
        assert_eq!(item.like_count, 3);
        assert!(item.is_liked);
    }
}
