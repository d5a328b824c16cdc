use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub post_url: String,
    pub user_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub comment_text: String,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
}

/// Post row as the read queries project it: the base columns plus the
/// author's username from the `user` join and the computed vote count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithMeta {
    pub id: i64,
    pub title: String,
    pub post_url: String,
    pub created_at: NaiveDateTime,
    pub vote_count: i64,
    pub username: String,
}

/// Comment row joined with the commenter's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub comment_text: String,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: NaiveDateTime,
    pub username: String,
}
