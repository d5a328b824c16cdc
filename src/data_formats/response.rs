use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{CommentWithAuthor, PostWithMeta, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        MessageResponse {
            message: message.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub message: String,
}

/// The slice of the author row that rides along on posts and comments.
#[derive(Deserialize, Serialize, Debug)]
pub struct AuthorResponse {
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    pub comment_text: String,
    pub post_id: i64,
    pub user_id: i64,
    pub created_at: NaiveDateTime,
    pub user: AuthorResponse,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostResponse {
    pub id: i64,
    pub post_url: String,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub vote_count: i64,
    pub comments: Vec<CommentResponse>,
    pub user: AuthorResponse,
}

impl UserResponse {
    pub fn new(
        User {
            id,
            username,
            email,
            ..
        }: User,
    ) -> Self {
        UserResponse {
            id,
            username,
            email,
        }
    }
}

impl CommentResponse {
    pub fn new(
        CommentWithAuthor {
            id,
            comment_text,
            user_id,
            post_id,
            created_at,
            username,
        }: CommentWithAuthor,
    ) -> Self {
        CommentResponse {
            id,
            comment_text,
            post_id,
            user_id,
            created_at,
            user: AuthorResponse { username },
        }
    }
}

impl PostResponse {
    pub fn new(post: PostWithMeta, comments: Vec<CommentWithAuthor>) -> Self {
        let PostWithMeta {
            id,
            title,
            post_url,
            created_at,
            vote_count,
            username,
        } = post;
        PostResponse {
            id,
            post_url,
            title,
            created_at,
            vote_count,
            comments: comments.into_iter().map(CommentResponse::new).collect(),
            user: AuthorResponse { username },
        }
    }
}
