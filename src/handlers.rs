use std::sync::Arc;

use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    data_formats::{
        CommentResponse, CreateCommentRequest, CreatePostRequest, CreateUserRequest, LoginRequest,
        LoginResponse, MessageResponse, PostResponse, UpdatePostRequest, UpdateUserRequest,
        UpvoteRequest, UserResponse,
    },
    db_helpers,
    errors::RequestError,
    models::{Comment, Post},
    password::verify_password,
};

type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

// ----------------- User Handlers -----------------
pub async fn list_users(Extension(pool): Extension<Arc<SqlitePool>>) -> JsonResult<Vec<UserResponse>> {
    let users = db_helpers::list_users(&pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::new).collect()))
}

pub async fn get_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<UserResponse> {
    match db_helpers::get_user_by_id(&pool, id).await? {
        Some(user) => Ok(Json(UserResponse::new(user))),
        None => Err(RequestError::NotFound("No user found with this id")),
    }
}

pub async fn create_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreateUserRequest>,
) -> JsonResult<UserResponse> {
    let user = db_helpers::create_user(&pool, request).await?;
    tracing::info!(id = user.id, "user created");
    Ok(Json(UserResponse::new(user)))
}

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<LoginRequest>,
) -> JsonResult<LoginResponse> {
    let user = match db_helpers::get_user_by_email(&pool, &request.email).await? {
        Some(user) => user,
        None => {
            return Err(RequestError::BadCredentials(
                "No user with that email address!",
            ))
        }
    };
    let is_password_correct = verify_password(request.password, user.password.clone())
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !is_password_correct {
        return Err(RequestError::BadCredentials("Incorrect password!"));
    }
    Ok(Json(LoginResponse {
        user: UserResponse::new(user),
        message: "You are now logged in!".to_string(),
    }))
}

pub async fn update_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> JsonResult<UserResponse> {
    let user = db_helpers::update_user(&pool, id, request).await?;
    Ok(Json(UserResponse::new(user)))
}

pub async fn delete_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<MessageResponse> {
    db_helpers::delete_user(&pool, id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

// ----------------- Post Handlers -----------------
pub async fn list_posts(Extension(pool): Extension<Arc<SqlitePool>>) -> JsonResult<Vec<PostResponse>> {
    let posts = db_helpers::list_posts_with_meta(&pool).await?;
    let result = posts
        .into_iter()
        .map(|(post, comments)| PostResponse::new(post, comments))
        .collect();
    Ok(Json(result))
}

pub async fn get_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<PostResponse> {
    match db_helpers::get_post_with_meta(&pool, id).await? {
        Some((post, comments)) => Ok(Json(PostResponse::new(post, comments))),
        None => Err(RequestError::NotFound("No post found with this id")),
    }
}

pub async fn create_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreatePostRequest>,
) -> JsonResult<Post> {
    let post = db_helpers::create_post(&pool, request).await?;
    tracing::info!(id = post.id, "post created");
    Ok(Json(post))
}

pub async fn upvote_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<UpvoteRequest>,
) -> JsonResult<PostResponse> {
    let (post, comments) = db_helpers::upvote(&pool, request).await?;
    Ok(Json(PostResponse::new(post, comments)))
}

pub async fn update_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> JsonResult<MessageResponse> {
    db_helpers::update_post_title(&pool, id, &request.title).await?;
    Ok(Json(MessageResponse::new("Post updated")))
}

pub async fn delete_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<MessageResponse> {
    db_helpers::delete_post(&pool, id).await?;
    Ok(Json(MessageResponse::new("Post deleted")))
}

// ----------------- Comment Handlers -----------------
pub async fn list_comments(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<Vec<CommentResponse>> {
    let comments = db_helpers::list_comments(&pool).await?;
    Ok(Json(
        comments.into_iter().map(CommentResponse::new).collect(),
    ))
}

pub async fn create_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreateCommentRequest>,
) -> JsonResult<Comment> {
    let comment = db_helpers::create_comment(&pool, request).await?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<MessageResponse> {
    db_helpers::delete_comment(&pool, id).await?;
    Ok(Json(MessageResponse::new("Comment deleted")))
}
