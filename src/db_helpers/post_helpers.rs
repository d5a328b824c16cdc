use std::collections::HashMap;

use sqlx::{Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    data_formats::CreatePostRequest,
    errors::RequestError,
    models::{CommentWithAuthor, Post, PostWithMeta},
    schema::{self, Entity},
};

use super::comment_helpers::comment_with_author_query;

const POST_COLUMNS: &str = "id, title, post_url, user_id, created_at, updated_at";

/// Assembles the post read projection from the declared associations:
/// author via the Post -> User belongs-to, vote_count via the Post -> Vote
/// has-many, rendered as a count subquery.
fn post_query(filter: &str, order: &str) -> Result<String, RequestError> {
    let author_join = schema::join_clause(schema::association(Entity::Post, Entity::User)?)?;
    let vote_count = schema::count_subquery(Entity::Post, Entity::Vote)?;
    Ok(format!(
        "SELECT post.id, post.title, post.post_url, post.created_at, \
         {vote_count} AS vote_count, user.username AS username \
         FROM post {author_join} {filter} {order}"
    ))
}

pub async fn list_posts_with_meta(
    pool: &SqlitePool,
) -> Result<Vec<(PostWithMeta, Vec<CommentWithAuthor>)>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = post_query("", "ORDER BY post.created_at DESC")?;
    let posts = sqlx::query_as::<Sqlite, PostWithMeta>(&query)
        .fetch_all(&mut tx)
        .await?;
    let query = format!(
        "{} ORDER BY comment.created_at ASC",
        comment_with_author_query("")?
    );
    let comments = sqlx::query_as::<Sqlite, CommentWithAuthor>(&query)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;

    let mut by_post: HashMap<i64, Vec<CommentWithAuthor>> = HashMap::new();
    for comment in comments {
        by_post.entry(comment.post_id).or_default().push(comment);
    }
    let result = posts
        .into_iter()
        .map(|post| {
            let comments = by_post.remove(&post.id).unwrap_or_default();
            (post, comments)
        })
        .collect();
    Ok(result)
}

pub async fn get_post_with_meta(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<(PostWithMeta, Vec<CommentWithAuthor>)>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = post_query("WHERE post.id = ?", "")?;
    let post = sqlx::query_as::<Sqlite, PostWithMeta>(&query)
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    let post = match post {
        Some(post) => post,
        None => return Ok(None),
    };
    let query = format!(
        "{} ORDER BY comment.created_at ASC",
        comment_with_author_query("WHERE comment.post_id = ?")?
    );
    let comments = sqlx::query_as::<Sqlite, CommentWithAuthor>(&query)
        .bind(id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(Some((post, comments)))
}

pub async fn create_post(
    pool: &SqlitePool,
    post: CreatePostRequest,
) -> Result<Post, RequestError> {
    post.validate()?;
    let mut tx = pool.begin().await?;
    let query = format!(
        "INSERT INTO post (title, post_url, user_id) VALUES (?, ?, ?) RETURNING {POST_COLUMNS}"
    );
    let result = sqlx::query_as::<Sqlite, Post>(&query)
        .bind(post.title)
        .bind(post.post_url)
        .bind(post.user_id)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn update_post_title(
    pool: &SqlitePool,
    id: i64,
    title: &str,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        "UPDATE post SET title = ?, updated_at = STRFTIME('%Y-%m-%d %H:%M:%f', 'NOW') \
         WHERE id = ?",
    )
    .bind(title)
    .bind(id)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("No post found with this id"));
    }
    Ok(())
}

pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM post WHERE id = ?")
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("No post found with this id"));
    }
    Ok(())
}
