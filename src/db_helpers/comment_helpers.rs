use sqlx::{Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    data_formats::CreateCommentRequest,
    errors::RequestError,
    models::{Comment, CommentWithAuthor},
    schema::{self, Entity},
};

pub(super) fn comment_with_author_query(filter: &str) -> Result<String, RequestError> {
    let author_join = schema::join_clause(schema::association(Entity::Comment, Entity::User)?)?;
    Ok(format!(
        "SELECT comment.id, comment.comment_text, comment.user_id, comment.post_id, \
         comment.created_at, user.username AS username \
         FROM comment {author_join} {filter}"
    ))
}

pub async fn list_comments(pool: &SqlitePool) -> Result<Vec<CommentWithAuthor>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = comment_with_author_query("")?;
    let result = sqlx::query_as::<Sqlite, CommentWithAuthor>(&query)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn create_comment(
    pool: &SqlitePool,
    comment: CreateCommentRequest,
) -> Result<Comment, RequestError> {
    comment.validate()?;
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, Comment>(
        "INSERT INTO comment (comment_text, user_id, post_id) VALUES (?, ?, ?) \
         RETURNING id, comment_text, user_id, post_id, created_at",
    )
    .bind(comment.comment_text)
    .bind(comment.user_id)
    .bind(comment.post_id)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn delete_comment(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM comment WHERE id = ?")
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("No comment found with this id"));
    }
    Ok(())
}
