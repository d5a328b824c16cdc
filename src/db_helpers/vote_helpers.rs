use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::UpvoteRequest,
    errors::RequestError,
    models::{CommentWithAuthor, PostWithMeta, Vote},
};

use super::get_post_with_meta;

/// Records a vote, then re-reads the post with its recomputed vote count.
/// Nonexistent user or post ids are caught by the foreign keys on `vote`
/// and surface as a constraint violation; nothing checks existence first.
/// Repeated votes by the same user on the same post each insert a row and
/// each count.
///
/// The insert and the recount are separate transactions. A reader between
/// the two can see a count that does not yet include this vote; the insert
/// itself is durable once committed.
pub async fn upvote(
    pool: &SqlitePool,
    UpvoteRequest { user_id, post_id }: UpvoteRequest,
) -> Result<(PostWithMeta, Vec<CommentWithAuthor>), RequestError> {
    let mut tx = pool.begin().await?;
    let vote = sqlx::query_as::<Sqlite, Vote>(
        "INSERT INTO vote (user_id, post_id) VALUES (?, ?) RETURNING id, user_id, post_id",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    tracing::debug!(
        vote_id = vote.id,
        user_id = vote.user_id,
        post_id = vote.post_id,
        "vote recorded"
    );

    match get_post_with_meta(pool, post_id).await? {
        Some(result) => Ok(result),
        None => Err(RequestError::NotFound("No post found with this id")),
    }
}
