use sqlx::{Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    data_formats::{CreateUserRequest, UpdateUserRequest},
    errors::RequestError,
    models::User,
    password::hash_password,
};

use super::UpdateBuilder;

const USER_COLUMNS: &str = "id, username, email, password";

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("SELECT {USER_COLUMNS} FROM user");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("SELECT {USER_COLUMNS} FROM user WHERE email = ?");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(email)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

/// The only write path for new users: validate, hash, insert, in that order.
/// The password column never sees the submitted plaintext.
pub async fn create_user(
    pool: &SqlitePool,
    user: CreateUserRequest,
) -> Result<User, RequestError> {
    user.validate()?;
    let hashed_password = hash_password(user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;

    let mut tx = pool.begin().await?;
    let query = format!(
        "INSERT INTO user (username, email, password) VALUES (?, ?, ?) RETURNING {USER_COLUMNS}"
    );
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(user.username)
        .bind(user.email)
        .bind(hashed_password)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

/// Partial update; a new password goes through the same validate/hash
/// pipeline as creation.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    user: UpdateUserRequest,
) -> Result<User, RequestError> {
    user.validate()?;
    let password = match user.password {
        Some(password) => {
            let hashed = hash_password(password)
                .await
                .map_err(|_| RequestError::ServerError)?;
            Some(hashed)
        }
        None => None,
    };

    let built = UpdateBuilder::new("user")
        .set("username", user.username)
        .set("email", user.email)
        .set("password", password)
        .build();

    if let Some((query, params)) = built {
        let mut tx = pool.begin().await?;
        let mut query = sqlx::query(&query);
        for param in params {
            query = query.bind(param);
        }
        let result = query.bind(id).execute(&mut tx).await?;
        tx.commit().await?;
        if result.rows_affected() == 0 {
            return Err(RequestError::NotFound("No user found with this id"));
        }
    }

    match get_user_by_id(pool, id).await? {
        Some(user) => Ok(user),
        None => Err(RequestError::NotFound("No user found with this id")),
    }
}

pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("No user found with this id"));
    }
    Ok(())
}
