mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;
mod password;
mod schema;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
use handlers::*;
use sqlx::{
    migrate::MigrateDatabase, sqlite::SqliteConnectOptions, Sqlite, SqlitePool,
};
use std::{
    net::{SocketAddr, TcpListener},
    str::FromStr,
    sync::Arc,
};

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, address: SocketAddr, db: SqlitePool) -> Result<()> {
    let app = app.layer(Extension(Arc::new(db)));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!("creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    }
    // Foreign keys are off by default in SQLite; the vote insert relies on
    // them to reject nonexistent user/post ids.
    let options = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("localhost:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/login", post(login_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/posts", get(list_posts).post(create_post))
        // Registered alongside /:id; the static segment wins the match, so
        // "upvote" is never parsed as a post id.
        .route("/api/posts/upvote", put(upvote_post))
        .route(
            "/api/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/comments", get(list_comments).post(create_comment))
        .route("/api/comments/:id", delete(delete_comment))
        .fallback(not_found)
}
