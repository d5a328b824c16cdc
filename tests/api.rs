use std::time::Duration;

use serde_json::{json, Value};
use technews::{get_random_free_port, init_db, make_router, run_app};

/// Boots the app against a fresh SQLite file on a random free port and
/// returns the base URL once the health check answers.
async fn spawn_app() -> String {
    let db_path = std::env::temp_dir().join(format!("technews-test-{}.db", rand::random::<u64>()));
    let db_url = format!("sqlite://{}", db_path.display());
    let (port, addr) = get_random_free_port();

    let db = init_db(&db_url).await.expect("failed to init test db");
    let router = make_router();
    tokio::spawn(async move {
        run_app(router, addr, db).await.expect("server crashed");
    });

    let base = format!("http://localhost:{port}");
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(response) = client.get(format!("{base}/check_health")).send().await {
            if response.status().is_success() {
                return base;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server did not become ready");
}

async fn create_user(client: &reqwest::Client, base: &str, username: &str, email: &str) -> Value {
    let response = client
        .post(format!("{base}/api/users"))
        .json(&json!({ "username": username, "email": email, "password": "abcd" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn create_post(client: &reqwest::Client, base: &str, title: &str, user_id: i64) -> Value {
    let response = client
        .post(format!("{base}/api/posts"))
        .json(&json!({
            "title": title,
            "post_url": format!("https://x.com/{title}"),
            "user_id": user_id
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

#[tokio::test]
async fn health_check_answers() {
    let base = spawn_app().await;
    let body = reqwest::get(format!("{base}/check_health"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "alive");
}

#[tokio::test]
async fn unknown_routes_get_a_404() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{base}/api/nope")).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn created_user_never_echoes_the_password() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let user = create_user(&client, &base, "amy", "amy@x.com").await;
    assert_eq!(user["id"], 1);
    assert_eq!(user["username"], "amy");
    assert_eq!(user["email"], "amy@x.com");
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn malformed_email_and_short_password_are_rejected() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/users"))
        .json(&json!({ "username": "amy", "email": "not-an-email", "password": "abcd" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{base}/api/users"))
        .json(&json!({ "username": "amy", "email": "amy@x.com", "password": "abc" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let users: Value = client
        .get(format!("{base}/api/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn duplicate_email_is_a_client_error() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;
    let response = client
        .post(format!("{base}/api/users"))
        .json(&json!({ "username": "amy2", "email": "amy@x.com", "password": "abcd" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn login_checks_the_stored_hash() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;

    let response = client
        .post(format!("{base}/api/users/login"))
        .json(&json!({ "email": "amy@x.com", "password": "abcd" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "You are now logged in!");
    assert_eq!(body["user"]["username"], "amy");

    let response = client
        .post(format!("{base}/api/users/login"))
        .json(&json!({ "email": "amy@x.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{base}/api/users/login"))
        .json(&json!({ "email": "nobody@x.com", "password": "abcd" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn updating_a_user_rehashes_a_new_password() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;

    let response = client
        .put(format!("{base}/api/users/1"))
        .json(&json!({ "password": "efgh" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .post(format!("{base}/api/users/login"))
        .json(&json!({ "email": "amy@x.com", "password": "efgh" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .put(format!("{base}/api/users/99"))
        .json(&json!({ "username": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn malformed_post_url_creates_no_row() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;

    let response = client
        .post(format!("{base}/api/posts"))
        .json(&json!({ "title": "Hello", "post_url": "not a url", "user_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let posts: Value = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(posts.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn posting_as_a_nonexistent_user_is_a_client_error() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/posts"))
        .json(&json!({ "title": "Hello", "post_url": "https://x.com/1", "user_id": 42 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn upvote_recounts_and_allows_repeat_votes() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;
    let post = create_post(&client, &base, "Hello", 1).await;
    assert_eq!(post["id"], 1);

    let response = client
        .put(format!("{base}/api/posts/upvote"))
        .json(&json!({ "user_id": 1, "post_id": 1 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["vote_count"], 1);

    // No uniqueness on (user_id, post_id): the same voter counts again.
    let body: Value = client
        .put(format!("{base}/api/posts/upvote"))
        .json(&json!({ "user_id": 1, "post_id": 1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["vote_count"], 2);
}

#[tokio::test]
async fn vote_count_matches_votes_from_distinct_users() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    for (name, email) in [("amy", "amy@x.com"), ("bob", "bob@x.com"), ("cat", "cat@x.com")] {
        create_user(&client, &base, name, email).await;
    }
    create_post(&client, &base, "Hello", 1).await;

    for user_id in 1..=3 {
        let response = client
            .put(format!("{base}/api/posts/upvote"))
            .json(&json!({ "user_id": user_id, "post_id": 1 }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let post: Value = client
        .get(format!("{base}/api/posts/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(post["vote_count"], 3);
}

#[tokio::test]
async fn upvoting_with_a_nonexistent_voter_fails_without_a_count() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;
    create_post(&client, &base, "Hello", 1).await;

    let response = client
        .put(format!("{base}/api/posts/upvote"))
        .json(&json!({ "user_id": 42, "post_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let post: Value = client
        .get(format!("{base}/api/posts/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(post["vote_count"], 0);
}

#[tokio::test]
async fn posts_nest_author_and_comment_usernames_newest_first() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;
    create_user(&client, &base, "bob", "bob@x.com").await;
    create_post(&client, &base, "first", 1).await;
    tokio::time::sleep(Duration::from_millis(25)).await;
    create_post(&client, &base, "second", 2).await;

    let response = client
        .post(format!("{base}/api/comments"))
        .json(&json!({ "comment_text": "nice find", "user_id": 2, "post_id": 1 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let posts: Value = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "second");
    assert_eq!(posts[0]["user"]["username"], "bob");
    assert_eq!(posts[1]["title"], "first");
    assert_eq!(posts[1]["comments"][0]["comment_text"], "nice find");
    assert_eq!(posts[1]["comments"][0]["user"]["username"], "bob");
}

#[tokio::test]
async fn deleting_posts_is_not_found_when_absent_and_ids_are_never_reused() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;

    let response = client
        .delete(format!("{base}/api/posts/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let first = create_post(&client, &base, "one", 1).await;
    let second = create_post(&client, &base, "two", 1).await;
    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);

    let response = client
        .delete(format!("{base}/api/posts/2"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let third = create_post(&client, &base, "three", 1).await;
    assert_eq!(third["id"], 3);

    let response = client
        .get(format!("{base}/api/posts/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn updating_a_post_changes_only_the_title() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;
    create_post(&client, &base, "before", 1).await;

    let response = client
        .put(format!("{base}/api/posts/1"))
        .json(&json!({ "title": "after" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let post: Value = client
        .get(format!("{base}/api/posts/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(post["title"], "after");
    assert_eq!(post["post_url"], "https://x.com/before");

    let response = client
        .put(format!("{base}/api/posts/9"))
        .json(&json!({ "title": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn comments_can_be_listed_and_deleted() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    create_user(&client, &base, "amy", "amy@x.com").await;
    create_post(&client, &base, "Hello", 1).await;

    let comment: Value = client
        .post(format!("{base}/api/comments"))
        .json(&json!({ "comment_text": "hi", "user_id": 1, "post_id": 1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(comment["comment_text"], "hi");
    assert_eq!(comment["user_id"], 1);

    let comments: Value = client
        .get(format!("{base}/api/comments"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(comments.as_array().unwrap().len(), 1);

    let response = client
        .delete(format!("{base}/api/comments/1"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{base}/api/comments/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
