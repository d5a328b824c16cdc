use serde::{Deserialize, Serialize};
use validator::Validate;

// ----------------- User Requests -----------------

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateUserRequest {
    pub username: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Validate)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
}

// ----------------- Post Requests -----------------

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreatePostRequest {
    pub title: String,
    #[validate(url(message = "post_url must be a well-formed URL"))]
    pub post_url: String,
    pub user_id: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UpdatePostRequest {
    pub title: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UpvoteRequest {
    pub user_id: i64,
    pub post_id: i64,
}

// ----------------- Comment Requests -----------------

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment text must not be empty"))]
    pub comment_text: String,
    pub user_id: i64,
    pub post_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn malformed_email_is_rejected() {
        let request = CreateUserRequest {
            username: "amy".to_string(),
            email: "not-an-email".to_string(),
            password: "abcd".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let request = CreateUserRequest {
            username: "amy".to_string(),
            email: "amy@x.com".to_string(),
            password: "abc".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn well_formed_user_passes() {
        let request = CreateUserRequest {
            username: "amy".to_string(),
            email: "amy@x.com".to_string(),
            password: "abcd".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn malformed_post_url_is_rejected() {
        let request = CreatePostRequest {
            title: "Hello".to_string(),
            post_url: "definitely not a url".to_string(),
            user_id: 1,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn partial_user_update_only_validates_present_fields() {
        let request = UpdateUserRequest {
            username: Some("amy2".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());

        let request = UpdateUserRequest {
            password: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
