use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const DEFAULT_TIMELINE_LIMIT: u32 = 10;

#[derive(Debug, Validate, Deserialize, Serialize)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = validate_name))]
    pub name: String,
    #[validate(length(min = 8, max = 100, message = "Password must be 8-100 characters"))]
    pub password: String,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Validate, Deserialize, Serialize)]
pub struct CreateTweetRequest {
    #[validate(length(min = 10, max = 280, message = "Tweet must be 10-280 characters"))]
    pub text: String,
}

/// Query parameters for `GET /tweets`.
///
/// `cursor` stays a string here so a malformed one is reported as a
/// validation error instead of an extractor rejection.
#[derive(Debug, Clone, PartialEq, Eq, Validate, Deserialize, Serialize)]
pub struct TimelineParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 20, message = "Author filter must be 1-20 characters"))]
    pub author: Option<String>,
}

impl Default for TimelineParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TIMELINE_LIMIT,
            cursor: None,
            author: None,
        }
    }
}

fn default_limit() -> u32 {
    DEFAULT_TIMELINE_LIMIT
}

/// Names show up in profile URLs and author filters.
fn validate_name(name: &String) -> Result<(), ValidationError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_chars || !(3..=20).contains(&name.len()) {
        return Err(ValidationError::new("name")
            .with_message("Name must be 3-20 letters, digits or '_'".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(len: usize) -> CreateTweetRequest {
        CreateTweetRequest {
            text: "x".repeat(len),
        }
    }

    #[test]
    fn tweet_length_bounds() {
        assert!(tweet(9).validate().is_err());
        assert!(tweet(10).validate().is_ok());
        assert!(tweet(280).validate().is_ok());
        assert!(tweet(281).validate().is_err());
    }

    #[test]
    fn tweet_length_counts_characters_not_bytes() {
        let request = CreateTweetRequest {
            text: "é".repeat(280),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn timeline_limit_range() {
        let mut params = TimelineParams::default();
        assert_eq!(params.limit, 10);
        assert!(params.validate().is_ok());

        params.limit = 0;
        assert!(params.validate().is_err());
        params.limit = 101;
        assert!(params.validate().is_err());
        params.limit = 100;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn empty_author_filter_is_rejected() {
        let params = TimelineParams {
            author: Some(String::new()),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn signup_name_rules() {
        let mut request = SignupRequest {
            email: "ada@example.com".into(),
            name: "ada_l".into(),
            password: "correct horse".into(),
            image: None,
        };
        assert!(request.validate().is_ok());

        request.name = "no spaces".into();
        assert!(request.validate().is_err());

        request.name = "ab".into();
        assert!(request.validate().is_err());
    }
}
