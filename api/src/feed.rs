use crate::{
    dto::{AuthorResponse, TimelinePage, TimelineParams, TweetView},
    errors::ApiError,
    models::Post,
    store::Store,
};
use uuid::Uuid;
use validator::Validate;

/// Reads one page of the timeline for `viewer` (anonymous when `None`).
///
/// Pagination is keyset based: the store is asked for `limit + 1` rows
/// starting at the cursor row, and the extra row, if any, becomes the
/// cursor of the next page. Tweets created after a page was served never
/// shift the pages that follow it.
pub fn timeline(
    store: &Store,
    viewer: Option<Uuid>,
    params: &TimelineParams,
) -> Result<TimelinePage, ApiError> {
    params.validate()?;
    let cursor = params.cursor.as_deref().map(parse_cursor).transpose()?;

    let author_id = match params.author.as_deref() {
        Some(name) => match store.user_id_by_name(name) {
            Some(id) => Some(id),
            None => return Ok(TimelinePage::default()),
        },
        None => None,
    };

    let limit = params.limit as usize;
    let rows = store.scan(cursor, author_id, limit + 1)?;
    let (posts, next_cursor) = split_page(rows, limit);

    let tweets = posts
        .into_iter()
        .map(|post| tweet_view(store, post, viewer))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TimelinePage {
        tweets,
        next_cursor,
    })
}

/// Splits `limit + 1` fetched rows into the page and the id of the first
/// row left out of it.
pub fn split_page(mut rows: Vec<Post>, limit: usize) -> (Vec<Post>, Option<Uuid>) {
    if rows.len() <= limit {
        return (rows, None);
    }
    rows.truncate(limit + 1);
    let next_cursor = rows.pop().map(|post| post.id);
    (rows, next_cursor)
}

pub fn tweet_view(store: &Store, post: Post, viewer: Option<Uuid>) -> Result<TweetView, ApiError> {
    let author = store.user(&post.author_id).ok_or_else(|| {
        ApiError::InternalError(format!(
            "author {} of tweet {} is missing",
            post.author_id, post.id
        ))
    })?;
    let (like_count, liked) = store.like_stats(&post.id, viewer);

    Ok(TweetView::new(
        post,
        AuthorResponse::from(&author),
        like_count,
        liked,
    ))
}

fn parse_cursor(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::ValidationError(format!("Invalid cursor: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;

    fn add_user(store: &Store, name: &str) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", name),
            name: name.to_string(),
            image: Some(format!("https://img.example.com/{}.png", name)),
            hashed_password: String::new(),
            created_at: 0,
        };
        let id = user.id;
        store.insert_user(user).unwrap();
        id
    }

    /// Inserts `count` tweets one minute apart, returned oldest first.
    fn add_tweets(store: &Store, author_id: Uuid, count: i64) -> Vec<Post> {
        let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        (0..count)
            .map(|i| {
                let post = Post {
                    id: Uuid::new_v4(),
                    author_id,
                    text: format!("tweet number {}", i),
                    created_at: base + Duration::minutes(i),
                };
                store.insert_post(post.clone()).unwrap();
                post
            })
            .collect()
    }

    fn params(limit: u32, cursor: Option<Uuid>) -> TimelineParams {
        TimelineParams {
            limit,
            cursor: cursor.map(|c| c.to_string()),
            author: None,
        }
    }

    #[test]
    fn page_never_exceeds_limit() {
        let store = Store::new();
        let ada = add_user(&store, "ada");
        let tweets = add_tweets(&store, ada, 7);

        for limit in [1, 2, 6, 7, 8, 100] {
            let page = timeline(&store, None, &params(limit, None)).unwrap();
            assert!(page.tweets.len() <= limit as usize);
            assert_eq!(page.tweets.len(), (limit as usize).min(tweets.len()));
            assert_eq!(page.next_cursor.is_some(), (limit as usize) < tweets.len());
        }
    }

    #[test]
    fn cursor_is_first_excluded_tweet() {
        let store = Store::new();
        let ada = add_user(&store, "ada");
        let tweets = add_tweets(&store, ada, 5);

        let page = timeline(&store, None, &params(2, None)).unwrap();
        let ids: Vec<Uuid> = page.tweets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![tweets[4].id, tweets[3].id]);
        assert_eq!(page.next_cursor, Some(tweets[2].id));
    }

    #[test]
    fn walking_cursors_visits_every_tweet_once_in_order() {
        let store = Store::new();
        let ada = add_user(&store, "ada");
        let tweets = add_tweets(&store, ada, 11);

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = timeline(&store, None, &params(3, cursor)).unwrap();
            seen.extend(page.tweets);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(seen.len(), tweets.len());
        let unique: HashSet<Uuid> = seen.iter().map(|t| t.id).collect();
        assert_eq!(unique.len(), tweets.len());
        assert!(seen.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[test]
    fn new_tweets_do_not_shift_later_pages() {
        let store = Store::new();
        let ada = add_user(&store, "ada");
        let tweets = add_tweets(&store, ada, 4);

        let first = timeline(&store, None, &params(2, None)).unwrap();
        store
            .insert_post(Post::new(ada, "a fresh tweet on top".into()))
            .unwrap();

        let second = timeline(&store, None, &params(2, first.next_cursor)).unwrap();
        let ids: Vec<Uuid> = second.tweets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![tweets[1].id, tweets[0].id]);
        assert_eq!(second.next_cursor, None);
    }

    #[test]
    fn author_filter_restricts_the_feed() {
        let store = Store::new();
        let ada = add_user(&store, "ada");
        let grace = add_user(&store, "grace");
        add_tweets(&store, ada, 3);
        add_tweets(&store, grace, 2);

        let mut filtered = params(10, None);
        filtered.author = Some("grace".into());
        let page = timeline(&store, None, &filtered).unwrap();
        assert_eq!(page.tweets.len(), 2);
        assert!(page.tweets.iter().all(|t| t.author.name == "grace"));

        filtered.author = Some("nobody".into());
        assert_eq!(timeline(&store, None, &filtered).unwrap(), TimelinePage::default());
    }

    #[test]
    fn liked_flag_is_per_viewer() {
        let store = Store::new();
        let ada = add_user(&store, "ada");
        let grace = add_user(&store, "grace");
        let tweets = add_tweets(&store, ada, 1);
        store.like(tweets[0].id, grace).unwrap();

        let as_grace = timeline(&store, Some(grace), &params(10, None)).unwrap();
        assert_eq!((as_grace.tweets[0].like_count, as_grace.tweets[0].liked), (1, true));

        let as_ada = timeline(&store, Some(ada), &params(10, None)).unwrap();
        assert_eq!((as_ada.tweets[0].like_count, as_ada.tweets[0].liked), (1, false));

        let anonymous = timeline(&store, None, &params(10, None)).unwrap();
        assert!(!anonymous.tweets[0].liked);
    }

    #[test]
    fn bad_input_is_rejected_before_querying() {
        let store = Store::new();
        assert!(matches!(
            timeline(&store, None, &params(0, None)),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            timeline(&store, None, &params(101, None)),
            Err(ApiError::ValidationError(_))
        ));

        let mut bad_cursor = params(10, None);
        bad_cursor.cursor = Some("not-a-uuid".into());
        assert!(matches!(
            timeline(&store, None, &bad_cursor),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn unknown_cursor_gives_an_empty_last_page() {
        let store = Store::new();
        let ada = add_user(&store, "ada");
        add_tweets(&store, ada, 3);

        let page = timeline(&store, None, &params(2, Some(Uuid::new_v4()))).unwrap();
        assert_eq!(page, TimelinePage::default());
    }
}
