//! Client side of the feed: a typed HTTP client and the page cache that
//! backs an infinitely scrolling timeline.

mod cache;
mod http;
mod timeline;

pub use cache::{FeedCache, FeedKey, LikeDelta, SCROLL_THRESHOLD, apply_like_delta};
pub use http::FeedClient;
pub use timeline::TimelineView;

use crate::{
    dto::{TimelinePage, TimelineParams, TweetView},
    errors::ApiError,
};
use uuid::Uuid;

/// The tweet operations a timeline needs from the server.
pub trait FeedSource {
    fn timeline(
        &self,
        params: &TimelineParams,
    ) -> impl Future<Output = Result<TimelinePage, ApiError>> + Send;

    fn create(&self, text: &str) -> impl Future<Output = Result<TweetView, ApiError>> + Send;

    fn like(&self, tweet_id: Uuid) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn unlike(&self, tweet_id: Uuid) -> impl Future<Output = Result<(), ApiError>> + Send;
}
