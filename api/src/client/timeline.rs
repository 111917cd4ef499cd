use super::{FeedCache, FeedKey, FeedSource, LikeDelta};
use crate::{
    dto::{CreateTweetRequest, TimelineParams, TweetView},
    errors::ApiError,
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

/// Drives one infinitely scrolling timeline against a `FeedSource`.
///
/// Mutations are patched into the cache only after the server confirmed
/// them, so a failed like leaves the timeline exactly as it was.
pub struct TimelineView<S> {
    source: S,
    cache: FeedCache,
    key: FeedKey,
}

impl<S: FeedSource> TimelineView<S> {
    pub fn new(source: S, key: FeedKey) -> Self {
        Self {
            source,
            cache: FeedCache::new(),
            key,
        }
    }

    pub fn key(&self) -> &FeedKey {
        &self.key
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn tweets(&self) -> impl Iterator<Item = &TweetView> {
        self.cache.tweets(&self.key)
    }

    pub fn has_next_page(&self) -> bool {
        self.cache.has_next_page(&self.key)
    }

    /// Fetches the next page regardless of scroll position. Returns whether a fetch happened.
    pub async fn load(&mut self) -> Result<bool, ApiError> {
        match self.cache.begin_fetch(&self.key) {
            Some(params) => self.fetch(params).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Feeds a scroll position (0-100) in; fetches the next page past the threshold.
    pub async fn on_scroll(&mut self, position: f64) -> Result<bool, ApiError> {
        match self.cache.on_scroll(&self.key, position) {
            Some(params) => self.fetch(params).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Likes the tweet if the viewer hasn't, unlikes it otherwise.
    pub async fn toggle_like(&mut self, tweet_id: Uuid) -> Result<(), ApiError> {
        let liked = self
            .cache
            .find(tweet_id)
            .map(|tweet| tweet.liked)
            .ok_or_else(|| ApiError::NotFound("Tweet is not in the timeline".into()))?;

        if liked {
            self.source.unlike(tweet_id).await?;
            self.cache.apply_like(tweet_id, LikeDelta::Unlike);
            return Ok(());
        }

        match self.source.like(tweet_id).await {
            Ok(()) => {
                self.cache.apply_like(tweet_id, LikeDelta::Like);
                Ok(())
            }
            // Already liked elsewhere: nothing to do here.
            Err(ApiError::Conflict(msg)) => {
                debug!("Ignoring duplicate like of {}: {}", tweet_id, msg);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Posts a tweet and reloads the timeline from the top so it shows up.
    ///
    /// The text is checked locally first; a too short or too long tweet
    /// never reaches the server.
    pub async fn create(&mut self, text: &str) -> Result<TweetView, ApiError> {
        CreateTweetRequest {
            text: text.to_string(),
        }
        .validate()?;

        let tweet = self.source.create(text).await?;
        self.cache.reset(&self.key);
        self.load().await?;
        Ok(tweet)
    }

    async fn fetch(&mut self, params: TimelineParams) -> Result<(), ApiError> {
        match self.source.timeline(&params).await {
            Ok(page) => {
                debug!("Fetched {} tweets", page.tweets.len());
                self.cache.complete_fetch(&self.key, page);
                Ok(())
            }
            Err(e) => {
                self.cache.abort_fetch(&self.key);
                Err(e)
            }
        }
    }
}
