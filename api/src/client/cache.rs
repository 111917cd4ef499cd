use crate::dto::{DEFAULT_TIMELINE_LIMIT, TimelinePage, TimelineParams, TweetView};
use std::collections::HashMap;
use uuid::Uuid;

/// Scroll position (percent of the scrollable height) past which the next page is fetched.
pub const SCROLL_THRESHOLD: f64 = 90.0;

/// Identifies one timeline: the author filter and the page size it is read with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedKey {
    pub author: Option<String>,
    pub limit: u32,
}

impl FeedKey {
    pub fn home(limit: u32) -> Self {
        Self {
            author: None,
            limit,
        }
    }

    pub fn author(name: impl Into<String>, limit: u32) -> Self {
        Self {
            author: Some(name.into()),
            limit,
        }
    }

    pub fn params(&self, cursor: Option<Uuid>) -> TimelineParams {
        TimelineParams {
            limit: self.limit,
            cursor: cursor.map(|c| c.to_string()),
            author: self.author.clone(),
        }
    }
}

impl Default for FeedKey {
    fn default() -> Self {
        Self::home(DEFAULT_TIMELINE_LIMIT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeDelta {
    Like,
    Unlike,
}

/// Returns `pages` with the tweet `tweet_id` replaced by a copy whose
/// `liked` flag and like count reflect `delta`. Every other tweet is
/// carried over untouched; unknown ids leave the pages as they were.
pub fn apply_like_delta(
    pages: &[TimelinePage],
    tweet_id: Uuid,
    delta: LikeDelta,
) -> Vec<TimelinePage> {
    pages
        .iter()
        .map(|page| TimelinePage {
            tweets: page
                .tweets
                .iter()
                .map(|tweet| {
                    if tweet.id != tweet_id {
                        return tweet.clone();
                    }
                    let (liked, like_count) = match delta {
                        LikeDelta::Like => (true, tweet.like_count + 1),
                        LikeDelta::Unlike => (false, tweet.like_count.saturating_sub(1)),
                    };
                    TweetView {
                        liked,
                        like_count,
                        ..tweet.clone()
                    }
                })
                .collect(),
            next_cursor: page.next_cursor,
        })
        .collect()
}

#[derive(Debug, Default)]
struct Feed {
    pages: Vec<TimelinePage>,
    in_flight: bool,
}

impl Feed {
    fn has_next_page(&self) -> bool {
        self.pages
            .last()
            .is_none_or(|page| page.next_cursor.is_some())
    }

    fn next_cursor(&self) -> Option<Uuid> {
        self.pages.last().and_then(|page| page.next_cursor)
    }
}

/// Fetched timeline pages, per feed.
///
/// Pages only ever grow at the end. At most one fetch per feed is
/// outstanding: `begin_fetch` hands out the parameters of the next page
/// and refuses until `complete_fetch` or `abort_fetch` is called.
#[derive(Debug, Default)]
pub struct FeedCache {
    feeds: HashMap<FeedKey, Feed>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self, key: &FeedKey) -> &[TimelinePage] {
        self.feeds
            .get(key)
            .map(|feed| feed.pages.as_slice())
            .unwrap_or_default()
    }

    /// All fetched tweets of a feed, in display order.
    pub fn tweets(&self, key: &FeedKey) -> impl Iterator<Item = &TweetView> {
        self.pages(key).iter().flat_map(|page| page.tweets.iter())
    }

    /// First cached copy of a tweet, looking through every feed.
    pub fn find(&self, tweet_id: Uuid) -> Option<&TweetView> {
        self.feeds
            .values()
            .flat_map(|feed| feed.pages.iter())
            .flat_map(|page| page.tweets.iter())
            .find(|tweet| tweet.id == tweet_id)
    }

    /// True until a page without a cursor has been fetched.
    pub fn has_next_page(&self, key: &FeedKey) -> bool {
        self.feeds.get(key).is_none_or(Feed::has_next_page)
    }

    pub fn is_fetching(&self, key: &FeedKey) -> bool {
        self.feeds.get(key).is_some_and(|feed| feed.in_flight)
    }

    /// Marks a fetch of the next page as in flight and returns its query,
    /// or `None` when the feed is exhausted or a fetch is already outstanding.
    pub fn begin_fetch(&mut self, key: &FeedKey) -> Option<TimelineParams> {
        let feed = self.feeds.entry(key.clone()).or_default();
        if feed.in_flight || !feed.has_next_page() {
            return None;
        }
        feed.in_flight = true;
        Some(key.params(feed.next_cursor()))
    }

    /// Scroll-driven variant of `begin_fetch`.
    pub fn on_scroll(&mut self, key: &FeedKey, position: f64) -> Option<TimelineParams> {
        if position > SCROLL_THRESHOLD {
            self.begin_fetch(key)
        } else {
            None
        }
    }

    pub fn complete_fetch(&mut self, key: &FeedKey, page: TimelinePage) {
        let feed = self.feeds.entry(key.clone()).or_default();
        feed.in_flight = false;
        feed.pages.push(page);
    }

    /// Clears the in-flight mark after a failed fetch; pages are unchanged.
    pub fn abort_fetch(&mut self, key: &FeedKey) {
        if let Some(feed) = self.feeds.get_mut(key) {
            feed.in_flight = false;
        }
    }

    /// Patches a confirmed like/unlike into every feed holding the tweet.
    pub fn apply_like(&mut self, tweet_id: Uuid, delta: LikeDelta) {
        for feed in self.feeds.values_mut() {
            feed.pages = apply_like_delta(&feed.pages, tweet_id, delta);
        }
    }

    /// Drops a feed so its next fetch starts from the top again.
    pub fn reset(&mut self, key: &FeedKey) {
        self.feeds.remove(key);
    }
}
