use crate::{
    errors::ApiError,
    models::{Like, Post, User},
};
use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry as MapEntry};
use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap, hash_map::Entry},
    ops::Bound,
    sync::{Arc, RwLock},
};
use uuid::Uuid;

/// Newest first, id as tie-break.
type FeedKey = (Reverse<DateTime<Utc>>, Reverse<Uuid>);

/// In-memory persistence for users, tweets and likes.
///
/// `DashMap` = Thread-safe HashMap, sharded internally so handlers never
/// wait on one global lock. The feed index is the only ordered structure:
/// it maps the keyset ordering of every tweet to its author so timeline
/// scans never sort.
#[derive(Clone, Default)]
pub struct Store {
    users: Arc<DashMap<Uuid, User>>,
    email_index: Arc<DashMap<String, Uuid>>,
    name_index: Arc<DashMap<String, Uuid>>,
    posts: Arc<DashMap<Uuid, Post>>,
    feed_index: Arc<RwLock<BTreeMap<FeedKey, Uuid>>>,
    // post id -> (user id -> like)
    likes: Arc<DashMap<Uuid, HashMap<Uuid, Like>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user, reserving both the email and the name.
    pub fn insert_user(&self, user: User) -> Result<(), ApiError> {
        match self.email_index.entry(user.email.clone()) {
            MapEntry::Occupied(_) => return Err(ApiError::UserAlreadyExists),
            MapEntry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        match self.name_index.entry(user.name.clone()) {
            MapEntry::Occupied(_) => {
                self.email_index.remove(&user.email);
                return Err(ApiError::UserAlreadyExists);
            }
            MapEntry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        self.users.insert(user.id, user);
        Ok(())
    }

    pub fn user(&self, id: &Uuid) -> Option<User> {
        self.users.get(id).map(|user| user.clone())
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let id = *self.email_index.get(email)?;
        self.user(&id)
    }

    pub fn user_id_by_name(&self, name: &str) -> Option<Uuid> {
        self.name_index.get(name).map(|id| *id)
    }

    pub fn insert_post(&self, post: Post) -> Result<(), ApiError> {
        let key = (Reverse(post.created_at), Reverse(post.id));
        let author_id = post.author_id;

        // Visible to scans only once the row itself exists.
        self.posts.insert(post.id, post);
        self.feed_index
            .write()
            .map_err(|_| ApiError::InternalError("feed index lock poisoned".into()))?
            .insert(key, author_id);
        Ok(())
    }

    pub fn post(&self, id: &Uuid) -> Option<Post> {
        self.posts.get(id).map(|post| post.clone())
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// Walks the feed from `cursor` (inclusive) and returns up to `take` tweets,
    /// optionally restricted to one author.
    ///
    /// An unknown cursor yields no rows.
    pub fn scan(
        &self,
        cursor: Option<Uuid>,
        author_id: Option<Uuid>,
        take: usize,
    ) -> Result<Vec<Post>, ApiError> {
        let start = match cursor {
            Some(id) => match self.posts.get(&id) {
                Some(post) => Bound::Included((Reverse(post.created_at), Reverse(post.id))),
                None => return Ok(Vec::new()),
            },
            None => Bound::Unbounded,
        };

        let index = self
            .feed_index
            .read()
            .map_err(|_| ApiError::InternalError("feed index lock poisoned".into()))?;

        Ok(index
            .range((start, Bound::Unbounded))
            .filter(|(_, author)| author_id.is_none_or(|wanted| **author == wanted))
            .filter_map(|((_, Reverse(id)), _)| self.post(id))
            .take(take)
            .collect())
    }

    /// Creates the (post, user) like. Returns the new like count.
    pub fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<u64, ApiError> {
        if !self.posts.contains_key(&post_id) {
            return Err(ApiError::NotFound("Tweet not found".into()));
        }

        let mut likers = self.likes.entry(post_id).or_default();
        match likers.entry(user_id) {
            Entry::Occupied(_) => return Err(ApiError::Conflict("Tweet already liked".into())),
            Entry::Vacant(slot) => {
                slot.insert(Like {
                    post_id,
                    user_id,
                    created_at: Utc::now(),
                });
            }
        }
        Ok(likers.len() as u64)
    }

    /// Removes the (post, user) like. Returns the new like count.
    ///
    /// The post's liker set is dropped together with its last like.
    pub fn unlike(&self, post_id: Uuid, user_id: Uuid) -> Result<u64, ApiError> {
        let MapEntry::Occupied(mut likers) = self.likes.entry(post_id) else {
            return Err(ApiError::NotFound("Like not found".into()));
        };

        likers
            .get_mut()
            .remove(&user_id)
            .ok_or_else(|| ApiError::NotFound("Like not found".into()))?;

        let left = likers.get().len() as u64;
        if left == 0 {
            likers.remove();
        }
        Ok(left)
    }

    /// Like count of a tweet and whether `viewer` is one of the likers.
    pub fn like_stats(&self, post_id: &Uuid, viewer: Option<Uuid>) -> (u64, bool) {
        match self.likes.get(post_id) {
            Some(likers) => {
                let liked = viewer.is_some_and(|id| likers.contains_key(&id));
                (likers.len() as u64, liked)
            }
            None => (0, false),
        }
    }
}
