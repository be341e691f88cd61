use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};

use crate::{
    authentication::AuthError,
    domain::{
        CheckinId, CommentBody, CommentFields, CommentId, CommentRecord, UserId, VenueInfo,
        comment_fields,
    },
    repository::{CommentStore, IdentityResolver},
};

#[derive(Debug, Clone)]
struct Profile {
    first_name: String,
    last_name: String,
    is_public: bool,
}

#[derive(Debug, Clone)]
struct Checkin {
    owner: UserId,
    venue: VenueInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredComment {
    pub id: CommentId,
    pub user_id: UserId,
    pub checkin_id: CheckinId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    sessions: HashMap<String, UserId>,
    profiles: HashMap<UserId, Profile>,
    friends: HashSet<(UserId, UserId)>,
    checkins: HashMap<CheckinId, Checkin>,
    // insertion order doubles as creation order
    comments: Vec<StoredComment>,
    #[cfg(any(test, feature = "test-utils"))]
    hooks: TestHooks,
}

/// Call log and fault injection for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
struct TestHooks {
    calls: Vec<&'static str>,
    failing: HashSet<&'static str>,
}

impl State {
    #[cfg(any(test, feature = "test-utils"))]
    fn record(&mut self, op: &'static str) -> Result<(), anyhow::Error> {
        self.hooks.calls.push(op);
        if self.hooks.failing.contains(op) {
            anyhow::bail!("{op} is unavailable");
        }
        Ok(())
    }

    #[cfg(not(any(test, feature = "test-utils")))]
    fn record(&mut self, _op: &'static str) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

/// Process-local implementation of both collaborator traits, used by the
/// test suites. One lock guards all state, so every operation is atomic.
/// With the `test-utils` feature it also records every call and can be told
/// to fail a named operation.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, op: &'static str) -> Result<MutexGuard<'_, State>, anyhow::Error> {
        let mut state = self.state();
        state.record(op)?;
        Ok(state)
    }

    pub fn add_user(&self, user_id: &UserId, first_name: &str, last_name: &str, is_public: bool) {
        self.state().profiles.insert(
            user_id.clone(),
            Profile {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                is_public,
            },
        );
    }

    pub fn add_session(&self, token: &str, user_id: &UserId) {
        self.state()
            .sessions
            .insert(token.to_string(), user_id.clone());
    }

    /// Friendship is mutual.
    pub fn add_friendship(&self, a: &UserId, b: &UserId) {
        let mut state = self.state();
        state.friends.insert((a.clone(), b.clone()));
        state.friends.insert((b.clone(), a.clone()));
    }

    pub fn add_checkin(&self, checkin_id: &CheckinId, owner: &UserId, venue: VenueInfo) {
        self.state().checkins.insert(
            checkin_id.clone(),
            Checkin {
                owner: owner.clone(),
                venue,
            },
        );
    }

    /// Seeds a comment directly, bypassing the service.
    pub fn add_comment(&self, comment: StoredComment) {
        self.state().comments.push(comment);
    }

    pub fn comments(&self) -> Vec<StoredComment> {
        self.state().comments.clone()
    }

    /// Collaborator methods invoked so far, in order.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn calls(&self) -> Vec<&'static str> {
        self.state().hooks.calls.clone()
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn fail_on(&self, op: &'static str) {
        self.state().hooks.failing.insert(op);
    }
}

#[async_trait]
impl IdentityResolver for InMemoryStore {
    async fn resolve_user(&self, session_token: &Secret<String>) -> Result<UserId, AuthError> {
        let state = self.enter("resolve_user")?;
        state
            .sessions
            .get(session_token.expose_secret())
            .cloned()
            .ok_or(AuthError::InvalidSession)
    }

    async fn get_checkin_owner(&self, checkin_id: &CheckinId) -> Result<UserId, anyhow::Error> {
        let state = self.enter("get_checkin_owner")?;
        state
            .checkins
            .get(checkin_id)
            .map(|c| c.owner.clone())
            .ok_or_else(|| anyhow::anyhow!("Checkin {checkin_id} does not exist"))
    }

    async fn is_friend(
        &self,
        user_id: &UserId,
        other_user_id: &UserId,
    ) -> Result<bool, anyhow::Error> {
        let state = self.enter("is_friend")?;
        Ok(state
            .friends
            .contains(&(user_id.clone(), other_user_id.clone())))
    }

    async fn is_checkin_owner_profile_public(
        &self,
        checkin_id: &CheckinId,
    ) -> Result<bool, anyhow::Error> {
        let state = self.enter("is_checkin_owner_profile_public")?;
        let checkin = state
            .checkins
            .get(checkin_id)
            .ok_or_else(|| anyhow::anyhow!("Checkin {checkin_id} does not exist"))?;
        Ok(state
            .profiles
            .get(&checkin.owner)
            .is_some_and(|p| p.is_public))
    }

    async fn is_comment_owner(
        &self,
        user_id: &UserId,
        comment_id: &CommentId,
    ) -> Result<bool, anyhow::Error> {
        let state = self.enter("is_comment_owner")?;
        Ok(state
            .comments
            .iter()
            .any(|c| &c.id == comment_id && &c.user_id == user_id))
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn get_checkin_id_for_comment(
        &self,
        comment_id: &CommentId,
    ) -> Result<CheckinId, anyhow::Error> {
        let state = self.enter("get_checkin_id_for_comment")?;
        state
            .comments
            .iter()
            .find(|c| &c.id == comment_id)
            .map(|c| c.checkin_id.clone())
            .ok_or_else(|| anyhow::anyhow!("Comment {comment_id} does not exist"))
    }

    async fn insert_comment(
        &self,
        created_at: DateTime<Utc>,
        comment_id: &CommentId,
        user_id: &UserId,
        body: &CommentBody,
        checkin_id: &CheckinId,
    ) -> Result<(), anyhow::Error> {
        let mut state = self.enter("insert_comment")?;
        if state.comments.iter().any(|c| &c.id == comment_id) {
            anyhow::bail!("Comment id {comment_id} already exists");
        }
        state.comments.push(StoredComment {
            id: comment_id.clone(),
            user_id: user_id.clone(),
            checkin_id: checkin_id.clone(),
            body: body.as_ref().to_string(),
            created_at,
        });
        Ok(())
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), anyhow::Error> {
        let mut state = self.enter("delete_comment")?;
        let before = state.comments.len();
        state.comments.retain(|c| &c.id != comment_id);
        if state.comments.len() == before {
            anyhow::bail!("Comment {comment_id} was already deleted");
        }
        Ok(())
    }

    async fn select_comments_by_checkin(
        &self,
        checkin_id: &CheckinId,
    ) -> Result<CommentFields, anyhow::Error> {
        let state = self.enter("select_comments_by_checkin")?;
        let records = state
            .comments
            .iter()
            .filter(|c| &c.checkin_id == checkin_id)
            .map(|c| {
                let profile = state.profiles.get(&c.user_id);
                CommentRecord {
                    id: c.id.to_string(),
                    user_id: c.user_id.to_string(),
                    first_name: profile.map(|p| p.first_name.clone()).unwrap_or_default(),
                    last_name: profile.map(|p| p.last_name.clone()).unwrap_or_default(),
                    comment: c.body.clone(),
                    created_at: c.created_at,
                }
            })
            .collect();
        Ok(comment_fields(records))
    }

    async fn get_venue_info(&self, checkin_id: &CheckinId) -> Result<VenueInfo, anyhow::Error> {
        let state = self.enter("get_venue_info")?;
        state
            .checkins
            .get(checkin_id)
            .map(|c| c.venue.clone())
            .ok_or_else(|| anyhow::anyhow!("No venue found for checkin {checkin_id}"))
    }
}
