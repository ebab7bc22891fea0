//! Per-brand post list plus per-post action errors.

use std::collections::HashMap;

use console_common::{BrandId, PostId, PostRecord};

use super::{Action, Capabilities, capabilities_for};
use crate::errors::TransitionError;

/// Failure of the last action attempted on one post.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionError {
    pub action: Action,
    pub message: String,
}

/// Posts as last reported by the server.
///
/// Statuses only change through `replace_all`; actions never patch a record
/// locally.
#[derive(Debug, Default)]
pub struct PostBoard {
    brand_id: BrandId,
    posts: Vec<PostRecord>,
    errors: HashMap<PostId, ActionError>,
    issued_reloads: u64,
    applied_reload: u64,
}

impl PostBoard {
    pub fn new(brand_id: BrandId) -> Self {
        Self {
            brand_id,
            ..Self::default()
        }
    }

    pub fn brand_id(&self) -> BrandId {
        self.brand_id
    }

    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    pub fn post(&self, post_id: PostId) -> Option<&PostRecord> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn error(&self, post_id: PostId) -> Option<&ActionError> {
        self.errors.get(&post_id)
    }

    /// Ticket for a reload about to be issued.
    pub fn begin_reload(&mut self) -> u64 {
        self.issued_reloads += 1;
        self.issued_reloads
    }

    /// Install a reload result. Returns `false` (and changes nothing) when
    /// a newer reload has already been applied.
    pub fn replace_all(&mut self, ticket: u64, posts: Vec<PostRecord>) -> bool {
        if ticket <= self.applied_reload {
            return false;
        }
        self.applied_reload = ticket;
        self.errors
            .retain(|post_id, _| posts.iter().any(|post| post.id == *post_id));
        self.posts = posts;
        true
    }

    pub fn record_error(&mut self, post_id: PostId, action: Action, message: String) {
        self.errors.insert(post_id, ActionError { action, message });
    }

    pub fn clear_error(&mut self, post_id: PostId) {
        self.errors.remove(&post_id);
    }

    /// Controls exposed for one post.
    pub fn capabilities(&self, post_id: PostId) -> Option<Capabilities> {
        self.post(post_id).map(|post| capabilities_for(&post.status))
    }

    /// Whether `action` may be attempted on `post_id` right now.
    pub fn check(&self, post_id: PostId, action: Action) -> Result<(), TransitionError> {
        let post = self
            .post(post_id)
            .ok_or(TransitionError::UnknownPost { post_id })?;
        if capabilities_for(&post.status).allows(action) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed {
                action: action.as_str(),
                status: post.status.clone(),
            })
        }
    }
}
