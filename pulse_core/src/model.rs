//! Records shared by the engagement engine and its collaborators.
//!
//! These mirror the client's persisted JSON (camelCase keys), so a store
//! written by the client can be read back here without translation.

use pulse_env::{ActorId, ContentId, NotificationId, UserId};
use serde::{Deserialize, Serialize};

use crate::freshness;

/// Verification badge level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationTier {
    Blue,
    Gold,
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Creator,
    Bot,
}

/// A User-shaped identity record.
///
/// Used for the signed-in viewer, for pre-authored accounts, for
/// synthesized reactors and for notification senders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_tier: Option<VerificationTier>,
    pub followers: u64,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    /// Creates an unverified user identity with no followers.
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        username: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            username: username.into(),
            avatar: avatar.into(),
            is_verified: false,
            verification_tier: None,
            followers: 0,
            role: Role::User,
        }
    }

    /// Marks the identity verified at the given tier.
    pub fn verified(mut self, tier: VerificationTier) -> Self {
        self.is_verified = true;
        self.verification_tier = Some(tier);
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// A simulated account the scheduler can animate ("bot").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedActor {
    pub id: ActorId,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub is_active: bool,
    pub auto_like: bool,
    pub auto_comment: bool,
    /// Free-text tag, cosmetic.
    pub personality: String,
    #[serde(default)]
    pub target_keywords: String,
    #[serde(default)]
    pub excluded_keywords: String,
    #[serde(rename = "minInterval")]
    pub min_interval_secs: u32,
    #[serde(rename = "maxInterval")]
    pub max_interval_secs: u32,
    pub total_interactions: u64,
    #[serde(rename = "lastActionTime", default, skip_serializing_if = "Option::is_none")]
    pub last_action_ms: Option<u64>,
}

impl SimulatedActor {
    /// The identity a notification is attributed to when this actor acts.
    ///
    /// Actors already have a stable name and avatar, so they are used as-is
    /// rather than synthesizing a reactor.
    pub fn identity(&self) -> Identity {
        Identity::new(
            UserId::from(&self.id),
            self.name.clone(),
            self.username.clone(),
            self.avatar.clone(),
        )
        .with_role(Role::Bot)
    }
}

/// Reaction kinds a viewer can leave on content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

/// A unit of content with an engagement counter ("post").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: ContentId,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    pub author_verified: bool,
    #[serde(rename = "likes")]
    pub like_count: u64,
    /// Viewer-relative: the signed-in viewer liked this item.
    #[serde(default)]
    pub is_liked: bool,
    /// Viewer-relative: the signed-in viewer's reaction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_reaction: Option<ReactionType>,
}

impl ContentItem {
    /// Creates an item with no viewer reaction.
    pub fn new(
        id: impl Into<ContentId>,
        owner_id: impl Into<UserId>,
        author_verified: bool,
        like_count: u64,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            author_verified,
            like_count,
            is_liked: false,
            current_reaction: None,
        }
    }

    /// True if the viewer liked or otherwise reacted to this item.
    pub fn viewer_has_reacted(&self) -> bool {
        self.is_liked || self.current_reaction.is_some()
    }

    /// Creation time encoded in the id, if it parses.
    pub fn embedded_timestamp_ms(&self) -> Option<u64> {
        freshness::embedded_timestamp_ms(self.id.as_str())
    }
}

/// Notification categories understood by the inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Mention,
    System,
    Verify,
    Gift,
}

/// A notification record addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "userId")]
    pub target_user_id: UserId,
    pub sender: Identity,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(rename = "postId", default, skip_serializing_if = "Option::is_none")]
    pub related_content_id: Option<ContentId>,
    pub text: String,
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
    pub is_read: bool,
}

impl Notification {
    /// Text shown for a like notification.
    pub const LIKE_TEXT: &'static str = "liked your post";

    /// Builds an unread like notification.
    pub fn like(
        id: NotificationId,
        target_user_id: UserId,
        sender: Identity,
        content_id: ContentId,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            id,
            target_user_id,
            sender,
            kind: NotificationKind::Like,
            related_content_id: Some(content_id),
            text: Self::LIKE_TEXT.to_string(),
            timestamp_ms,
            is_read: false,
        }
    }
}
