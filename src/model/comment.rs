use serde::{Deserialize, Serialize};

use super::{id_string, nullable, opt_id_string};
use crate::reconcile::Reconcile;
use crate::ViewModel;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, alias = "profile_url", alias = "profileImageUrl")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCounts {
    #[serde(default, deserialize_with = "nullable")]
    pub likes: u32,
}

/// A comment or a reply. Replies never carry replies of their own.
///
/// `pending` marks an optimistic placeholder that the backend has not
/// confirmed yet; it is never sent or received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ViewModel)]
#[serde(rename_all = "camelCase")]
#[view(collection = "comments")]
pub struct Comment {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default)]
    pub user: Option<Author>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub likes: Option<u32>,
    #[serde(default, rename = "_count", skip_serializing_if = "Option::is_none")]
    pub counts: Option<CommentCounts>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_liked: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub replies: Vec<Comment>,
    #[serde(skip)]
    pub pending: bool,
}

impl Comment {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Placeholder shown while the backend has not confirmed the comment.
    pub fn placeholder(temp_id: impl Into<String>, content: impl Into<String>, user: Option<Author>) -> Self {
        Self {
            pending: true,
            user,
            ..Self::new(temp_id, content)
        }
    }

    pub fn like_count(&self) -> u32 {
        self.likes
            .or_else(|| self.counts.as_ref().map(|c| c.likes))
            .unwrap_or(0)
    }

    pub fn like_state(&self) -> LikeState {
        LikeState {
            likes: self.like_count(),
            is_liked: self.is_liked,
        }
    }

    pub fn set_like_state(&mut self, state: LikeState) {
        self.likes = Some(state.likes);
        self.is_liked = state.is_liked;
    }

    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous")
    }
}

/// Like toggle response: `{ "likes": n, "isLiked": bool }`. Always the full truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    #[serde(default, deserialize_with = "nullable")]
    pub likes: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub is_liked: bool,
}

impl LikeState {
    /// Speculative flip: liking adds one, unliking removes one.
    pub fn toggled(&self) -> Self {
        let is_liked = !self.is_liked;
        let likes = if is_liked {
            self.likes.saturating_add(1)
        } else {
            self.likes.saturating_sub(1)
        };
        Self { likes, is_liked }
    }
}

impl Reconcile for LikeState {
    fn reconcile(&mut self, _previous: &Self) {}
}

/// Body of comment and reply submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
