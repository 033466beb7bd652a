//! Comments attached to materials and tasks
//!
//! Comment lists are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CommentId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: CommentId::new(),
            author: author.into(),
            text: text.into(),
            timestamp: Utc::now(),
            link_url: None,
        }
    }

    pub fn with_link(mut self, link_url: Option<String>) -> Self {
        self.link_url = link_url;
        self
    }
}

/// Join comment texts with `|`; pipes inside a text become spaces
pub fn join_comment_texts(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| c.text.replace('|', " "))
        .collect::<Vec<_>>()
        .join("|")
}

/// Split a `|`-joined list back into comments by `author`, dropping blank pieces
pub fn split_comment_texts(joined: &str, author: &str) -> Vec<Comment> {
    joined
        .split('|')
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| Comment::new(author, text))
        .collect()
}
