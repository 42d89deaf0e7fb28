//! Records as they are persisted.
//!
//! These mirror the `authors`, `posts` and `comments` tables column for column.
//! They are never sent to a client directly; see [`crate::repr`] for the wire shape.

use std::fmt;

use chrono::{DateTime, Utc};

/// A single author.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Author {
	pub id: i32,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub user_name: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A single post, written by an author.
///
/// `author_id` is cleared when the author is deleted, the post itself is kept.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
	pub id: i32,
	pub title: String,
	pub content: String,
	pub author_id: Option<i32>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A single comment on a post.
///
/// Deleting either the author or the post deletes the comment.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Comment {
	pub id: i32,
	pub comment: String,
	pub author_id: i32,
	pub post_id: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A record along with one of its relations, loaded eagerly.
///
/// The related records are ordered by id.
#[derive(Debug, Clone)]
pub struct WithRelation<T, R> {
	pub record: T,
	pub related: Vec<R>,
}

/// The kinds of records that can be referenced by another record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
	Author,
	Post,
}

impl fmt::Display for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Author => "author",
			Self::Post => "post",
		})
	}
}
