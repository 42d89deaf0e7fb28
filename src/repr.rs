//! The externally visible shape of each record.
//!
//! Storage uses snake_case columns, the API uses camelCase fields. The mapping
//! functions at the bottom of this module are the only place the two meet.

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model;

/// A single author.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Author {
	/// The unique identifier of the author.
	#[model(key)]
	pub id: i32,
	/// The author's first name.
	pub first_name: Option<String>,
	/// The author's last name.
	pub last_name: Option<String>,
	/// The name the author is displayed under.
	#[validate(length(min = 1))]
	pub user_name: String,
}

/// A single post, written by an author.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[model(key)]
	pub id: i32,
	/// The title of the post.
	#[validate(length(min = 1))]
	pub title: String,
	/// The creation time of the post.
	#[model(readonly)]
	pub created_at: DateTime<Utc>,
	/// The content of the post.
	#[validate(length(min = 1))]
	pub content: String,
	/// The author of the post, or `null` if the author has been deleted.
	#[model(immutable, required)]
	pub author_id: Option<i32>,
}

/// A single comment on a post.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	/// The unique identifier of the comment.
	#[model(key)]
	pub id: i32,
	/// The text of the comment.
	#[validate(length(min = 1))]
	pub comment: String,
	/// The creation time of the comment.
	#[model(readonly)]
	pub created_at: DateTime<Utc>,
	/// The author of the comment.
	#[model(immutable)]
	pub author_id: i32,
	/// The post the comment was left on.
	#[model(immutable)]
	pub post_id: i32,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct Authors {
	pub authors: Vec<Author>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct Posts {
	pub posts: Vec<Post>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct Comments {
	pub comments: Vec<Comment>,
}

pub fn author(record: &model::Author) -> Author {
	Author {
		id: record.id,
		first_name: record.first_name.clone(),
		last_name: record.last_name.clone(),
		user_name: record.user_name.clone(),
	}
}

pub fn post(record: &model::Post) -> Post {
	Post {
		id: record.id,
		title: record.title.clone(),
		created_at: record.created_at,
		content: record.content.clone(),
		author_id: record.author_id,
	}
}

pub fn comment(record: &model::Comment) -> Comment {
	Comment {
		id: record.id,
		comment: record.comment.clone(),
		created_at: record.created_at,
		author_id: record.author_id,
		post_id: record.post_id,
	}
}

pub fn authors(records: &[model::Author]) -> Authors {
	Authors {
		authors: records.iter().map(author).collect(),
	}
}

pub fn posts(records: &[model::Post]) -> Posts {
	Posts {
		posts: records.iter().map(post).collect(),
	}
}

pub fn comments(records: &[model::Comment]) -> Comments {
	Comments {
		comments: records.iter().map(comment).collect(),
	}
}
