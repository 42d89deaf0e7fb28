//! Persistence for authors, posts and comments.
//!
//! Deleting a record applies the referential rules atomically with the delete itself:
//!
//! - deleting an author deletes their comments and clears the author of their posts,
//! - deleting a post deletes its comments,
//! - deleting a comment has no further effect.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::{
	model::{self, Entity, WithRelation},
	repr,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A required text field was empty.
	#[error("{0} must not be empty")]
	EmptyField(&'static str),
	/// A record referenced by the input does not exist.
	#[error("{0} {1} does not exist")]
	MissingReference(Entity, i32),
	/// No ids are left to hand out for the named table.
	#[error("the id sequence of {0} is exhausted")]
	SequenceExhausted(&'static str),
	#[error("database error: {0}")]
	Database(#[source] sqlx::Error),
}

/// Storage for all three record types.
///
/// `update_*` and `delete_*` return whether a record with the given id existed.
/// Lookups that load a relation return `None` when the parent does not exist.
#[axum::async_trait]
pub trait Store: Send + Sync {
	async fn create_author(&self, input: &repr::CreateAuthor) -> Result<model::Author>;
	async fn find_author(&self, id: i32) -> Result<Option<model::Author>>;
	async fn find_author_posts(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Author, model::Post>>>;
	async fn find_author_comments(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Author, model::Comment>>>;
	async fn list_authors(&self) -> Result<Vec<model::Author>>;
	async fn update_author(&self, id: i32, input: &repr::UpdateAuthor) -> Result<bool>;
	async fn delete_author(&self, id: i32) -> Result<bool>;

	async fn create_post(&self, input: &repr::CreatePost) -> Result<model::Post>;
	async fn find_post(&self, id: i32) -> Result<Option<model::Post>>;
	async fn find_post_comments(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Post, model::Comment>>>;
	async fn list_posts(&self) -> Result<Vec<model::Post>>;
	async fn update_post(&self, id: i32, input: &repr::UpdatePost) -> Result<bool>;
	async fn delete_post(&self, id: i32) -> Result<bool>;

	async fn create_comment(&self, input: &repr::CreateComment) -> Result<model::Comment>;
	async fn find_comment(&self, id: i32) -> Result<Option<model::Comment>>;
	async fn list_comments(&self) -> Result<Vec<model::Comment>>;
	async fn update_comment(&self, id: i32, input: &repr::UpdateComment) -> Result<bool>;
	async fn delete_comment(&self, id: i32) -> Result<bool>;
}

/// Rejects empty values for a required text field, named as it appears on the wire.
fn require(field: &'static str, value: &str) -> Result<()> {
	if value.is_empty() {
		return Err(Error::EmptyField(field));
	}

	Ok(())
}

/// Like [`require`], but a missing value is left alone since it will not be written.
fn require_some(field: &'static str, value: Option<&String>) -> Result<()> {
	value.map_or(Ok(()), |value| require(field, value))
}
