use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{require, require_some, Error, Result, Store};
use crate::{
	model::{self, Entity, WithRelation},
	repr,
};

/// A [`Store`] that keeps everything in memory.
///
/// Every write takes the lock once, so a delete and the rules it triggers are
/// never observable halfway through.
#[derive(Debug, Default)]
pub struct MemoryStore {
	tables: RwLock<Tables>,
}

#[derive(Debug)]
struct Tables {
	authors: Table<model::Author>,
	posts: Table<model::Post>,
	comments: Table<model::Comment>,
}

impl Default for Tables {
	fn default() -> Self {
		Self {
			authors: Table::new("authors"),
			posts: Table::new("posts"),
			comments: Table::new("comments"),
		}
	}
}

/// Rows ordered by id, with ids handed out like a `SERIAL` column.
#[derive(Debug)]
struct Table<T> {
	name: &'static str,
	rows: BTreeMap<i32, T>,
	sequence: i32,
}

impl<T> Table<T> {
	fn new(name: &'static str) -> Self {
		Self {
			name,
			rows: BTreeMap::new(),
			sequence: 0,
		}
	}
}

impl<T: Clone> Table<T> {
	fn next_id(&mut self) -> Result<i32> {
		self.sequence = self
			.sequence
			.checked_add(1)
			.ok_or(Error::SequenceExhausted(self.name))?;

		Ok(self.sequence)
	}

	fn get(&self, id: i32) -> Option<T> {
		self.rows.get(&id).cloned()
	}

	fn all(&self) -> Vec<T> {
		self.rows.values().cloned().collect()
	}

	fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
		self.rows.values().filter(|row| predicate(row)).cloned().collect()
	}
}

impl Tables {
	fn ensure_author(&self, id: i32) -> Result<()> {
		if !self.authors.rows.contains_key(&id) {
			return Err(Error::MissingReference(Entity::Author, id));
		}

		Ok(())
	}

	fn ensure_post(&self, id: i32) -> Result<()> {
		if !self.posts.rows.contains_key(&id) {
			return Err(Error::MissingReference(Entity::Post, id));
		}

		Ok(())
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[axum::async_trait]
impl Store for MemoryStore {
	async fn create_author(&self, input: &repr::CreateAuthor) -> Result<model::Author> {
		require("userName", &input.user_name)?;

		let mut tables = self.tables.write().await;
		let now = Utc::now();
		let author = model::Author {
			id: tables.authors.next_id()?,
			first_name: input.first_name.clone(),
			last_name: input.last_name.clone(),
			user_name: input.user_name.clone(),
			created_at: now,
			updated_at: now,
		};

		tables.authors.rows.insert(author.id, author.clone());

		Ok(author)
	}

	async fn find_author(&self, id: i32) -> Result<Option<model::Author>> {
		Ok(self.tables.read().await.authors.get(id))
	}

	async fn find_author_posts(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Author, model::Post>>> {
		let tables = self.tables.read().await;

		Ok(tables.authors.get(id).map(|record| WithRelation {
			record,
			related: tables.posts.filter(|post| post.author_id == Some(id)),
		}))
	}

	async fn find_author_comments(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Author, model::Comment>>> {
		let tables = self.tables.read().await;

		Ok(tables.authors.get(id).map(|record| WithRelation {
			record,
			related: tables.comments.filter(|comment| comment.author_id == id),
		}))
	}

	async fn list_authors(&self) -> Result<Vec<model::Author>> {
		Ok(self.tables.read().await.authors.all())
	}

	async fn update_author(&self, id: i32, input: &repr::UpdateAuthor) -> Result<bool> {
		require_some("userName", input.user_name.as_ref())?;

		let mut tables = self.tables.write().await;
		let Some(author) = tables.authors.rows.get_mut(&id) else {
			return Ok(false);
		};

		if let Some(ref first_name) = input.first_name {
			author.first_name.clone_from(first_name);
		}

		if let Some(ref last_name) = input.last_name {
			author.last_name.clone_from(last_name);
		}

		if let Some(ref user_name) = input.user_name {
			author.user_name.clone_from(user_name);
		}

		author.updated_at = Utc::now();

		Ok(true)
	}

	async fn delete_author(&self, id: i32) -> Result<bool> {
		let mut tables = self.tables.write().await;

		if tables.authors.rows.remove(&id).is_none() {
			return Ok(false);
		}

		tables
			.comments
			.rows
			.retain(|_, comment| comment.author_id != id);

		for post in tables.posts.rows.values_mut() {
			if post.author_id == Some(id) {
				post.author_id = None;
			}
		}

		Ok(true)
	}

	async fn create_post(&self, input: &repr::CreatePost) -> Result<model::Post> {
		require("title", &input.title)?;
		require("content", &input.content)?;

		let mut tables = self.tables.write().await;

		tables.ensure_author(input.author_id)?;

		let now = Utc::now();
		let post = model::Post {
			id: tables.posts.next_id()?,
			title: input.title.clone(),
			content: input.content.clone(),
			author_id: Some(input.author_id),
			created_at: now,
			updated_at: now,
		};

		tables.posts.rows.insert(post.id, post.clone());

		Ok(post)
	}

	async fn find_post(&self, id: i32) -> Result<Option<model::Post>> {
		Ok(self.tables.read().await.posts.get(id))
	}

	async fn find_post_comments(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Post, model::Comment>>> {
		let tables = self.tables.read().await;

		Ok(tables.posts.get(id).map(|record| WithRelation {
			record,
			related: tables.comments.filter(|comment| comment.post_id == id),
		}))
	}

	async fn list_posts(&self) -> Result<Vec<model::Post>> {
		Ok(self.tables.read().await.posts.all())
	}

	async fn update_post(&self, id: i32, input: &repr::UpdatePost) -> Result<bool> {
		require_some("title", input.title.as_ref())?;
		require_some("content", input.content.as_ref())?;

		let mut tables = self.tables.write().await;
		let Some(post) = tables.posts.rows.get_mut(&id) else {
			return Ok(false);
		};

		if let Some(ref title) = input.title {
			post.title.clone_from(title);
		}

		if let Some(ref content) = input.content {
			post.content.clone_from(content);
		}

		post.updated_at = Utc::now();

		Ok(true)
	}

	async fn delete_post(&self, id: i32) -> Result<bool> {
		let mut tables = self.tables.write().await;

		if tables.posts.rows.remove(&id).is_none() {
			return Ok(false);
		}

		tables.comments.rows.retain(|_, comment| comment.post_id != id);

		Ok(true)
	}

	async fn create_comment(&self, input: &repr::CreateComment) -> Result<model::Comment> {
		require("comment", &input.comment)?;

		let mut tables = self.tables.write().await;

		tables.ensure_author(input.author_id)?;
		tables.ensure_post(input.post_id)?;

		let now = Utc::now();
		let comment = model::Comment {
			id: tables.comments.next_id()?,
			comment: input.comment.clone(),
			author_id: input.author_id,
			post_id: input.post_id,
			created_at: now,
			updated_at: now,
		};

		tables.comments.rows.insert(comment.id, comment.clone());

		Ok(comment)
	}

	async fn find_comment(&self, id: i32) -> Result<Option<model::Comment>> {
		Ok(self.tables.read().await.comments.get(id))
	}

	async fn list_comments(&self) -> Result<Vec<model::Comment>> {
		Ok(self.tables.read().await.comments.all())
	}

	async fn update_comment(&self, id: i32, input: &repr::UpdateComment) -> Result<bool> {
		require_some("comment", input.comment.as_ref())?;

		let mut tables = self.tables.write().await;
		let Some(comment) = tables.comments.rows.get_mut(&id) else {
			return Ok(false);
		};

		if let Some(ref text) = input.comment {
			comment.comment.clone_from(text);
		}

		comment.updated_at = Utc::now();

		Ok(true)
	}

	async fn delete_comment(&self, id: i32) -> Result<bool> {
		Ok(self
			.tables
			.write()
			.await
			.comments
			.rows
			.remove(&id)
			.is_some())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn new_author(user_name: &str) -> repr::CreateAuthor {
		repr::CreateAuthor {
			first_name: None,
			last_name: None,
			user_name: user_name.into(),
		}
	}

	fn new_post(author_id: i32) -> repr::CreatePost {
		repr::CreatePost {
			title: "T".into(),
			content: "C".into(),
			author_id,
		}
	}

	fn new_comment(author_id: i32, post_id: i32) -> repr::CreateComment {
		repr::CreateComment {
			comment: "a comment".into(),
			author_id,
			post_id,
		}
	}

	#[tokio::test]
	async fn test_create_assigns_ids_in_order() {
		let store = MemoryStore::new();

		let first = store.create_author(&new_author("first")).await.unwrap();
		let second = store.create_author(&new_author("second")).await.unwrap();

		assert_eq!(first.id, 1);
		assert_eq!(second.id, 2);
		assert_eq!(first.user_name, "first");
		assert_eq!(first.created_at, first.updated_at);

		let ids = store
			.list_authors()
			.await
			.unwrap()
			.iter()
			.map(|author| author.id)
			.collect::<Vec<_>>();

		assert_eq!(ids, [1, 2]);
	}

	#[tokio::test]
	async fn test_create_rejects_empty_fields() {
		let store = MemoryStore::new();

		let result = store.create_author(&new_author("")).await;

		assert!(matches!(result, Err(Error::EmptyField("userName"))));
		assert!(store.list_authors().await.unwrap().is_empty());

		let author = store.create_author(&new_author("jdoe")).await.unwrap();
		let mut input = new_post(author.id);
		input.title = String::new();

		let result = store.create_post(&input).await;

		assert!(matches!(result, Err(Error::EmptyField("title"))));
		assert!(store.list_posts().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_create_rejects_missing_references() {
		let store = MemoryStore::new();

		let result = store.create_post(&new_post(7)).await;
		assert!(matches!(
			result,
			Err(Error::MissingReference(Entity::Author, 7))
		));

		let author = store.create_author(&new_author("jdoe")).await.unwrap();
		let result = store.create_comment(&new_comment(author.id, 3)).await;

		assert!(matches!(result, Err(Error::MissingReference(Entity::Post, 3))));
		assert!(store.list_comments().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_update_only_touches_given_fields() {
		let store = MemoryStore::new();
		let before = store
			.create_author(&repr::CreateAuthor {
				first_name: Some("John".into()),
				last_name: Some("Doe".into()),
				user_name: "jdoe".into(),
			})
			.await
			.unwrap();

		let updated = store
			.update_author(
				before.id,
				&repr::UpdateAuthor {
					id: Some(before.id),
					first_name: None,
					last_name: Some(Some("Smith".into())),
					user_name: None,
				},
			)
			.await
			.unwrap();

		assert!(updated);

		let after = store.find_author(before.id).await.unwrap().unwrap();

		assert_eq!(after.first_name, before.first_name);
		assert_eq!(after.last_name.as_deref(), Some("Smith"));
		assert_eq!(after.user_name, before.user_name);
		assert_eq!(after.created_at, before.created_at);
	}

	#[tokio::test]
	async fn test_create_fails_once_ids_run_out() {
		let store = MemoryStore::new();

		store.tables.write().await.authors.sequence = i32::MAX - 1;

		let last = store.create_author(&new_author("last")).await.unwrap();

		assert_eq!(last.id, i32::MAX);

		let result = store.create_author(&new_author("one too many")).await;

		assert!(matches!(result, Err(Error::SequenceExhausted("authors"))));
		assert_eq!(store.list_authors().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_update_clears_nullable_fields() {
		let store = MemoryStore::new();
		let before = store
			.create_author(&repr::CreateAuthor {
				first_name: Some("John".into()),
				last_name: Some("Doe".into()),
				user_name: "jdoe".into(),
			})
			.await
			.unwrap();

		let input = repr::UpdateAuthor {
			id: Some(before.id),
			first_name: Some(None),
			last_name: None,
			user_name: None,
		};

		assert!(store.update_author(before.id, &input).await.unwrap());

		let after = store.find_author(before.id).await.unwrap().unwrap();

		assert_eq!(after.first_name, None);
		assert_eq!(after.last_name, before.last_name);
	}

	#[tokio::test]
	async fn test_update_unknown_record() {
		let store = MemoryStore::new();

		let updated = store
			.update_comment(
				1,
				&repr::UpdateComment {
					id: Some(1),
					comment: Some("text".into()),
				},
			)
			.await
			.unwrap();

		assert!(!updated);
	}

	#[tokio::test]
	async fn test_delete_author_cascades_and_nullifies() {
		let store = MemoryStore::new();

		let author = store.create_author(&new_author("jdoe")).await.unwrap();
		let other = store.create_author(&new_author("other")).await.unwrap();
		let post = store.create_post(&new_post(author.id)).await.unwrap();

		assert_eq!(post.author_id, Some(author.id));

		for _ in 0..3 {
			store.create_comment(&new_comment(author.id, post.id)).await.unwrap();
		}

		let kept = store.create_comment(&new_comment(other.id, post.id)).await.unwrap();

		assert!(store.delete_author(author.id).await.unwrap());

		let comments = store.list_comments().await.unwrap();
		assert_eq!(comments, [kept]);

		let post = store.find_post(post.id).await.unwrap().unwrap();
		assert_eq!(post.author_id, None);

		assert!(store.find_author(author.id).await.unwrap().is_none());
		assert!(store.find_author(other.id).await.unwrap().is_some());
	}

	#[tokio::test]
	async fn test_delete_post_cascades_comments() {
		let store = MemoryStore::new();

		let author = store.create_author(&new_author("jdoe")).await.unwrap();
		let first = store.create_post(&new_post(author.id)).await.unwrap();
		let second = store.create_post(&new_post(author.id)).await.unwrap();

		store.create_comment(&new_comment(author.id, first.id)).await.unwrap();
		let kept = store
			.create_comment(&new_comment(author.id, second.id))
			.await
			.unwrap();

		assert!(store.delete_post(first.id).await.unwrap());
		assert_eq!(store.list_comments().await.unwrap(), [kept]);
		assert!(store.find_author(author.id).await.unwrap().is_some());
	}

	#[tokio::test]
	async fn test_delete_comment_leaves_parents() {
		let store = MemoryStore::new();

		let author = store.create_author(&new_author("jdoe")).await.unwrap();
		let post = store.create_post(&new_post(author.id)).await.unwrap();
		let comment = store.create_comment(&new_comment(author.id, post.id)).await.unwrap();

		assert!(store.delete_comment(comment.id).await.unwrap());
		assert!(!store.delete_comment(comment.id).await.unwrap());

		assert_eq!(store.find_author(author.id).await.unwrap(), Some(author));
		assert_eq!(store.find_post(post.id).await.unwrap(), Some(post));
	}

	#[tokio::test]
	async fn test_relations_are_loaded_in_id_order() {
		let store = MemoryStore::new();

		let author = store.create_author(&new_author("jdoe")).await.unwrap();
		let other = store.create_author(&new_author("other")).await.unwrap();
		let post = store.create_post(&new_post(author.id)).await.unwrap();

		store.create_post(&new_post(other.id)).await.unwrap();

		for author_id in [author.id, other.id, author.id] {
			store.create_comment(&new_comment(author_id, post.id)).await.unwrap();
		}

		let loaded = store.find_author_posts(author.id).await.unwrap().unwrap();
		assert_eq!(loaded.record, author);
		assert_eq!(loaded.related, [post.clone()]);

		let loaded = store.find_author_comments(author.id).await.unwrap().unwrap();
		let ids = loaded.related.iter().map(|c| c.id).collect::<Vec<_>>();
		assert_eq!(ids, [1, 3]);

		let loaded = store.find_post_comments(post.id).await.unwrap().unwrap();
		let ids = loaded.related.iter().map(|c| c.id).collect::<Vec<_>>();
		assert_eq!(ids, [1, 2, 3]);

		assert!(store.find_author_posts(42).await.unwrap().is_none());
		assert!(store.find_post_comments(42).await.unwrap().is_none());
	}
}
