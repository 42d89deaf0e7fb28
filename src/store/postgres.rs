use super::{require_some, Error, Result, Store};
use crate::{
	model::{self, Entity, WithRelation},
	repr, Database,
};

/// A [`Store`] backed by Postgres.
///
/// The referential rules are foreign key actions in the schema (see `migrations/`),
/// so each delete is a single statement and the database applies its effects atomically.
#[derive(Debug, Clone)]
pub struct PgStore {
	database: Database,
}

impl PgStore {
	pub fn new(database: Database) -> Self {
		Self { database }
	}
}

impl From<sqlx::Error> for Error {
	fn from(error: sqlx::Error) -> Self {
		let sqlx::Error::Database(ref database) = error else {
			return Self::Database(error);
		};

		match database.constraint() {
			Some("authors_user_name_check") => Self::EmptyField("userName"),
			Some("posts_title_check") => Self::EmptyField("title"),
			Some("posts_content_check") => Self::EmptyField("content"),
			Some("comments_comment_check") => Self::EmptyField("comment"),
			_ => Self::Database(error),
		}
	}
}

/// Maps a foreign key violation on insert to the record that could not be found.
fn missing_reference(error: sqlx::Error, author_id: i32, post_id: Option<i32>) -> Error {
	if let sqlx::Error::Database(ref database) = error {
		match (database.constraint(), post_id) {
			(Some("posts_author_id_fkey" | "comments_author_id_fkey"), _) => {
				return Error::MissingReference(Entity::Author, author_id);
			}
			(Some("comments_post_id_fkey"), Some(post_id)) => {
				return Error::MissingReference(Entity::Post, post_id);
			}
			_ => {}
		}
	}

	Error::from(error)
}

#[axum::async_trait]
impl Store for PgStore {
	async fn create_author(&self, input: &repr::CreateAuthor) -> Result<model::Author> {
		let author = sqlx::query_as::<_, model::Author>(
			r#"
				INSERT INTO authors (first_name, last_name, user_name)
				VALUES ($1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(&input.first_name)
		.bind(&input.last_name)
		.bind(&input.user_name)
		.fetch_one(&self.database)
		.await?;

		Ok(author)
	}

	async fn find_author(&self, id: i32) -> Result<Option<model::Author>> {
		let author = sqlx::query_as::<_, model::Author>(
			r#"
				SELECT * FROM authors
				WHERE id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.database)
		.await?;

		Ok(author)
	}

	async fn find_author_posts(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Author, model::Post>>> {
		let Some(record) = self.find_author(id).await? else {
			return Ok(None);
		};

		let related = sqlx::query_as::<_, model::Post>(
			r#"
				SELECT * FROM posts
				WHERE author_id = $1
				ORDER BY id
			"#,
		)
		.bind(id)
		.fetch_all(&self.database)
		.await?;

		Ok(Some(WithRelation { record, related }))
	}

	async fn find_author_comments(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Author, model::Comment>>> {
		let Some(record) = self.find_author(id).await? else {
			return Ok(None);
		};

		let related = sqlx::query_as::<_, model::Comment>(
			r#"
				SELECT * FROM comments
				WHERE author_id = $1
				ORDER BY id
			"#,
		)
		.bind(id)
		.fetch_all(&self.database)
		.await?;

		Ok(Some(WithRelation { record, related }))
	}

	async fn list_authors(&self) -> Result<Vec<model::Author>> {
		let authors = sqlx::query_as::<_, model::Author>("SELECT * FROM authors ORDER BY id")
			.fetch_all(&self.database)
			.await?;

		Ok(authors)
	}

	async fn update_author(&self, id: i32, input: &repr::UpdateAuthor) -> Result<bool> {
		require_some("userName", input.user_name.as_ref())?;

		let status = sqlx::query(
			r#"
				UPDATE authors
				SET
					first_name = CASE WHEN $1 THEN $2 ELSE first_name END,
					last_name = CASE WHEN $3 THEN $4 ELSE last_name END,
					user_name = COALESCE($5, user_name),
					updated_at = now()
				WHERE id = $6
			"#,
		)
		.bind(input.first_name.is_some())
		.bind(input.first_name.clone().flatten())
		.bind(input.last_name.is_some())
		.bind(input.last_name.clone().flatten())
		.bind(&input.user_name)
		.bind(id)
		.execute(&self.database)
		.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn delete_author(&self, id: i32) -> Result<bool> {
		let status = sqlx::query("DELETE FROM authors WHERE id = $1")
			.bind(id)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn create_post(&self, input: &repr::CreatePost) -> Result<model::Post> {
		let post = sqlx::query_as::<_, model::Post>(
			r#"
				INSERT INTO posts (title, content, author_id)
				VALUES ($1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(&input.title)
		.bind(&input.content)
		.bind(input.author_id)
		.fetch_one(&self.database)
		.await
		.map_err(|e| missing_reference(e, input.author_id, None))?;

		Ok(post)
	}

	async fn find_post(&self, id: i32) -> Result<Option<model::Post>> {
		let post = sqlx::query_as::<_, model::Post>(
			r#"
				SELECT * FROM posts
				WHERE id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.database)
		.await?;

		Ok(post)
	}

	async fn find_post_comments(
		&self,
		id: i32,
	) -> Result<Option<WithRelation<model::Post, model::Comment>>> {
		let Some(record) = self.find_post(id).await? else {
			return Ok(None);
		};

		let related = sqlx::query_as::<_, model::Comment>(
			r#"
				SELECT * FROM comments
				WHERE post_id = $1
				ORDER BY id
			"#,
		)
		.bind(id)
		.fetch_all(&self.database)
		.await?;

		Ok(Some(WithRelation { record, related }))
	}

	async fn list_posts(&self) -> Result<Vec<model::Post>> {
		let posts = sqlx::query_as::<_, model::Post>("SELECT * FROM posts ORDER BY id")
			.fetch_all(&self.database)
			.await?;

		Ok(posts)
	}

	async fn update_post(&self, id: i32, input: &repr::UpdatePost) -> Result<bool> {
		require_some("title", input.title.as_ref())?;
		require_some("content", input.content.as_ref())?;

		let status = sqlx::query(
			r#"
				UPDATE posts
				SET
					title = COALESCE($1, title),
					content = COALESCE($2, content),
					updated_at = now()
				WHERE id = $3
			"#,
		)
		.bind(&input.title)
		.bind(&input.content)
		.bind(id)
		.execute(&self.database)
		.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn delete_post(&self, id: i32) -> Result<bool> {
		let status = sqlx::query("DELETE FROM posts WHERE id = $1")
			.bind(id)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn create_comment(&self, input: &repr::CreateComment) -> Result<model::Comment> {
		let comment = sqlx::query_as::<_, model::Comment>(
			r#"
				INSERT INTO comments (comment, author_id, post_id)
				VALUES ($1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(&input.comment)
		.bind(input.author_id)
		.bind(input.post_id)
		.fetch_one(&self.database)
		.await
		.map_err(|e| missing_reference(e, input.author_id, Some(input.post_id)))?;

		Ok(comment)
	}

	async fn find_comment(&self, id: i32) -> Result<Option<model::Comment>> {
		let comment = sqlx::query_as::<_, model::Comment>(
			r#"
				SELECT * FROM comments
				WHERE id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.database)
		.await?;

		Ok(comment)
	}

	async fn list_comments(&self) -> Result<Vec<model::Comment>> {
		let comments = sqlx::query_as::<_, model::Comment>("SELECT * FROM comments ORDER BY id")
			.fetch_all(&self.database)
			.await?;

		Ok(comments)
	}

	async fn update_comment(&self, id: i32, input: &repr::UpdateComment) -> Result<bool> {
		require_some("comment", input.comment.as_ref())?;

		let status = sqlx::query(
			r#"
				UPDATE comments
				SET comment = COALESCE($1, comment), updated_at = now()
				WHERE id = $2
			"#,
		)
		.bind(&input.comment)
		.bind(id)
		.execute(&self.database)
		.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn delete_comment(&self, id: i32) -> Result<bool> {
		let status = sqlx::query("DELETE FROM comments WHERE id = $1")
			.bind(id)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}
