use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{
	error::{self, ErrorShape},
	AppState,
};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	#[error("author {0} does not exist")]
	UnknownAuthor(i32),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_authors, list_authors_docs).post_with(create_author, create_author_docs),
		)
		.api_route(
			"/:id",
			get_with(get_author, get_author_docs)
				.put_with(update_author, update_author_docs)
				.delete_with(delete_author, delete_author_docs),
		)
		.api_route("/:id/posts", get_with(get_author_posts, get_author_posts_docs))
		.api_route(
			"/:id/comments",
			get_with(get_author_comments, get_author_comments_docs),
		)
}

impl ErrorShape for Error {
	fn code(&self) -> &'static str {
		match self {
			Self::UnknownAuthor(..) => "unknown_author",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownAuthor(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		let message = error::Message::new(self.code());

		match self {
			Self::UnknownAuthor(author) => message
				.content("The author you requested does not exist.")
				.detail("author", author)
				.into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[test]
	fn test_error_code_is_separate_from_display() {
		use super::Error;
		use crate::error::ErrorShape;

		let error = Error::UnknownAuthor(3);

		assert_eq!(error.to_string(), "author 3 does not exist");
		assert_eq!(error.code(), "unknown_author");
		assert_eq!(error.into_errors()[0].code, "unknown_author");
	}

	#[tokio::test]
	async fn test_create_and_get_author() {
		let app = app();

		let response = app
			.post("/authors")
			.json(&json!({
				"firstName": "John",
				"lastName": "Doe",
				"userName": "jdoe",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let created = response.json::<repr::Author>();

		assert_eq!(created.first_name.as_deref(), Some("John"));
		assert_eq!(created.last_name.as_deref(), Some("Doe"));
		assert_eq!(created.user_name, "jdoe");

		let response = app.get(&format!("/authors/{}", created.id)).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<repr::Author>(), created);
	}

	#[tokio::test]
	async fn test_create_author_requires_user_name() {
		let app = app();

		let response = app
			.post("/authors")
			.json(&json!({ "firstName": "John" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.post("/authors")
			.json(&json!({ "userName": "" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let authors = app.get("/authors").await.json::<repr::Authors>();

		assert!(authors.authors.is_empty());
	}

	#[tokio::test]
	async fn test_unknown_author() {
		let app = app();

		let response = app.get("/authors/41").await;

		assert_eq!(response.status_code(), 404);

		let errors = response.json::<error::Errors>();

		assert_eq!(errors.errors[0].code, "unknown_author");
		assert_eq!(errors.errors[0].details.as_ref().unwrap()["author"], 41);

		let response = app.get("/authors/abc").await;

		assert_eq!(response.status_code(), 400);
	}

	#[tokio::test]
	async fn test_update_only_changes_given_fields() {
		let app = app();
		let author = seed_author(&app, "jdoe").await;

		let response = app
			.put(&format!("/authors/{}", author.id))
			.json(&json!({ "id": author.id, "lastName": "Smith" }))
			.await;

		assert_eq!(response.status_code(), 204);

		let updated = app
			.get(&format!("/authors/{}", author.id))
			.await
			.json::<repr::Author>();

		assert_eq!(updated.first_name, author.first_name);
		assert_eq!(updated.last_name.as_deref(), Some("Smith"));
		assert_eq!(updated.user_name, author.user_name);
	}

	#[tokio::test]
	async fn test_update_clears_name_sent_as_null() {
		let app = app();
		let author = seed_author(&app, "jdoe").await;

		let response = app
			.put(&format!("/authors/{}", author.id))
			.json(&json!({ "id": author.id, "firstName": null }))
			.await;

		assert_eq!(response.status_code(), 204);

		let updated = app
			.get(&format!("/authors/{}", author.id))
			.await
			.json::<repr::Author>();

		assert_eq!(updated.first_name, None);
		assert_eq!(updated.last_name, author.last_name);
		assert_eq!(updated.user_name, author.user_name);
	}

	#[tokio::test]
	async fn test_update_rejects_empty_user_name() {
		let app = app();
		let author = seed_author(&app, "jdoe").await;

		let response = app
			.put(&format!("/authors/{}", author.id))
			.json(&json!({ "id": author.id, "userName": "" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let stored = app
			.get(&format!("/authors/{}", author.id))
			.await
			.json::<repr::Author>();

		assert_eq!(stored.user_name, "jdoe");
	}

	#[tokio::test]
	async fn test_update_requires_matching_ids() {
		let app = app();
		let author = seed_author(&app, "jdoe").await;

		let response = app
			.put(&format!("/authors/{}", author.id))
			.json(&json!({ "id": author.id + 1, "userName": "other" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.put(&format!("/authors/{}", author.id))
			.json(&json!({ "userName": "other" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let stored = app
			.get(&format!("/authors/{}", author.id))
			.await
			.json::<repr::Author>();

		assert_eq!(stored.user_name, "jdoe");

		// body ids are numbers, a numeric string is not accepted
		let response = app
			.put(&format!("/authors/{}", author.id))
			.json(&json!({ "id": author.id.to_string(), "userName": "other" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.put("/authors/99")
			.json(&json!({ "id": 99, "userName": "other" }))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[tokio::test]
	async fn test_author_relations() {
		let app = app();
		let author = seed_author(&app, "jdoe").await;
		let other = seed_author(&app, "other").await;
		let post = seed_post(&app, author.id).await;

		seed_post(&app, other.id).await;

		let first = seed_comment(&app, author.id, post.id).await;
		seed_comment(&app, other.id, post.id).await;
		let second = seed_comment(&app, author.id, post.id).await;

		let response = app.get(&format!("/authors/{}/posts", author.id)).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<repr::Posts>().posts, [post]);

		let response = app.get(&format!("/authors/{}/comments", author.id)).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<repr::Comments>().comments, [first, second]);

		let response = app.get("/authors/77/posts").await;

		assert_eq!(response.status_code(), 404);
	}

	#[tokio::test]
	async fn test_delete_author_cascades() {
		let app = app();
		let author = seed_author(&app, "jdoe").await;
		let post = seed_post(&app, author.id).await;

		for _ in 0..3 {
			seed_comment(&app, author.id, post.id).await;
		}

		let response = app.delete(&format!("/authors/{}", author.id)).await;

		assert_eq!(response.status_code(), 204);

		let comments = app.get("/comments").await.json::<repr::Comments>();

		assert!(comments.comments.is_empty());

		let orphan = app
			.get(&format!("/posts/{}", post.id))
			.await
			.json::<repr::Post>();

		assert_eq!(orphan.author_id, None);
		assert_eq!(orphan.title, post.title);

		let response = app.get(&format!("/authors/{}", author.id)).await;

		assert_eq!(response.status_code(), 404);

		let response = app.delete(&format!("/authors/{}", author.id)).await;

		assert_eq!(response.status_code(), 404);
	}
}
