//! Helpers shared by the HTTP tests.

use std::sync::Arc;

pub use axum_test::TestServer;
pub use serde_json::{json, Value};

pub(crate) use crate::{error, repr};
use crate::{store::MemoryStore, Storage};

/// A test server over a fresh in-memory store.
pub fn app() -> TestServer {
	app_with(Arc::new(MemoryStore::new()))
}

pub fn app_with(storage: Storage) -> TestServer {
	TestServer::new(crate::app(crate::State { storage })).unwrap()
}

pub async fn seed_author(app: &TestServer, user_name: &str) -> repr::Author {
	app.post("/authors")
		.json(&json!({
			"firstName": "John",
			"lastName": "Doe",
			"userName": user_name,
		}))
		.await
		.json()
}

pub async fn seed_post(app: &TestServer, author_id: i32) -> repr::Post {
	app.post("/posts")
		.json(&json!({
			"title": "A post",
			"content": "Some content.",
			"authorId": author_id,
		}))
		.await
		.json()
}

pub async fn seed_comment(app: &TestServer, author_id: i32, post_id: i32) -> repr::Comment {
	app.post("/comments")
		.json(&json!({
			"comment": "A comment",
			"authorId": author_id,
			"postId": post_id,
		}))
		.await
		.json()
}
