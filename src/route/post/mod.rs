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
	#[error("post {0} does not exist")]
	UnknownPost(i32),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_posts, list_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.api_route(
			"/:id/comments",
			get_with(get_post_comments, get_post_comments_docs),
		)
}

impl ErrorShape for Error {
	fn code(&self) -> &'static str {
		match self {
			Self::UnknownPost(..) => "unknown_post",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		let message = error::Message::new(self.code());

		match self {
			Self::UnknownPost(post) => message
				.content("The post you requested does not exist.")
				.detail("post", post)
				.into_vec(),
		}
	}
}
