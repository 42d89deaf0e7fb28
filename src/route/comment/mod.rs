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
	#[error("comment {0} does not exist")]
	UnknownComment(i32),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_comments, list_comments_docs)
				.post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/:id",
			get_with(get_comment, get_comment_docs)
				.put_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl ErrorShape for Error {
	fn code(&self) -> &'static str {
		match self {
			Self::UnknownComment(..) => "unknown_comment",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownComment(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		let message = error::Message::new(self.code());

		match self {
			Self::UnknownComment(comment) => message
				.content("The comment you requested does not exist.")
				.detail("comment", comment)
				.into_vec(),
		}
	}
}
