use std::borrow::Cow;

use axum::{
	extract::rejection::PathRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{extract::Json, store};

pub type Map = serde_json::Map<String, Value>;

/// A single error message presented to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Message {
	/// A machine-readable error code.
	pub code: Cow<'static, str>,
	/// A human-readable description of the error.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content: Option<Cow<'static, str>>,
	/// The request field the error relates to, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'static, str>>,
	/// Additional structured information about the error.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl Message {
	pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
		Self {
			code: code.into(),
			content: None,
			field: None,
			details: None,
		}
	}

	#[must_use]
	pub fn content(mut self, content: impl Into<Cow<'static, str>>) -> Self {
		self.content = Some(content.into());
		self
	}

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Errors {
	pub errors: Vec<Message>,
}

/// Describes how a route-specific error is presented to the client.
///
/// [`ErrorShape::code`] is the machine-readable code sent to the client, while
/// the `Display` implementation is only used for logging.
pub trait ErrorShape: std::error::Error {
	fn code(&self) -> &'static str;
	fn status(&self) -> StatusCode;
	fn into_errors(self) -> Vec<Message>;
}

/// Errors that can occur in any route.
///
/// The Display implementation is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0:?}")]
	Json(axum_jsonschema::JsonSchemaRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("path id {path} does not match body id {body:?}")]
	IdMismatch { path: i32, body: Option<i32> },
	#[error("store error: {0}")]
	Store(#[from] store::Error),
	#[error("no route matched the request")]
	NotFound,
}

impl From<axum_jsonschema::JsonSchemaRejection> for AppError {
	fn from(rejection: axum_jsonschema::JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Path(..) | Self::IdMismatch { .. } => {
				StatusCode::BAD_REQUEST
			}
			Self::Store(store::Error::EmptyField(..) | store::Error::MissingReference(..)) => {
				StatusCode::BAD_REQUEST
			}
			Self::Store(store::Error::Database(..) | store::Error::SequenceExhausted(..)) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
			Self::NotFound => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<Message> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| {
						Message::new(error.code.clone())
							.content(format!("{field}: {error}"))
							.field(field.clone())
					})
				})
				.collect(),
			Self::Path(rejection) => Message::new("invalid_path")
				.content(rejection.body_text())
				.into_vec(),
			Self::IdMismatch { path, body } => Message::new("id_mismatch")
				.content(format!(
					"Request path id ({path}) and request body id ({}) must match",
					body.map_or_else(|| "undefined".to_owned(), |id| id.to_string())
				))
				.field("id")
				.detail("path", path)
				.detail("body", body)
				.into_vec(),
			Self::Store(store::Error::EmptyField(field)) => Message::new("empty_field")
				.content(format!("`{field}` must not be empty"))
				.field(field)
				.into_vec(),
			Self::Store(store::Error::MissingReference(entity, id)) => {
				Message::new(format!("unknown_{entity}"))
					.content(format!("The referenced {entity} does not exist."))
					.detail(&entity.to_string(), id)
					.into_vec()
			}
			Self::NotFound => Message::new("not_found").content("Not Found").into_vec(),
			Self::Store(store::Error::Database(..) | store::Error::SequenceExhausted(..)) => {
				Message::new("internal_server_error")
					.content("Internal server error")
					.into_vec()
			}
			Self::Json(..) => Vec::new(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		match self {
			// the rejection already carries the schema errors in its own body
			Self::Json(rejection) => rejection.into_response(),
			error => {
				let status = error.status();

				if status.is_server_error() {
					tracing::error!(%error, "request failed");
				}

				(
					status,
					Json(Errors {
						errors: error.into_errors(),
					}),
				)
					.into_response()
			}
		}
	}
}

/// The error type returned by route handlers: either an error shared by all
/// routes, or one specific to the route.
#[derive(Debug)]
pub enum RouteError<T> {
	App(AppError),
	Route(T),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T> From<store::Error> for RouteError<T> {
	fn from(error: store::Error) -> Self {
		Self::App(AppError::Store(error))
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				let status = error.status();

				(
					status,
					Json(Errors {
						errors: error.into_errors(),
					}),
				)
					.into_response()
			}
		}
	}
}

impl<T> aide::OperationOutput for RouteError<T> {
	type Inner = Errors;
}
