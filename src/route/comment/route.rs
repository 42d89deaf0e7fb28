use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path},
	openapi::tag,
	repr, Storage,
};

use super::{model, Error, RouteError};

/// List comments
/// Returns every comment, oldest first.
#[route(tag = tag::COMMENT)]
pub async fn list_comments(
	State(storage): State<Storage>,
) -> Result<Json<model::Comments>, RouteError> {
	let comments = storage.list_comments().await?;

	Ok(Json(repr::comments(&comments)))
}

/// Get single comment
#[route(tag = tag::COMMENT)]
pub async fn get_comment(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = storage
		.find_comment(path.id)
		.await?
		.ok_or(Error::UnknownComment(path.id))?;

	Ok(Json(repr::comment(&comment)))
}

/// Create comment
/// Creates a new comment on a post. Both `authorId` and `postId` must reference existing records.
#[route(tag = tag::COMMENT, response(status = 201, description = "Created the comment.", shape = "Json<model::Comment>"))]
pub async fn create_comment(
	State(storage): State<Storage>,
	Json(input): Json<model::CreateComment>,
) -> Result<impl IntoApiResponse, RouteError> {
	let comment = storage.create_comment(&input).await?;

	Ok((StatusCode::CREATED, Json(repr::comment(&comment))).into_response())
}

/// Update comment
/// Updates the comment text. The body `id` must match the path.
#[route(tag = tag::COMMENT, response(status = 204, description = "Updated the comment."))]
pub async fn update_comment(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateComment>,
) -> Result<impl IntoApiResponse, RouteError> {
	path.matches(input.id)?;

	if !storage.update_comment(path.id, &input).await? {
		return Err(Error::UnknownComment(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete comment
#[route(tag = tag::COMMENT, response(status = 204, description = "Deleted the comment."))]
pub async fn delete_comment(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	if !storage.delete_comment(path.id).await? {
		return Err(Error::UnknownComment(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}
