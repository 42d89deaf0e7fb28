use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path},
	openapi::tag,
	repr, Storage,
};

use super::{model, Error, RouteError};

/// List authors
/// Returns every author, oldest first.
#[route(tag = tag::AUTHOR)]
pub async fn list_authors(
	State(storage): State<Storage>,
) -> Result<Json<model::Authors>, RouteError> {
	let authors = storage.list_authors().await?;

	Ok(Json(repr::authors(&authors)))
}

/// Get single author
/// Returns a single author by their unique id.
#[route(tag = tag::AUTHOR)]
pub async fn get_author(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Author>, RouteError> {
	let author = storage
		.find_author(path.id)
		.await?
		.ok_or(Error::UnknownAuthor(path.id))?;

	Ok(Json(repr::author(&author)))
}

/// Create author
/// Creates a new author. Only `userName` is required.
#[route(tag = tag::AUTHOR, response(status = 201, description = "Created the author.", shape = "Json<model::Author>"))]
pub async fn create_author(
	State(storage): State<Storage>,
	Json(input): Json<model::CreateAuthor>,
) -> Result<impl IntoApiResponse, RouteError> {
	let author = storage.create_author(&input).await?;

	Ok((StatusCode::CREATED, Json(repr::author(&author))).into_response())
}

/// Update author
/// Updates the fields present in the body. The body `id` must match the path.
#[route(tag = tag::AUTHOR, response(status = 204, description = "Updated the author."))]
pub async fn update_author(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateAuthor>,
) -> Result<impl IntoApiResponse, RouteError> {
	path.matches(input.id)?;

	if !storage.update_author(path.id, &input).await? {
		return Err(Error::UnknownAuthor(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete author
/// Deletes an author along with all of their comments. Their posts are kept without an author.
#[route(tag = tag::AUTHOR, response(status = 204, description = "Deleted the author."))]
pub async fn delete_author(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	if !storage.delete_author(path.id).await? {
		return Err(Error::UnknownAuthor(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Get author posts
/// Returns every post written by the author, oldest first.
#[route(tag = tag::AUTHOR)]
pub async fn get_author_posts(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Posts>, RouteError> {
	let author = storage
		.find_author_posts(path.id)
		.await?
		.ok_or(Error::UnknownAuthor(path.id))?;

	Ok(Json(repr::posts(&author.related)))
}

/// Get author comments
/// Returns every comment left by the author, oldest first.
#[route(tag = tag::AUTHOR)]
pub async fn get_author_comments(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Comments>, RouteError> {
	let author = storage
		.find_author_comments(path.id)
		.await?
		.ok_or(Error::UnknownAuthor(path.id))?;

	Ok(Json(repr::comments(&author.related)))
}
