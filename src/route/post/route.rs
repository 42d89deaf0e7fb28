use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path},
	openapi::tag,
	repr, Storage,
};

use super::{model, Error, RouteError};

/// List posts
/// Returns every post, oldest first.
#[route(tag = tag::POST)]
pub async fn list_posts(State(storage): State<Storage>) -> Result<Json<model::Posts>, RouteError> {
	let posts = storage.list_posts().await?;

	Ok(Json(repr::posts(&posts)))
}

/// Get single post
#[route(tag = tag::POST)]
pub async fn get_post(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = storage
		.find_post(path.id)
		.await?
		.ok_or(Error::UnknownPost(path.id))?;

	Ok(Json(repr::post(&post)))
}

/// Create post
/// Creates a new post. The author referenced by `authorId` must exist.
#[route(tag = tag::POST, response(status = 201, description = "Created the post.", shape = "Json<model::Post>"))]
pub async fn create_post(
	State(storage): State<Storage>,
	Json(input): Json<model::CreatePost>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = storage.create_post(&input).await?;

	Ok((StatusCode::CREATED, Json(repr::post(&post))).into_response())
}

/// Update post
/// Updates the title and content present in the body. The body `id` must match the path.
#[route(tag = tag::POST, response(status = 204, description = "Updated the post."))]
pub async fn update_post(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdatePost>,
) -> Result<impl IntoApiResponse, RouteError> {
	path.matches(input.id)?;

	if !storage.update_post(path.id, &input).await? {
		return Err(Error::UnknownPost(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete post
/// Deletes a post along with all of its comments.
#[route(tag = tag::POST, response(status = 204, description = "Deleted the post."))]
pub async fn delete_post(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	if !storage.delete_post(path.id).await? {
		return Err(Error::UnknownPost(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Get post comments
/// Returns every comment on the post, oldest first.
#[route(tag = tag::POST)]
pub async fn get_post_comments(
	State(storage): State<Storage>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Comments>, RouteError> {
	let post = storage
		.find_post_comments(path.id)
		.await?
		.ok_or(Error::UnknownPost(path.id))?;

	Ok(Json(repr::comments(&post.related)))
}
