#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod repr;
mod route;
mod store;
mod trace;

#[cfg(test)]
mod test;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{extract::Request, Extension, Router, ServiceExt};
use sqlx::postgres::PgPoolOptions;
use tower::{Layer, ServiceBuilder};
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{config::StoreKind, error::AppError};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type Storage = Arc<dyn store::Store>;
pub type AppState = State;

/// The shared application state.
///
/// Handlers only ever see the [`store::Store`] seam, so the same router runs
/// against Postgres in production and the in-memory store in tests.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub storage: Storage,
}

/// Builds the full application router, including the OpenAPI document.
pub fn app(state: State) -> Router {
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest_api_service(
			"/authors",
			route::author::routes().with_state(state.clone()),
		)
		.nest_api_service("/posts", route::post::routes().with_state(state.clone()))
		.nest_api_service("/comments", route::comment::routes().with_state(state))
		.nest_api_service("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.fallback(|| async { AppError::NotFound })
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for the shutdown signal");
		std::future::pending::<()>().await;
	}

	tracing::info!("received shutdown signal, shutting down");
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = config::Config::from_env().expect("invalid configuration");
	let _guard =
		trace::init_tracing_subscriber(&config).expect("failed to initialize tracing");

	let storage: Storage = match config.store {
		StoreKind::Postgres => {
			let database = PgPoolOptions::new()
				.max_connections(config.database_max_connections)
				.connect(&config.database_url)
				.await
				.expect("failed to connect to database");

			sqlx::migrate!()
				.run(&database)
				.await
				.expect("failed to run migrations");

			Arc::new(store::PgStore::new(database))
		}
		StoreKind::Memory => {
			tracing::warn!("using the in-memory store, records will not be persisted");
			Arc::new(store::MemoryStore::new())
		}
	};

	let app = NormalizePathLayer::trim_trailing_slash().layer(app(State { storage }));

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(host = %config.host, port = config.port, "listening");

	axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.expect("server error");
}
