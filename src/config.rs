//! Runtime configuration, read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `postgres://localhost/blog-api` |
//! | `DATABASE_MAX_CONNECTIONS` | `5` |
//! | `HOST` | `127.0.0.1` |
//! | `PORT` | `8080` |
//! | `STORE` | `postgres` (or `memory`) |
//! | `LOG_LEVEL` | `info` |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | unset (no OpenTelemetry export) |

use std::{net::IpAddr, str::FromStr};

use tracing::level_filters::LevelFilter;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("`{name}` has an invalid value `{value}`: {reason}")]
	Invalid {
		name: &'static str,
		value: String,
		reason: String,
	},
}

/// Where records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
	Postgres,
	Memory,
}

impl FromStr for StoreKind {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.to_ascii_lowercase().as_str() {
			"postgres" => Ok(Self::Postgres),
			"memory" => Ok(Self::Memory),
			_ => Err("expected `postgres` or `memory`".into()),
		}
	}
}

#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub database_max_connections: u32,
	pub host: IpAddr,
	pub port: u16,
	pub store: StoreKind,
	pub log_level: LevelFilter,
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds the configuration from an arbitrary variable source.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let var = |name: &'static str| lookup(name).filter(|value| !value.is_empty());

		Ok(Self {
			database_url: var("DATABASE_URL")
				.unwrap_or_else(|| "postgres://localhost/blog-api".into()),
			database_max_connections: parsed(
				"DATABASE_MAX_CONNECTIONS",
				var("DATABASE_MAX_CONNECTIONS"),
			)?
			.unwrap_or(5),
			host: parsed("HOST", var("HOST"))?.unwrap_or(IpAddr::from([127, 0, 0, 1])),
			port: parsed("PORT", var("PORT"))?.unwrap_or(8080),
			store: parsed("STORE", var("STORE"))?.unwrap_or(StoreKind::Postgres),
			log_level: parsed("LOG_LEVEL", var("LOG_LEVEL"))?.unwrap_or(LevelFilter::INFO),
			otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
		})
	}
}

fn parsed<T>(name: &'static str, value: Option<String>) -> Result<Option<T>, Error>
where
	T: FromStr,
	T::Err: ToString,
{
	value
		.map(|value| {
			value.parse().map_err(|e: T::Err| Error::Invalid {
				name,
				reason: e.to_string(),
				value,
			})
		})
		.transpose()
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|name| vars.get(name).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[]).unwrap();

		assert_eq!(config.database_url, "postgres://localhost/blog-api");
		assert_eq!(config.database_max_connections, 5);
		assert_eq!(config.host, IpAddr::from([127, 0, 0, 1]));
		assert_eq!(config.port, 8080);
		assert_eq!(config.store, StoreKind::Postgres);
		assert_eq!(config.log_level, LevelFilter::INFO);
		assert!(config.otlp_endpoint.is_none());
	}

	#[test]
	fn test_overrides() {
		let config = config(&[
			("PORT", "3000"),
			("HOST", "0.0.0.0"),
			("STORE", "Memory"),
			("LOG_LEVEL", "debug"),
			("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
		])
		.unwrap();

		assert_eq!(config.port, 3000);
		assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
		assert_eq!(config.store, StoreKind::Memory);
		assert_eq!(config.log_level, LevelFilter::DEBUG);
		assert_eq!(
			config.otlp_endpoint.as_deref(),
			Some("http://localhost:4317")
		);
	}

	#[test]
	fn test_empty_values_use_defaults() {
		let config = config(&[("PORT", ""), ("OTEL_EXPORTER_OTLP_ENDPOINT", "")]).unwrap();

		assert_eq!(config.port, 8080);
		assert!(config.otlp_endpoint.is_none());
	}

	#[test]
	fn test_invalid_values() {
		for (name, value) in [
			("PORT", "eighty"),
			("STORE", "sqlite"),
			("DATABASE_MAX_CONNECTIONS", "-1"),
			("LOG_LEVEL", "loud"),
		] {
			let error = config(&[(name, value)]).unwrap_err();

			assert!(
				matches!(&error, Error::Invalid { name: n, .. } if *n == name),
				"{error}"
			);
		}
	}
}
