use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;

/// The `:id` path parameter shared by every record route.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	/// The unique identifier of the record.
	pub id: i32,
}

impl IdInput {
	/// Ensures an update body refers to the same record as the path it was sent to.
	pub fn matches(&self, body: Option<i32>) -> Result<(), AppError> {
		if body != Some(self.id) {
			return Err(AppError::IdMismatch {
				path: self.id,
				body,
			});
		}

		Ok(())
	}
}
