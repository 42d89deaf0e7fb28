pub use crate::{
	repr::{Author, Authors, Comments, CreateAuthor, Posts, UpdateAuthor},
	route::model::IdInput,
};
