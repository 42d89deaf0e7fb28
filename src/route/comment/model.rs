pub use crate::{
	repr::{Comment, Comments, CreateComment, UpdateComment},
	route::model::IdInput,
};
