pub use crate::{
	repr::{Comments, CreatePost, Post, Posts, UpdatePost},
	route::model::IdInput,
};
