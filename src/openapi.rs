use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const AUTHOR: &str = "Author";
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Blog API")
		.summary("Authors, their posts and the comments on them")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::AUTHOR.into(),
			description: Some("Author management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comment management".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::Errors>, _>(|res| {
			res.example(error::Errors {
				errors: error::Message::new("error_code")
					.content("error message")
					.field("optional field")
					.detail("key", "value")
					.into_vec(),
			})
		})
}
