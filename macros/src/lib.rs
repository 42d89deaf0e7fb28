mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the handler with the suffix `_docs`.
///
/// The first line of the doc comment becomes the summary, and the remaining lines the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two new structs for a wire model: `CreateX` and `UpdateX`.
///
/// Fields are copied verbatim (including `doc`, `serde`, `validate` and `schemars` attributes)
/// unless marked otherwise:
///
/// - `#[model(key)]` is left out of `CreateX` and becomes `Option<T>` in `UpdateX`.
/// - `#[model(readonly)]` is left out of both.
/// - `#[model(immutable)]` is left out of `UpdateX`.
/// - `#[model(required)]` turns an `Option<T>` field into `T` in `CreateX`.
///
/// Every field of `UpdateX` is wrapped in an `Option`, so omitted fields are left untouched.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
