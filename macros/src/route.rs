use darling::{ast, FromMeta};
use proc_macro::TokenStream;
use quote::{format_ident, quote};

#[derive(FromMeta)]
struct RouteArgs {
	#[darling(multiple)]
	tag: Vec<syn::Expr>,
	#[darling(multiple)]
	response: Vec<ResponseArgs>,
}

#[derive(FromMeta)]
struct ResponseArgs {
	status: syn::LitInt,
	shape: Option<syn::Type>,
	description: Option<String>,
}

pub fn from_input(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match RouteArgs::from_list(&args) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let function = syn::parse_macro_input!(input as syn::ItemFn);
	let (summary, description) = match extract_doc_comment(&function) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let fn_name = format_ident!("{}_docs", function.sig.ident);
	let fn_vis = &function.vis;

	let description = description.map(|description| quote!(.description(#description)));
	let tags = args.tag.iter();
	let responses = args.response.into_iter().map(|response| {
		let status = response.status;
		let shape = response.shape.map_or_else(|| quote!(()), |x| quote!(#x));

		match response.description {
			Some(description) => quote! {
				.response_with::<#status, #shape, _>(|res| res.description(#description))
			},
			None => quote! {
				.response::<#status, #shape>()
			},
		}
	});

	quote! {
		#function

		#fn_vis fn #fn_name(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
			op.summary(#summary)
				#description
				#(
					.tag(#tags)
				)*
				#(
					#responses
				)*
		}
	}
	.into()
}

/// Splits the doc comment into a one-line summary and an optional description.
fn extract_doc_comment(function: &syn::ItemFn) -> syn::Result<(String, Option<String>)> {
	let mut lines = Vec::new();

	for attr in &function.attrs {
		let syn::Meta::NameValue(ref doc) = attr.meta else {
			continue;
		};

		if !doc.path.is_ident("doc") {
			continue;
		}

		if let syn::Expr::Lit(syn::ExprLit {
			lit: syn::Lit::Str(ref literal),
			..
		}) = doc.value
		{
			// rustdoc trims the leading space of each line as well
			lines.push(literal.value().trim().to_owned());
		}
	}

	let mut lines = lines.into_iter().skip_while(String::is_empty);

	let Some(summary) = lines.next() else {
		return Err(syn::Error::new_spanned(
			&function.sig.ident,
			"routes need a doc comment, the first line of which is used as the summary",
		));
	};

	let description = lines.collect::<Vec<_>>().join("\n");
	let description = description.trim();

	Ok((
		summary,
		(!description.is_empty()).then(|| description.to_owned()),
	))
}
