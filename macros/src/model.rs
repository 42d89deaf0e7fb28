use darling::{ast, util::Flag, FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(attributes(model), forward_attrs(doc, serde, validate, schemars))]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,

	/// The identity of the record, only carried by the update input.
	#[darling(default)]
	key: Flag,
	/// Assigned by the server, never accepted from a client.
	#[darling(default)]
	readonly: Flag,
	/// Accepted on creation, never changed afterwards.
	#[darling(default)]
	immutable: Flag,
	/// An `Option<T>` on the wire that must be present on creation.
	#[darling(default)]
	required: Flag,
}

/// Returns `T` if the type is written as `Option<T>`.
fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
	let syn::Type::Path(path) = ty else {
		return None;
	};

	let segment = path.path.segments.last()?;

	if segment.ident != "Option" {
		return None;
	}

	let syn::PathArguments::AngleBracketed(ref args) = segment.arguments else {
		return None;
	};

	match args.args.first()? {
		syn::GenericArgument::Type(inner) => Some(inner),
		_ => None,
	}
}

fn is_doc(attr: &syn::Attribute) -> bool {
	attr.path().is_ident("doc")
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let mut input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	// `#[model(..)]` is only meaningful to this macro, so it cannot be left on the fields
	if let syn::Data::Struct(ref mut data) = input.data {
		for field in &mut data.fields {
			field.attrs.retain(|attr| !attr.path().is_ident("model"));
		}
	}

	expand(&input, receiver).into()
}

fn expand(input: &syn::DeriveInput, receiver: ModelInputReceiver) -> TokenStream {
	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}", ident);
	let update_ident = format_ident!("Update{}", ident);

	let create_doc = format!("The fields accepted when creating a [`{ident}`].");
	let update_doc = format!(
		"A partial update of a [`{ident}`]. Fields that are left out keep their stored value."
	);

	let attrs = receiver.attrs.iter().filter(|attr| !is_doc(attr));
	let attrs = quote!(#(#attrs)*);

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(ident, "#[model] only supports structs with named fields")
			.to_compile_error();
	};

	let mut create_fields = Vec::new();
	let mut update_fields = Vec::new();

	for field in fields.iter() {
		let Some(ref field_ident) = field.ident else {
			continue;
		};

		let vis = &field.vis;
		let ty = &field.ty;
		let field_attrs = &field.attrs;

		if field.key.is_present() {
			let docs = field.attrs.iter().filter(|attr| is_doc(attr));

			update_fields.push(quote! {
				#(#docs)*
				#vis #field_ident: Option<#ty>,
			});

			continue;
		}

		if field.readonly.is_present() {
			continue;
		}

		let required = if field.required.is_present() {
			option_inner(ty)
		} else {
			None
		};

		let create_ty = required.unwrap_or(ty);

		create_fields.push(quote! {
			#(#field_attrs)*
			#vis #field_ident: #create_ty,
		});

		if field.immutable.is_present() {
			continue;
		}

		// a nullable field distinguishes `null` (clear it) from leaving it out
		let nullable = option_inner(create_ty).is_some().then(|| {
			quote! {
				#[serde(default, deserialize_with = "::serde_with::rust::double_option::deserialize")]
			}
		});

		update_fields.push(quote! {
			#(#field_attrs)*
			#nullable
			#vis #field_ident: Option<#create_ty>,
		});
	}

	quote! {
		#input

		#[doc = #create_doc]
		#attrs
		#vis struct #create_ident #generics {
			#(
				#create_fields
			)*
		}

		#[doc = #update_doc]
		#attrs
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
}
