use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr};

pub fn derive_view_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match named_fields(&input) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    // Extract #[view(collection = "...")] from struct-level attributes
    let collection = extract_collection(&input);

    let id_field = match extract_id_field(&input, &fields) {
        Ok(ident) => ident,
        Err(err) => return err.to_compile_error().into(),
    };

    let local_fields: Vec<&syn::Ident> = fields
        .iter()
        .filter(|field| has_flag(field, "local"))
        .filter_map(|field| field.ident.as_ref())
        .collect();

    let expanded = quote! {
        impl hunt_client::Identified for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#id_field
            }
        }

        impl hunt_client::Reconcile for #name {
            fn reconcile(&mut self, previous: &Self) {
                let _ = previous;
                #(self.#local_fields = ::core::clone::Clone::clone(&previous.#local_fields); )*
            }
        }
    };

    TokenStream::from(expanded)
}

fn named_fields(input: &DeriveInput) -> syn::Result<Vec<Field>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(fields.named.iter().cloned().collect());
        }
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "ViewModel derive: only structs with named fields are supported",
    ))
}

fn extract_collection(input: &DeriveInput) -> String {
    for attr in &input.attrs {
        if !attr.path().is_ident("view") {
            continue;
        }

        let mut collection = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
            }
            Ok(())
        });

        if let Some(c) = collection {
            return c;
        }
    }

    // Default: snake_case struct name + "s"
    let name = input.ident.to_string();
    format!("{}s", to_snake_case(&name))
}

fn has_flag(field: &Field, flag: &str) -> bool {
    let mut found = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("view") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(flag) {
                found = true;
            }
            Ok(())
        });
    }
    found
}

fn extract_id_field(input: &DeriveInput, fields: &[Field]) -> syn::Result<syn::Ident> {
    if let Some(ident) = fields
        .iter()
        .find(|field| has_flag(field, "id"))
        .and_then(|field| field.ident.clone())
    {
        return Ok(ident);
    }

    // Default: look for a field named "id"
    fields
        .iter()
        .filter_map(|field| field.ident.clone())
        .find(|ident| ident == "id")
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "ViewModel derive: no field marked with #[view(id)] and no field named `id`",
            )
        })
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
