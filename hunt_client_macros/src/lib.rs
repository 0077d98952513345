mod view_model;

use proc_macro::TokenStream;

/// Derive macro for view-model entities mirrored from the backend.
///
/// Generates `hunt_client::Identified` and `hunt_client::Reconcile` impls.
///
/// # Attributes
///
/// - `#[view(collection = "products")]` on the struct sets the collection name.
///   Defaults to the snake_case type name plus `s`.
/// - `#[view(id)]` on a field marks the identifier. Defaults to the field named `id`.
/// - `#[view(local)]` on a field marks it client-only: a refresh or an
///   authoritative server response copies it over from the previous item.
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, ViewModel)]
/// #[view(collection = "products")]
/// struct Product {
///     pub id: String,
///     pub upvotes: u32,
///     #[serde(skip)]
///     #[view(local)]
///     pub is_upvoted: bool,
/// }
/// ```
#[proc_macro_derive(ViewModel, attributes(view))]
pub fn derive_view_model(input: TokenStream) -> TokenStream {
    view_model::derive_view_model(input)
}
