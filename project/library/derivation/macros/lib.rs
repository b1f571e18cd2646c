use utility::{SerializeExt, TokenStream1};

mod elements;
mod format;
mod from_str;
mod str;
mod utility;

/// Derive an associated function returning an iterator over all variants of the given enum.
///
/// Variants with fields are allowed as long as the fields implement [`Default`].
#[proc_macro_derive(Elements)]
pub fn derive_elements(input: TokenStream1) -> TokenStream1 {
    elements::derive(input).serialize()
}

/// Derive a [`FromStr`][trait] implementation from the given fieldless enum.
///
/// One additionally has to specify the letter case `CASE` of the textual representation
/// via the helper attribute `#[format(CASE)]`. Currently, the only option is `dash_case`.
///
/// ## Examples
///
/// ```ignore
/// #[derive(FromStr)]
/// #[format(dash_case)]
/// pub enum Policy {
///     Error,
///     Warning,
/// }
/// ```
///
/// Roughly the following code will be derived from the code above:
///
/// ```ignore
/// impl core::str::FromStr for Policy {
///     type Err = ();
///
///     fn from_str(source: &str) -> Result<Self, Self::Err> {
///          Ok(match source {
///             "error" => Self::Error,
///             "warning" => Self::Warning,
///             _ => return Err(()),
///          })
///     }
/// }
/// ```
///
/// [trait]: std::str::FromStr
#[proc_macro_derive(FromStr, attributes(format))]
pub fn derive_from_str(input: TokenStream1) -> TokenStream1 {
    from_str::derive(input).serialize()
}

/// Derive a method mapping each variant to its textual representation.
///
/// The method is called `name` unless renamed with `#[str(METHOD)]`.
///
/// # Examples
///
/// ```ignore
/// #[derive(Str)]
/// #[format(dash_case)]
/// pub enum Validation {
///     None,
///     FullGraph { severity: Severity },
/// }
/// ```
///
/// Roughly the following code will be derived from the code above:
///
/// ```ignore
/// impl Validation {
///     pub const fn name(&self) -> &'static str {
///         match self {
///             Self::None => "none",
///             Self::FullGraph { .. } => "full-graph",
///         }
///     }
/// }
/// ```
#[proc_macro_derive(Str, attributes(format, str))]
pub fn derive_static_str(input: TokenStream1) -> TokenStream1 {
    str::derive(input).serialize()
}
