//! Shared utilities for cachette procedural macros
//!
//! This crate provides the attribute parsing and code generation pieces
//! behind the `#[memoize]` attribute in `cachette-macros`.

use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{punctuated::Punctuated, Expr, MetaNameValue, Token};

/// Parsed `#[memoize]` attribute arguments.
///
/// Each field holds the tokens to splice into the generated cache
/// construction; invalid inputs are carried as `compile_error!`
/// invocations so the error surfaces at the attribute site.
pub struct MemoizeAttributes {
    pub capacity: TokenStream2,
    pub ttl: TokenStream2,
    pub scope: TokenStream2,
    pub custom_name: Option<String>,
}

impl Default for MemoizeAttributes {
    fn default() -> Self {
        Self {
            capacity: quote! { 128usize },
            ttl: quote! { 300.0f64 },
            scope: quote! { ::cachette_core::CacheScope::Global },
            custom_name: None,
        }
    }
}

/// Parse the `capacity` attribute
pub fn parse_capacity_attribute(nv: &MetaNameValue) -> TokenStream2 {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            syn::Lit::Int(lit_int) => match lit_int.base10_parse::<usize>() {
                Ok(0) => quote! { compile_error!("`capacity` must be at least 1") },
                Ok(val) => quote! { #val },
                Err(_) => quote! { compile_error!("`capacity` does not fit in usize") },
            },
            _ => quote! { compile_error!("Invalid literal for `capacity`: expected integer") },
        },
        _ => {
            quote! { compile_error!("Invalid syntax for `capacity`: expected `capacity = <integer>`") }
        }
    }
}

/// Parse the `ttl` attribute; integer and float literals are both
/// accepted and normalized to seconds as `f64`.
pub fn parse_ttl_attribute(nv: &MetaNameValue) -> TokenStream2 {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            syn::Lit::Float(lit_float) => match lit_float.base10_parse::<f64>() {
                Ok(val) if val.is_finite() && val >= 0.0 => quote! { #val },
                _ => {
                    quote! { compile_error!("`ttl` must be a non-negative, finite number of seconds") }
                }
            },
            syn::Lit::Int(lit_int) => match lit_int.base10_parse::<u64>() {
                Ok(val) => {
                    let val = val as f64;
                    quote! { #val }
                }
                Err(_) => quote! { compile_error!("`ttl` does not fit in u64") },
            },
            _ => {
                quote! { compile_error!("Invalid literal for `ttl`: expected seconds as integer or float") }
            }
        },
        _ => {
            quote! { compile_error!("Invalid syntax for `ttl`: expected `ttl = <seconds>` (a negative literal is rejected here)") }
        }
    }
}

/// Parse the `scope` attribute and return the string value
pub fn parse_scope_attribute(nv: &MetaNameValue) -> Result<String, TokenStream2> {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            syn::Lit::Str(s) => {
                let val = s.value();
                if val == "global" || val == "thread_local" {
                    Ok(val)
                } else {
                    Err(
                        quote! { compile_error!("Invalid scope: expected \"global\" or \"thread_local\"") },
                    )
                }
            }
            _ => Err(quote! { compile_error!("Invalid literal for `scope`: expected string") }),
        },
        _ => Err(
            quote! { compile_error!("Invalid syntax for `scope`: expected `scope = \"global\"|\"thread_local\"`") },
        ),
    }
}

/// Parse the `name` attribute
pub fn parse_name_attribute(nv: &MetaNameValue) -> Result<String, TokenStream2> {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            syn::Lit::Str(s) => Ok(s.value()),
            _ => Err(quote! { compile_error!("Invalid literal for `name`: expected string") }),
        },
        _ => Err(quote! { compile_error!("Invalid syntax for `name`: expected `name = \"...\"`") }),
    }
}

/// Generate the cache key expression from the function's argument
/// patterns. Each argument contributes its [`CacheKey`] rendering; parts
/// are joined with `|`.
pub fn generate_key_expr(arg_pats: &[TokenStream2]) -> TokenStream2 {
    if arg_pats.is_empty() {
        quote! {{ String::new() }}
    } else {
        quote! {{
            use ::cachette_core::CacheKey;
            let mut __key_parts = Vec::new();
            #(
                __key_parts.push((#arg_pats).cache_key());
            )*
            __key_parts.join("|")
        }}
    }
}

/// Parse `#[memoize]` attributes from a token stream
pub fn parse_memoize_attributes(attr: TokenStream2) -> Result<MemoizeAttributes, TokenStream2> {
    use syn::parse::Parser;

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let parsed_args = parser.parse2(attr).map_err(|e| {
        let msg = format!("Failed to parse attributes: {}", e);
        quote! { compile_error!(#msg) }
    })?;

    let mut attrs = MemoizeAttributes::default();

    for nv in parsed_args {
        if nv.path.is_ident("capacity") {
            attrs.capacity = parse_capacity_attribute(&nv);
        } else if nv.path.is_ident("ttl") {
            attrs.ttl = parse_ttl_attribute(&nv);
        } else if nv.path.is_ident("scope") {
            match parse_scope_attribute(&nv) {
                Ok(scope_str) => {
                    attrs.scope = if scope_str == "thread_local" {
                        quote! { ::cachette_core::CacheScope::ThreadLocal }
                    } else {
                        quote! { ::cachette_core::CacheScope::Global }
                    };
                }
                Err(err) => return Err(err),
            }
        } else if nv.path.is_ident("name") {
            match parse_name_attribute(&nv) {
                Ok(name) => attrs.custom_name = Some(name),
                Err(err) => return Err(err),
            }
        } else {
            let unknown = nv.path.to_token_stream().to_string();
            let msg = format!(
                "Unknown attribute `{}`: expected `capacity`, `ttl`, `scope` or `name`",
                unknown
            );
            return Err(quote! { compile_error!(#msg) });
        }
    }

    Ok(attrs)
}
