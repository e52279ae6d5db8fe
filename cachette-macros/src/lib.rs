//! Procedural macros for cachette
//!
//! Provides the [`macro@memoize`] attribute, which rewrites a function so
//! its results are served from an LRU cache with per-entry TTL expiration.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, Ident, ItemFn, ReturnType};

use cachette_macro_utils::{generate_key_expr, parse_memoize_attributes};

/// Memoizes a function with an LRU cache and per-entry TTL expiration.
///
/// Calling the annotated function first renders its arguments into a
/// cache key. On a hit the cached value is cloned and returned without
/// running the body; on a miss the body runs and the result is stored.
///
/// # Requirements
///
/// - The return type must implement `Clone` (and `Send` for the default
///   global scope).
/// - Every argument must implement `CacheKey` (provided for the common
///   standard-library types; implement it by hand for custom argument
///   types).
/// - Methods taking `self` are not supported; wrap the call in a free
///   function instead.
///
/// # Parameters
///
/// - `capacity`: maximum number of entries (integer, at least 1,
///   default `128`). When full, the least recently used entry is
///   evicted to make room.
/// - `ttl`: time-to-live in seconds (non-negative integer or float,
///   default `300.0`). An entry older than its TTL is dropped on
///   access and recomputed.
/// - `name`: registry name for the cache (string, defaults to the
///   function name). Statistics and invalidation are looked up under
///   this name.
/// - `scope`: `"global"` (default) shares one cache across all threads
///   behind a mutex; `"thread_local"` gives each thread its own
///   independent cache.
///
/// # Statistics and invalidation
///
/// On first use, a global-scope cache registers its statistics handle in
/// [`stats_registry`](../cachette_core/stats_registry/index.html) and a
/// clear callback in the global `InvalidationRegistry`, both under the
/// cache name. A thread-local cache registers only the clear callback,
/// and invalidating it clears the cache of whichever thread runs the
/// invalidation, not all threads.
///
/// # Examples
///
/// Basic usage:
///
/// ```ignore
/// use cachette::memoize;
///
/// #[memoize]
/// fn fibonacci(n: u64) -> u64 {
///     if n <= 1 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
/// }
/// ```
///
/// Bounded cache with a short TTL:
///
/// ```ignore
/// #[memoize(capacity = 500, ttl = 2.5)]
/// fn lookup_user(id: u64) -> String {
///     expensive_database_query(id)
/// }
/// ```
///
/// Fallible functions cache only successes, so errors are retried:
///
/// ```ignore
/// #[memoize(capacity = 100, ttl = 30)]
/// fn fetch_config(env: String) -> Result<String, String> {
///     read_remote_config(&env)
/// }
/// ```
///
/// Thread-local scope avoids cross-thread locking:
///
/// ```ignore
/// #[memoize(scope = "thread_local")]
/// fn parse_template(source: String) -> Template {
///     Template::compile(&source)
/// }
/// ```
///
/// Named cache with statistics:
///
/// ```ignore
/// use cachette::stats_registry;
///
/// #[memoize(name = "geo_lookups", capacity = 1000)]
/// fn resolve(address: String) -> Coordinates {
///     geocode(&address)
/// }
///
/// resolve("10 Main St".to_string());
/// let stats = stats_registry::get("geo_lookups").unwrap();
/// assert_eq!(stats.misses(), 1);
/// ```
#[proc_macro_attribute]
pub fn memoize(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attrs = match parse_memoize_attributes(attr.into()) {
        Ok(attrs) => attrs,
        Err(err) => return err.into(),
    };

    let input = parse_macro_input!(item as ItemFn);
    let vis = &input.vis;
    let sig = &input.sig;
    let fn_ident = &sig.ident;
    let block = &input.block;

    let ret_type = match &sig.output {
        ReturnType::Type(_, ty) => quote! { #ty },
        ReturnType::Default => quote! { () },
    };

    // Only successful results are worth caching, so `Result` returns get
    // the `put_result` path and errors are recomputed on the next call.
    let ret_type_str = ret_type.to_string().replace(' ', "");
    let is_result = ret_type_str.starts_with("Result<")
        || ret_type_str.starts_with("std::result::Result<")
        || ret_type_str.starts_with("::std::result::Result<");

    let mut arg_pats = Vec::new();
    for arg in sig.inputs.iter() {
        match arg {
            FnArg::Receiver(_) => {
                let err = quote! {
                    compile_error!("`#[memoize]` does not support methods taking `self`; wrap the call in a free function instead");
                };
                return TokenStream::from(quote! {
                    #err
                    #input
                });
            }
            FnArg::Typed(pat_type) => {
                let pat = &pat_type.pat;
                arg_pats.push(quote! { #pat });
            }
        }
    }

    let key_expr = generate_key_expr(&arg_pats);

    let cache_name = attrs
        .custom_name
        .clone()
        .unwrap_or_else(|| fn_ident.to_string());

    let fn_upper = fn_ident.to_string().to_uppercase();
    let global_cache_ident = format_ident!("CACHETTE_CACHE_{}", fn_upper);
    let tl_cache_ident = format_ident!("CACHETTE_TL_CACHE_{}", fn_upper);

    let capacity_expr = &attrs.capacity;
    let ttl_expr = &attrs.ttl;
    let scope_expr = &attrs.scope;

    let global_branch = generate_global_branch(
        &global_cache_ident,
        &ret_type,
        capacity_expr,
        ttl_expr,
        &key_expr,
        &cache_name,
        is_result,
        block,
    );

    let thread_local_branch = generate_thread_local_branch(
        &tl_cache_ident,
        &ret_type,
        capacity_expr,
        ttl_expr,
        &key_expr,
        &cache_name,
        is_result,
        block,
    );

    let expanded = quote! {
        #vis #sig {
            let __scope = #scope_expr;

            if __scope == ::cachette_core::CacheScope::ThreadLocal {
                #thread_local_branch
            } else {
                #global_branch
            }
        }
    };

    TokenStream::from(expanded)
}

/// Generates the body for a cache shared across threads behind a mutex.
#[allow(clippy::too_many_arguments)]
fn generate_global_branch(
    cache_ident: &Ident,
    ret_type: &TokenStream2,
    capacity_expr: &TokenStream2,
    ttl_expr: &TokenStream2,
    key_expr: &TokenStream2,
    cache_name: &str,
    is_result: bool,
    block: &syn::Block,
) -> TokenStream2 {
    let insert_call = if is_result {
        quote! { #cache_ident.lock().put_result(__key, &__result); }
    } else {
        quote! { #cache_ident.lock().put(__key, __result.clone()); }
    };

    quote! {
        static #cache_ident: ::once_cell::sync::Lazy<
            ::parking_lot::Mutex<::cachette_core::LruCache<#ret_type>>,
        > = ::once_cell::sync::Lazy::new(|| {
            ::parking_lot::Mutex::new(
                ::cachette_core::LruCache::new(#capacity_expr, #ttl_expr)
                    .expect("invalid cache configuration"),
            )
        });

        {
            static REGISTER_ONCE: ::std::sync::Once = ::std::sync::Once::new();
            REGISTER_ONCE.call_once(|| {
                ::cachette_core::stats_registry::register(
                    #cache_name,
                    #cache_ident.lock().stats_handle(),
                );
                ::cachette_core::InvalidationRegistry::global().register_clear_callback(
                    #cache_name,
                    || {
                        #cache_ident.lock().clear();
                    },
                );
            });
        }

        let __key = #key_expr;

        if let Some(cached) = #cache_ident.lock().get(&__key) {
            return cached;
        }

        let __result = (|| #block)();
        #insert_call
        __result
    }
}

/// Generates the body for a per-thread cache. The lookup result is bound
/// outside `with` so no `RefCell` borrow is held while the function body
/// runs, which keeps recursive calls safe.
#[allow(clippy::too_many_arguments)]
fn generate_thread_local_branch(
    cache_ident: &Ident,
    ret_type: &TokenStream2,
    capacity_expr: &TokenStream2,
    ttl_expr: &TokenStream2,
    key_expr: &TokenStream2,
    cache_name: &str,
    is_result: bool,
    block: &syn::Block,
) -> TokenStream2 {
    let insert_call = if is_result {
        quote! { #cache_ident.with(|cache| cache.borrow_mut().put_result(__key, &__result)); }
    } else {
        quote! { #cache_ident.with(|cache| cache.borrow_mut().put(__key, __result.clone())); }
    };

    quote! {
        thread_local! {
            static #cache_ident: ::std::cell::RefCell<::cachette_core::LruCache<#ret_type>> =
                ::std::cell::RefCell::new(
                    ::cachette_core::LruCache::new(#capacity_expr, #ttl_expr)
                        .expect("invalid cache configuration"),
                );
        }

        {
            static REGISTER_ONCE: ::std::sync::Once = ::std::sync::Once::new();
            REGISTER_ONCE.call_once(|| {
                ::cachette_core::InvalidationRegistry::global().register_clear_callback(
                    #cache_name,
                    || {
                        #cache_ident.with(|cache| cache.borrow_mut().clear());
                    },
                );
            });
        }

        let __key = #key_expr;

        let __cached = #cache_ident.with(|cache| cache.borrow_mut().get(&__key));
        if let Some(cached) = __cached {
            return cached;
        }

        let __result = (|| #block)();
        #insert_call
        __result
    }
}
