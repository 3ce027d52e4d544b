//! Procedural macros for allowfail.
//!
//! `#[allow_fail]` is the decorator form of `allowfail::AllowFail`: it
//! rewrites a function so that every call returns `allowfail::Outcome<T>`
//! instead of failing. Use it through the `allowfail` crate, which
//! re-exports it.
//!
//! # Arguments
//!
//! ```ignore
//! #[allow_fail("label template {}", param, ..., on_error = handler, logger = logger)]
//! ```
//!
//! - The first argument is the label template (a string literal).
//! - Following arguments are positional label params, evaluated at the top
//!   of each call; they may refer to the function's arguments.
//! - `on_error = expr` sets the error handler.
//! - `logger = expr` sets the logger.
//!
//! # Return Types
//!
//! - `Result<T, E>` (or any alias whose first argument is `T`, such as
//!   `io::Result<T>`) becomes `Outcome<T>`; both `Err` and panics count as
//!   failures.
//! - Any other return type `T` becomes `Outcome<T>`; only panics count.
//!
//! The function keeps its name, attributes, doc comments, visibility and
//! generics. Its name is used to report failures of the error handler.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    Expr, ExprAssign, GenericArgument, ItemFn, LitStr, PathArguments, ReturnType, Token, Type,
    parse_macro_input, parse_quote,
};

/// Wraps a function so that each call returns `allowfail::Outcome<T>`.
///
/// # Example
///
/// ```ignore
/// use allowfail::allow_fail;
///
/// #[allow_fail("test {}", "valueerror")]
/// fn valueerror() -> Result<i32, std::io::Error> {
///     Err(std::io::Error::other("test exception"))
/// }
///
/// assert!(valueerror().is_failed());
/// ```
#[proc_macro_attribute]
pub fn allow_fail(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as GuardArgs);
    let func = parse_macro_input!(item as ItemFn);

    match expand(args, func) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Parsed `#[allow_fail(...)]` arguments.
struct GuardArgs {
    label: LitStr,
    params: Vec<Expr>,
    on_error: Option<Expr>,
    logger: Option<Expr>,
}

impl Parse for GuardArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Err(input.error("expected a label template, e.g. #[allow_fail(\"sync {}\", id)]"));
        }
        let label: LitStr = input.parse()?;

        let mut params = Vec::new();
        let mut on_error = None;
        let mut logger = None;

        if input.is_empty() {
            return Ok(Self {
                label,
                params,
                on_error,
                logger,
            });
        }
        input.parse::<Token![,]>()?;

        let rest = Punctuated::<Expr, Token![,]>::parse_terminated(input)?;
        for expr in rest {
            match option_name(&expr) {
                Some((name, value)) if name == "on_error" => {
                    if on_error.replace(value).is_some() {
                        return Err(syn::Error::new_spanned(expr, "duplicate `on_error` option"));
                    }
                }
                Some((name, value)) if name == "logger" => {
                    if logger.replace(value).is_some() {
                        return Err(syn::Error::new_spanned(expr, "duplicate `logger` option"));
                    }
                }
                Some((name, _)) => {
                    return Err(syn::Error::new_spanned(
                        expr,
                        format!("unknown option `{name}`, expected `on_error` or `logger`"),
                    ));
                }
                None => {
                    if on_error.is_some() || logger.is_some() {
                        return Err(syn::Error::new_spanned(
                            expr,
                            "label params must come before `on_error` and `logger`",
                        ));
                    }
                    params.push(expr);
                }
            }
        }

        Ok(Self {
            label,
            params,
            on_error,
            logger,
        })
    }
}

/// Splits `name = value` into its parts when `name` is a bare identifier.
fn option_name(expr: &Expr) -> Option<(String, Expr)> {
    let Expr::Assign(ExprAssign { left, right, .. }) = expr else {
        return None;
    };
    let Expr::Path(path) = left.as_ref() else {
        return None;
    };
    let ident = path.path.get_ident()?;
    Some((ident.to_string(), right.as_ref().clone()))
}

/// What the guarded function returned before rewriting.
enum Returns {
    /// `Result<T, E>`-like: the inner closure already returns a `Result`.
    Result { value: Type, original: Type },
    /// Any other type: the inner closure is wrapped in `Ok`.
    Plain(Type),
}

fn classify(output: &ReturnType) -> syn::Result<Returns> {
    let ty = match output {
        ReturnType::Default => return Ok(Returns::Plain(parse_quote!(()))),
        ReturnType::Type(_, ty) => ty.as_ref(),
    };

    if let Type::Path(type_path) = ty {
        if let Some(last) = type_path.path.segments.last() {
            if last.ident == "Result" {
                let PathArguments::AngleBracketed(generics) = &last.arguments else {
                    return Err(syn::Error::new_spanned(
                        ty,
                        "cannot infer the success type of a bare `Result`",
                    ));
                };
                let value = generics.args.iter().find_map(|arg| match arg {
                    GenericArgument::Type(value) => Some(value.clone()),
                    _ => None,
                });
                return match value {
                    Some(value) => Ok(Returns::Result {
                        value,
                        original: ty.clone(),
                    }),
                    None => Err(syn::Error::new_spanned(
                        ty,
                        "cannot infer the success type of this `Result`",
                    )),
                };
            }
        }
    }

    Ok(Returns::Plain(ty.clone()))
}

fn expand(args: GuardArgs, mut func: ItemFn) -> syn::Result<TokenStream2> {
    if let Some(asyncness) = &func.sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[allow_fail] does not support async functions",
        ));
    }
    if let Some(constness) = &func.sig.constness {
        return Err(syn::Error::new_spanned(
            constness,
            "#[allow_fail] does not support const functions",
        ));
    }

    let GuardArgs {
        label,
        params,
        on_error,
        logger,
    } = args;

    let name = LitStr::new(&func.sig.ident.to_string(), func.sig.ident.span());
    let body = &func.block;

    let (value_ty, call) = match classify(&func.sig.output)? {
        Returns::Result { value, original } => {
            let call = quote! {
                __allow_fail_guard.call_named(#name, move || -> #original #body)
            };
            (value, call)
        }
        Returns::Plain(ty) => {
            let call = quote! {
                __allow_fail_guard.call_named(#name, move || {
                    ::core::result::Result::<#ty, ::core::convert::Infallible>::Ok(
                        (move || -> #ty #body)()
                    )
                })
            };
            (ty, call)
        }
    };

    let with_logger = logger.map(|logger| quote!(.with_logger(#logger)));
    let with_handler = on_error.map(|handler| quote!(.on_error(#handler)));

    let new_body = quote! {{
        let __allow_fail_guard = ::allowfail::AllowFail::new(#label)
            #(.param(&(#params)))*
            #with_logger
            #with_handler;
        #call
    }};

    func.sig.output = parse_quote!(-> ::allowfail::Outcome<#value_ty>);
    func.block = syn::parse2(new_body)?;

    Ok(func.into_token_stream())
}
