//! Rust templates
//!
//! Every template builds a token stream with `quote!` and returns its text;
//! the backend formatter turns that into readable source.

use crate::backends::context::{
    ArgContext, ClientContext, EnumsContext, FragmentsContext, ImportContext, MethodContext,
    ModulesContext, OperationsContext, PlaceholderContext, ReexportContext, TypeIndexContext,
    TypesContext,
};
use crate::backends::{context, TemplateFn, TemplateSet};
use crate::error::GeneratorError;
use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};
use serde_json::Value;

const HEADER: &str = " Generated by gqlsynth. Do not edit.";

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Keywords that cannot be raw identifiers
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

pub(super) fn template_set() -> TemplateSet {
    TemplateSet::new(&[
        ("placeholder", placeholder as TemplateFn),
        ("enums", enums as TemplateFn),
        ("models", models as TemplateFn),
        ("inputs", inputs as TemplateFn),
        ("batch-index", batch_index as TemplateFn),
        ("reexport", reexport as TemplateFn),
        ("type-index", type_index as TemplateFn),
        ("fragments", fragments as TemplateFn),
        ("operations", operations as TemplateFn),
        ("utils", utils as TemplateFn),
        ("client", client as TemplateFn),
        ("module-manifest", module_manifest as TemplateFn),
    ])
}

/// Build an identifier, escaping Rust keywords
fn ident(template: &str, name: &str) -> Result<Ident, GeneratorError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name != "_";
    if !valid {
        return Err(GeneratorError::render(template, format!("invalid identifier `{name}`")));
    }

    if NON_RAW_KEYWORDS.contains(&name) {
        Ok(format_ident!("{}_", name))
    } else if RUST_KEYWORDS.contains(&name) {
        Ok(Ident::new_raw(name, Span::call_site()))
    } else {
        Ok(Ident::new(name, Span::call_site()))
    }
}

/// Identifier for a schema field, plus the serde rename when it differs
fn field_ident(template: &str, name: &str) -> Result<(Ident, Option<String>), GeneratorError> {
    let snake = name.to_snake_case();
    let id = ident(template, &snake)?;
    let unraw = id.to_string().trim_start_matches("r#").to_string();
    let rename = (unraw != name).then(|| name.to_string());
    Ok((id, rename))
}

/// Variant identifier for an enum value
fn variant_ident(template: &str, value: &str) -> Result<Ident, GeneratorError> {
    let camel = value.to_upper_camel_case();
    match camel.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => ident(template, &camel),
        _ => ident(template, &format!("V{camel}")),
    }
}

fn parse_type(template: &str, text: &str) -> Result<syn::Type, GeneratorError> {
    syn::parse_str(text)
        .map_err(|e| GeneratorError::render(template, format!("invalid type `{text}`: {e}")))
}

fn parse_path(template: &str, text: &str) -> Result<syn::Path, GeneratorError> {
    syn::parse_str(text)
        .map_err(|e| GeneratorError::render(template, format!("invalid path `{text}`: {e}")))
}

/// A raw string literal holding `text` verbatim
fn raw_str(template: &str, text: &str) -> Result<TokenStream, GeneratorError> {
    format!("r#\"{text}\"#")
        .parse()
        .map_err(|e| GeneratorError::render(template, format!("invalid literal: {e}")))
}

fn use_items(template: &str, imports: &[ImportContext]) -> Result<TokenStream, GeneratorError> {
    let mut items = TokenStream::new();
    for import in imports.iter().filter(|i| !i.names.is_empty()) {
        let module = parse_path(template, &import.module)?;
        let names = import
            .names
            .iter()
            .map(|n| ident(template, n))
            .collect::<Result<Vec<_>, _>>()?;
        items.extend(quote! { use #module::{#(#names),*}; });
    }
    Ok(items)
}

fn placeholder(value: &Value) -> Result<String, GeneratorError> {
    let ctx: PlaceholderContext = context("placeholder", value)?;
    let message = format!(" {}", ctx.message);
    Ok(quote! {
        #![doc = #HEADER]
        #![doc = ""]
        #![doc = #message]
    }
    .to_string())
}

fn enums(value: &Value) -> Result<String, GeneratorError> {
    let ctx: EnumsContext = context("enums", value)?;
    let mut items = Vec::new();

    for item in &ctx.enums {
        let name = ident("enums", &item.name)?;
        let doc = ctx
            .comments
            .then(|| format!(" GraphQL enum `{}`", item.name))
            .map(|d| quote! { #[doc = #d] });

        let mut variants = Vec::new();
        for v in &item.values {
            let variant = variant_ident("enums", v)?;
            variants.push(quote! {
                #[serde(rename = #v)]
                #variant,
            });
        }

        items.push(quote! {
            #doc
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
            pub enum #name {
                #(#variants)*
            }
        });
    }

    Ok(quote! {
        #![doc = #HEADER]

        use serde::{Deserialize, Serialize};

        #(#items)*
    }
    .to_string())
}

fn declarations(template: &str, value: &Value) -> Result<String, GeneratorError> {
    let ctx: TypesContext = context(template, value)?;
    let imports = use_items(template, &ctx.imports)?;
    let mut items = Vec::new();

    for ty in &ctx.types {
        let name = ident(template, &ty.name)?;
        let doc = ctx
            .comments
            .then(|| format!(" GraphQL type `{}`", ty.schema_name))
            .map(|d| quote! { #[doc = #d] });

        let mut fields = Vec::new();
        for field in &ty.fields {
            let (field_name, rename) = field_ident(template, &field.name)?;
            let inner = parse_type(template, &field.type_expr)?;
            let inner = if field.nested {
                quote! { Box<#inner> }
            } else {
                quote! { #inner }
            };
            let field_type = if field.required {
                inner
            } else {
                quote! { Option<#inner> }
            };
            let rename = rename.map(|r| quote! { #[serde(rename = #r)] });
            let doc = ctx
                .comments
                .then(|| format!(" `{}`", field.graphql_type))
                .map(|d| quote! { #[doc = #d] });

            fields.push(quote! {
                #doc
                #rename
                pub #field_name: #field_type,
            });
        }

        items.push(quote! {
            #doc
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct #name {
                #(#fields)*
            }
        });
    }

    Ok(quote! {
        #![doc = #HEADER]

        use serde::{Deserialize, Serialize};
        #imports

        #(#items)*
    }
    .to_string())
}

fn models(value: &Value) -> Result<String, GeneratorError> {
    declarations("models", value)
}

fn inputs(value: &Value) -> Result<String, GeneratorError> {
    declarations("inputs", value)
}

fn glob_reexports(template: &str, modules: &[String]) -> Result<Vec<TokenStream>, GeneratorError> {
    modules
        .iter()
        .map(|m| {
            let path = parse_path(template, m)?;
            Ok(quote! { pub use #path::*; })
        })
        .collect()
}

fn batch_index(value: &Value) -> Result<String, GeneratorError> {
    let ctx: ModulesContext = context("batch-index", value)?;
    let uses = glob_reexports("batch-index", &ctx.modules)?;
    Ok(quote! {
        #![doc = #HEADER]

        #(#uses)*
    }
    .to_string())
}

fn reexport(value: &Value) -> Result<String, GeneratorError> {
    let ctx: ReexportContext = context("reexport", value)?;
    let path = parse_path("reexport", &ctx.module)?;
    Ok(quote! {
        #![doc = #HEADER]

        pub use #path::*;
    }
    .to_string())
}

fn type_index(value: &Value) -> Result<String, GeneratorError> {
    let ctx: TypeIndexContext = context("type-index", value)?;
    let uses = glob_reexports("type-index", &ctx.modules)?;
    let aliases = ctx
        .scalars
        .iter()
        .map(|s| {
            let name = ident("type-index", s)?;
            Ok(quote! { pub type #name = String; })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    Ok(quote! {
        #![doc = #HEADER]

        #(#uses)*

        #(#aliases)*
    }
    .to_string())
}

fn fragments(value: &Value) -> Result<String, GeneratorError> {
    let ctx: FragmentsContext = context("fragments", value)?;
    let mut consts = Vec::new();
    let mut entries = Vec::new();

    for fragment in &ctx.fragments {
        let const_name = ident("fragments", &fragment.name.to_shouty_snake_case())?;
        let body = format!(
            "fragment {} on {} {{\n{}\n}}",
            fragment.name, fragment.on_type, fragment.selection
        );
        let literal = raw_str("fragments", &body)?;
        let doc = format!(" `{}` on `{}`", fragment.name, fragment.on_type);
        let name = &fragment.name;

        consts.push(quote! {
            #[doc = #doc]
            pub const #const_name: &str = #literal;
        });
        entries.push(quote! { (#name, #const_name) });
    }

    Ok(quote! {
        #![doc = #HEADER]

        #(#consts)*

        /// All fragments by name
        pub const FRAGMENTS: &[(&str, &str)] = &[#(#entries),*];
    }
    .to_string())
}

fn method(m: &MethodContext, with_utils: bool) -> Result<TokenStream, GeneratorError> {
    let name = ident("operations", &m.name.to_snake_case())?;
    let field = &m.name;
    let document = raw_str("operations", &m.document)?;

    let ret = parse_type("operations", &m.return_type)?;
    let ret = if m.nullable {
        quote! { Option<#ret> }
    } else {
        quote! { #ret }
    };

    let mut params = Vec::new();
    let mut variables = Vec::new();
    for ArgContext {
        name: arg,
        type_expr,
        required,
    } in &m.args
    {
        let (arg_ident, _) = field_ident("operations", arg)?;
        let ty = parse_type("operations", type_expr)?;
        let ty = if *required {
            quote! { #ty }
        } else {
            quote! { Option<#ty> }
        };
        params.push(quote! { #arg_ident: #ty });
        variables.push(quote! { #arg: #arg_ident });
    }

    let call = if with_utils {
        quote! {
            with_timeout(
                with_retry(|| self.execute(DOCUMENT, #field, variables.clone()), &self.options),
                self.options.timeout,
            )
            .await
        }
    } else {
        quote! { self.execute(DOCUMENT, #field, variables).await }
    };

    Ok(quote! {
        pub async fn #name(&self, #(#params),*) -> Result<#ret, BoxError> {
            const DOCUMENT: &str = #document;
            let variables = serde_json::json!({ #(#variables),* });
            #call
        }
    })
}

fn operations(value: &Value) -> Result<String, GeneratorError> {
    let ctx: OperationsContext = context("operations", value)?;
    let client = ident("operations", &ctx.client_name)?;
    let imports = use_items("operations", &ctx.imports)?;
    let with_utils = ctx.utils_module.is_some();
    let doc = format!(" Client for {} operations", ctx.kind);

    let methods = ctx
        .methods
        .iter()
        .map(|m| method(m, with_utils))
        .collect::<Result<Vec<_>, _>>()?;

    let (utils_use, options_field, options_param, options_init, headers) = match &ctx.utils_module {
        Some(module) => {
            let path = parse_path("operations", module)?;
            (
                quote! { use #path::{with_retry, with_timeout, ClientOptions}; },
                quote! { options: ClientOptions, },
                quote! { , options: ClientOptions },
                quote! { options, },
                quote! {
                    for (key, value) in &self.options.headers {
                        request = request.header(key.as_str(), value.as_str());
                    }
                },
            )
        }
        None => Default::default(),
    };

    Ok(quote! {
        #![doc = #HEADER]

        use serde::de::DeserializeOwned;
        use serde_json::Value;
        #imports
        #utils_use

        type BoxError = Box<dyn std::error::Error + Send + Sync>;

        #[doc = #doc]
        #[derive(Debug, Clone)]
        pub struct #client {
            http: reqwest::Client,
            endpoint: String,
            #options_field
        }

        impl #client {
            pub fn new(http: reqwest::Client, endpoint: impl Into<String> #options_param) -> Self {
                Self {
                    http,
                    endpoint: endpoint.into(),
                    #options_init
                }
            }

            async fn execute<T: DeserializeOwned>(
                &self,
                document: &str,
                field: &str,
                variables: Value,
            ) -> Result<T, BoxError> {
                let body = serde_json::json!({ "query": document, "variables": variables });
                let mut request = self.http.post(&self.endpoint).json(&body);
                #headers
                let response: Value = request.send().await?.error_for_status()?.json().await?;
                if let Some(errors) = response.get("errors") {
                    return Err(errors.to_string().into());
                }
                let data = response
                    .get("data")
                    .and_then(|data| data.get(field))
                    .cloned()
                    .unwrap_or(Value::Null);
                Ok(serde_json::from_value(data)?)
            }

            #(#methods)*
        }
    }
    .to_string())
}

fn utils(_value: &Value) -> Result<String, GeneratorError> {
    Ok(quote! {
        #![doc = #HEADER]

        use std::future::Future;
        use std::time::Duration;

        type BoxError = Box<dyn std::error::Error + Send + Sync>;

        /// Request options shared by every operation client
        #[derive(Debug, Clone)]
        pub struct ClientOptions {
            /// Request timeout
            pub timeout: Option<Duration>,
            /// Retries after the first failed attempt
            pub max_retries: u32,
            /// Base delay between retries, doubled per attempt
            pub retry_delay: Duration,
            /// Extra request headers
            pub headers: Vec<(String, String)>,
        }

        impl Default for ClientOptions {
            fn default() -> Self {
                Self {
                    timeout: None,
                    max_retries: 3,
                    retry_delay: Duration::from_millis(1000),
                    headers: Vec::new(),
                }
            }
        }

        /// Retry `request` with exponential back-off
        pub async fn with_retry<T, F, Fut>(mut request: F, options: &ClientOptions) -> Result<T, BoxError>
        where
            F: FnMut() -> Fut,
            Fut: Future<Output = Result<T, BoxError>>,
        {
            let mut attempt = 0;
            loop {
                match request().await {
                    Ok(value) => return Ok(value),
                    Err(err) if attempt >= options.max_retries => return Err(err),
                    Err(_) => {
                        tokio::time::sleep(options.retry_delay * 2u32.pow(attempt)).await;
                        attempt += 1;
                    }
                }
            }
        }

        /// Fail `request` if it does not finish within `timeout`
        pub async fn with_timeout<T, Fut>(request: Fut, timeout: Option<Duration>) -> Result<T, BoxError>
        where
            Fut: Future<Output = Result<T, BoxError>>,
        {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, request)
                    .await
                    .map_err(|_| BoxError::from("request timed out"))?,
                None => request.await,
            }
        }
    }
    .to_string())
}

fn client(value: &Value) -> Result<String, GeneratorError> {
    let ctx: ClientContext = context("client", value)?;
    let client_name = ident("client", &ctx.client_name)?;

    let mut uses = Vec::new();
    let mut fields = Vec::new();
    let mut inits = Vec::new();
    let with_utils = ctx.utils_module.is_some();

    for member in &ctx.members {
        let path = parse_path("client", &member.module)?;
        let ty = ident("client", &member.client)?;
        let (field, _) = field_ident("client", &member.field)?;

        uses.push(quote! { use #path::#ty; });
        fields.push(quote! { pub #field: #ty, });
        inits.push(if with_utils {
            quote! { #field: #ty::new(http.clone(), endpoint.clone(), options.clone()), }
        } else {
            quote! { #field: #ty::new(http.clone(), endpoint.clone()), }
        });
    }

    let (utils_use, options_param) = match &ctx.utils_module {
        Some(module) => {
            let path = parse_path("client", module)?;
            (
                quote! { use #path::ClientOptions; },
                quote! { , options: ClientOptions },
            )
        }
        None => Default::default(),
    };

    Ok(quote! {
        #![doc = #HEADER]

        #(#uses)*
        #utils_use

        /// Entry point bundling every operation client
        #[derive(Debug, Clone)]
        pub struct #client_name {
            #(#fields)*
        }

        impl #client_name {
            pub fn new(endpoint: impl Into<String> #options_param) -> Self {
                let endpoint: String = endpoint.into();
                let http = reqwest::Client::new();
                Self {
                    #(#inits)*
                }
            }
        }
    }
    .to_string())
}

fn module_manifest(value: &Value) -> Result<String, GeneratorError> {
    let ctx: ModulesContext = context("module-manifest", value)?;
    let modules = ctx
        .modules
        .iter()
        .map(|m| ident("module-manifest", m))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quote! {
        #![doc = #HEADER]

        #(pub mod #modules;)*
    }
    .to_string())
}
