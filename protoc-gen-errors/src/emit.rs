//! Rust code generation for error definitions
//!
//! Each proto file that declares errors becomes one Rust file holding the
//! code constants, a `definitions()` table, `register()`, and one
//! constructor and one matcher per code.

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::extract::FileErrors;
use crate::mangle::{
    Namespace, const_ident, constructor_ident, field_ident, mangle, matcher_ident, type_ident,
};
use proc_macro2::{Ident, TokenStream};
use prost_types::compiler::code_generator_response::File;
use proto_errors::{ErrorDefinition, template};
use quote::quote;

/// Functions every generated file defines itself
const RESERVED_FNS: [&str; 2] = ["definitions", "register"];

/// Generate the Rust file for `errors`
///
/// Returns None if the file declares no errors
pub fn generate(
    errors: &FileErrors,
    config: &GeneratorConfig,
) -> Result<Option<File>, GeneratorError> {
    if errors.is_empty() {
        return Ok(None);
    }

    let runtime: syn::Path = syn::parse_str(&config.runtime_path).map_err(|e| {
        GeneratorError::Config(format!("runtime={:?} is not a Rust path: {e}", config.runtime_path))
    })?;

    let definitions: Vec<&ErrorDefinition> = errors.definitions().collect();
    let tokens = generate_tokens(&errors.file, &definitions, &runtime)?;
    let code = format_code(tokens)?;

    let content = format!(
        "// @generated by protoc-gen-errors from {}. Do not edit.\n\n{code}",
        errors.file
    );

    Ok(Some(File {
        name: Some(output_path(&errors.file, &config.file_suffix)),
        content: Some(content),
        ..Default::default()
    }))
}

/// `user/v1/user.proto` with suffix `_errors.rs` → `user/v1/user_errors.rs`
pub fn output_path(proto_path: &str, suffix: &str) -> String {
    let stem = proto_path.strip_suffix(".proto").unwrap_or(proto_path);
    format!("{stem}{suffix}")
}

/// Identifiers generated for one code
#[derive(Debug)]
struct ErrorNames {
    constant: Ident,
    constructor: Ident,
    matcher: Ident,
    params: Option<ParamsNames>,
}

#[derive(Debug)]
struct ParamsNames {
    ty: Ident,
    /// (placeholder, field), sorted by placeholder
    fields: Vec<(String, Ident)>,
}

/// Assign identifiers in definition order so renames are deterministic
fn assign_names(definitions: &[&ErrorDefinition]) -> Result<Vec<ErrorNames>, GeneratorError> {
    let mut bases = Namespace::new();
    let mut types = Namespace::new();
    let mut constants = Namespace::new();
    let mut fns = Namespace::with_reserved(RESERVED_FNS);

    definitions
        .iter()
        .map(|definition| {
            let mangled = mangle(&definition.code);
            if mangled.is_empty() {
                return Err(GeneratorError::CodeGenError(format!(
                    "error code {:?} has no identifier characters",
                    definition.code
                )));
            }
            let base = bases.claim(&mangled, "");

            let placeholders = template::fields(&definition.message_template);
            let params = if placeholders.is_empty() {
                None
            } else {
                let ty = types.claim(&format!("{}Params", type_ident(&base)), "");
                let mut field_names = Namespace::new();
                let fields = placeholders
                    .into_iter()
                    .map(|placeholder| {
                        let field = field_names.claim(&field_ident(&placeholder), "_");
                        Ok((placeholder, ident(&field)?))
                    })
                    .collect::<Result<Vec<_>, GeneratorError>>()?;
                Some(ParamsNames {
                    ty: ident(&ty)?,
                    fields,
                })
            };

            Ok(ErrorNames {
                constant: ident(&constants.claim(&const_ident(&base), "_"))?,
                constructor: ident(&fns.claim(&constructor_ident(&base), "_"))?,
                matcher: ident(&fns.claim(&matcher_ident(&base), "_"))?,
                params,
            })
        })
        .collect()
}

fn ident(name: &str) -> Result<Ident, GeneratorError> {
    syn::parse_str::<Ident>(name)
        .map_err(|e| GeneratorError::CodeGenError(format!("invalid identifier {name:?}: {e}")))
}

/// Generate the TokenStream for one proto file
fn generate_tokens(
    proto_file: &str,
    definitions: &[&ErrorDefinition],
    runtime: &syn::Path,
) -> Result<TokenStream, GeneratorError> {
    let names = assign_names(definitions)?;

    let mut constants = Vec::new();
    let mut entries = Vec::new();
    let mut functions = Vec::new();

    for (definition, names) in definitions.iter().zip(&names) {
        let code = &definition.code;
        let template = &definition.message_template;
        let retryable = definition.retryable;
        let status = ident(definition.status.variant_name())?;
        let constant = &names.constant;

        let doc = if template.is_empty() {
            format!(" `{code}` ({})", definition.status)
        } else {
            format!(" `{code}` ({}): {template}", definition.status)
        };
        constants.push(quote! {
            #[doc = #doc]
            pub const #constant: #runtime::ErrorCode = #runtime::ErrorCode::new(#code);
        });

        entries.push(quote! {
            #runtime::ErrorDefinition::new(
                #constant.as_str(),
                #template,
                #runtime::StatusClass::#status,
                #retryable,
            )
        });

        functions.push(constructor_tokens(code, constant, &names.constructor, names.params.as_ref(), runtime));

        let matcher = &names.matcher;
        let matcher_doc = format!(" Whether `status` carries `{code}`");
        functions.push(quote! {
            #[doc = #matcher_doc]
            pub fn #matcher(kit: &#runtime::ErrorKit, status: &#runtime::tonic::Status) -> bool {
                kit.is(status, &#constant)
            }
        });
    }

    let definitions_doc = format!(" Error definitions declared in `{proto_file}`");

    Ok(quote! {
        #(#constants)*

        #[doc = #definitions_doc]
        pub fn definitions() -> ::std::vec::Vec<#runtime::ErrorDefinition> {
            ::std::vec![#(#entries),*]
        }

        /// Register every definition of this file
        pub fn register(registry: &#runtime::Registry) {
            registry.register_all(definitions());
        }

        #(#functions)*
    })
}

/// Constructor, plus the params struct when the template has placeholders
fn constructor_tokens(
    code: &str,
    constant: &Ident,
    constructor: &Ident,
    params: Option<&ParamsNames>,
    runtime: &syn::Path,
) -> TokenStream {
    let doc = format!(" Build a `{code}` status");

    let Some(params) = params else {
        return quote! {
            #[doc = #doc]
            pub fn #constructor(kit: &#runtime::ErrorKit) -> #runtime::tonic::Status {
                kit.new_error(&#constant, &#runtime::NoValues)
            }
        };
    };

    let ty = &params.ty;
    let placeholders: Vec<&String> = params.fields.iter().map(|(p, _)| p).collect();
    let fields: Vec<&Ident> = params.fields.iter().map(|(_, f)| f).collect();
    let field_docs: Vec<String> = placeholders
        .iter()
        .map(|p| format!(" Value for `{{{{{p}}}}}`"))
        .collect();
    let struct_doc = format!(" Message values for `{code}`");

    quote! {
        #[doc = #struct_doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct #ty {
            #(
                #[doc = #field_docs]
                pub #fields: ::std::string::String,
            )*
        }

        impl #runtime::TemplateValues for #ty {
            fn value(&self, name: &str) -> ::std::option::Option<&str> {
                match name {
                    #(#placeholders => ::std::option::Option::Some(self.#fields.as_str()),)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        #[doc = #doc]
        pub fn #constructor(kit: &#runtime::ErrorKit, params: &#ty) -> #runtime::tonic::Status {
            kit.new_error(&#constant, params)
        }
    }
}

/// Format the generated code using prettyplease
fn format_code(tokens: TokenStream) -> Result<String, GeneratorError> {
    let code = tokens.to_string();
    let parsed = syn::parse_file(&code).map_err(|e| {
        GeneratorError::CodeGenError(format!("Failed to parse generated code: {}", e))
    })?;
    Ok(prettyplease::unparse(&parsed))
}
