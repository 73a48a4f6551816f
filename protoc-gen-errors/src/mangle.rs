//! Identifier mangling
//!
//! Error codes and placeholder names become Rust identifiers:
//!
//! | input                  | `mangle`       | const            | fn               |
//! |------------------------|----------------|------------------|------------------|
//! | `ERROR_USER_NOT_FOUND` | `UserNotFound` | `USER_NOT_FOUND` | `user_not_found` |
//! | `ERROR_OUT_OF_STOCK`   | `OutOfStock`   | `OUT_OF_STOCK`   | `out_of_stock`   |
//!
//! Words are split on underscores and case boundaries, so normalizing an
//! already mangled name is a no-op.

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Prefix stripped from error codes
pub const CODE_PREFIX: &str = "ERROR_";

/// Strict, reserved and edition-dependent keywords
static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
        "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box",
        "do", "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
        "yield",
    ]
    .into_iter()
    .collect()
});

/// UpperCamel name of an error code, with `ERROR_` stripped
pub fn mangle(code: &str) -> String {
    let stripped = code
        .strip_prefix(CODE_PREFIX)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(code);
    camel(stripped)
}

/// UpperCamel name of a placeholder
pub fn mangle_field(name: &str) -> String {
    camel(name)
}

fn camel(s: &str) -> String {
    let camel = s.to_upper_camel_case();
    if camel.starts_with(|c: char| c.is_ascii_digit()) {
        format!("E{camel}")
    } else {
        camel
    }
}

/// Whether `ident` is a Rust keyword
pub fn is_keyword(ident: &str) -> bool {
    KEYWORDS.contains(ident)
}

fn escape(ident: String) -> String {
    if is_keyword(&ident) {
        ident + "_"
    } else {
        ident
    }
}

/// Constant name for a mangled code
pub fn const_ident(mangled: &str) -> String {
    escape(mangled.to_shouty_snake_case())
}

/// Function name for a mangled code
pub fn fn_ident(mangled: &str) -> String {
    escape(mangled.to_snake_case())
}

/// Constructor function name for a mangled code
///
/// The `is_` prefix belongs to matchers, so a constructor that would start
/// with it gets `new_` in front: `ERROR_IS_TYPE` builds with `new_is_type`.
pub fn constructor_ident(mangled: &str) -> String {
    let name = fn_ident(mangled);
    if name.starts_with("is_") {
        format!("new_{name}")
    } else {
        name
    }
}

/// Matcher function name for a mangled code
pub fn matcher_ident(mangled: &str) -> String {
    format!("is_{}", mangled.to_snake_case())
}

/// Type name for a mangled code
pub fn type_ident(mangled: &str) -> String {
    escape(mangled.to_upper_camel_case())
}

/// Struct field name for a placeholder
pub fn field_ident(placeholder: &str) -> String {
    escape(mangle_field(placeholder).to_snake_case())
}

/// Names already handed out in one namespace of a generated file
///
/// A name that is taken gets a numeric suffix, starting at 2.
#[derive(Debug, Default)]
pub struct Namespace {
    used: HashSet<String>,
}

impl Namespace {
    /// Empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace with `names` already taken
    pub fn with_reserved<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            used: names.into_iter().map(str::to_string).collect(),
        }
    }

    /// Claim `base`, or the first free `base2`, `base3`, ...
    ///
    /// `separator` goes between the base and the number; snake_case names
    /// use `_` so `user` becomes `user_2`.
    pub fn claim(&mut self, base: &str, separator: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}{separator}{n}");
            if self.used.insert(candidate.clone()) {
                tracing::warn!(name = base, renamed = %candidate, "identifier collision");
                return candidate;
            }
            n += 1;
        }
    }
}
