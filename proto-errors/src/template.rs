//! Message templates
//!
//! A template is plain text with `{{name}}` placeholders, where `name` is one
//! or more ASCII letters, digits or underscores. Anything that does not match
//! that shape (unterminated braces, empty names, nested braces) is literal
//! text.
//!
//! Parsing produces a list of [`TemplatePart`]s. [`TemplateCache`] keeps the
//! parsed form per template string so repeated formatting is a single pass
//! over the parts.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{BuildHasher, Hash};
use std::sync::{Arc, PoisonError, RwLock};

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";

/// One segment of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePart {
    /// Literal text preceding the placeholder
    pub literal: String,

    /// Placeholder name; `None` for the trailing literal
    pub placeholder: Option<String>,
}

/// Source of placeholder values
pub trait TemplateValues {
    /// Value for the placeholder `name`, if one is provided
    fn value(&self, name: &str) -> Option<&str>;
}

/// Empty value set, for templates without placeholders
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValues;

impl TemplateValues for NoValues {
    fn value(&self, _name: &str) -> Option<&str> {
        None
    }
}

impl<T: TemplateValues + ?Sized> TemplateValues for &T {
    fn value(&self, name: &str) -> Option<&str> {
        (**self).value(name)
    }
}

impl<K, V, S> TemplateValues for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<K, V> TemplateValues for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> TemplateValues for [(K, V)] {
    fn value(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> TemplateValues for [(K, V); N] {
    fn value(&self, name: &str) -> Option<&str> {
        self.as_slice().value(name)
    }
}

/// Error returned by [`validate`] when placeholders have no value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("template {template:?} missing fields: {}", .missing.join(", "))]
pub struct MissingFieldsError {
    /// The template that was validated
    pub template: String,

    /// Every missing placeholder name, sorted
    pub missing: Vec<String>,
}

/// Split a template into literal and placeholder segments
pub fn parse(template: &str) -> Vec<TemplatePart> {
    let bytes = template.as_bytes();
    let mut parts = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if let Some(end) = placeholder_end(bytes, pos) {
            parts.push(TemplatePart {
                literal: template[literal_start..pos].to_string(),
                placeholder: Some(template[pos + OPEN.len()..end - CLOSE.len()].to_string()),
            });
            pos = end;
            literal_start = end;
        } else {
            pos += 1;
        }
    }

    if literal_start < bytes.len() || parts.is_empty() {
        parts.push(TemplatePart {
            literal: template[literal_start..].to_string(),
            placeholder: None,
        });
    }

    parts
}

/// If a placeholder starts at `start`, return the index just past its `}}`
fn placeholder_end(bytes: &[u8], start: usize) -> Option<usize> {
    if !bytes[start..].starts_with(OPEN) {
        return None;
    }

    let name_start = start + OPEN.len();
    let name_len = bytes[name_start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    if name_len == 0 {
        return None;
    }

    let name_end = name_start + name_len;
    bytes[name_end..]
        .starts_with(CLOSE)
        .then_some(name_end + CLOSE.len())
}

/// Unique placeholder names in `template`, sorted
pub fn fields(template: &str) -> Vec<String> {
    parse(template)
        .into_iter()
        .filter_map(|part| part.placeholder)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Check that every placeholder in `template` has a value in `data`
pub fn validate(template: &str, data: &impl TemplateValues) -> Result<(), MissingFieldsError> {
    let missing: Vec<String> = fields(template)
        .into_iter()
        .filter(|field| data.value(field).is_none())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingFieldsError {
            template: template.to_string(),
            missing,
        })
    }
}

/// Substitute placeholders without going through a cache
///
/// Placeholders with no value in `data` are kept verbatim, braces included.
pub fn format(template: &str, data: &impl TemplateValues) -> String {
    render(template.len(), &parse(template), data)
}

fn render(capacity: usize, parts: &[TemplatePart], data: &impl TemplateValues) -> String {
    let mut out = String::with_capacity(capacity);
    for part in parts {
        out.push_str(&part.literal);
        if let Some(name) = &part.placeholder {
            match data.value(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push_str("{{");
                    out.push_str(name);
                    out.push_str("}}");
                }
            }
        }
    }
    out
}

/// Parsed templates keyed by template string
///
/// Safe to share between threads. Two threads parsing the same template at
/// once both store equal results; readers only ever see complete parses.
#[derive(Debug, Default)]
pub struct TemplateCache {
    parts: RwLock<HashMap<String, Arc<[TemplatePart]>>>,
}

impl TemplateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed parts of `template`, parsing and caching on first use
    pub fn parts(&self, template: &str) -> Arc<[TemplatePart]> {
        if let Some(parts) = self
            .parts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(template)
        {
            return Arc::clone(parts);
        }

        let parsed: Arc<[TemplatePart]> = parse(template).into();
        let mut cache = self.parts.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(template.to_string()).or_insert(parsed))
    }

    /// Substitute placeholders using the cached parse of `template`
    pub fn format(&self, template: &str, data: &impl TemplateValues) -> String {
        render(template.len(), &self.parts(template), data)
    }

    /// Number of distinct templates parsed so far
    pub fn len(&self) -> usize {
        self.parts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no template has been parsed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
