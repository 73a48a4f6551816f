//! Error registry
//!
//! Maps error codes to their definitions. A service builds one [`Registry`]
//! at startup, registers the definitions of every generated error module into
//! it, and shares it (usually through [`crate::ErrorKit`]) with request
//! handlers.

use crate::builtin;
use crate::code::HasCode;
use crate::status::StatusClass;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A registered error
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorDefinition {
    /// Unique error code
    pub code: String,

    /// Message template with `{{name}}` placeholders
    pub message_template: String,

    /// Transport status class
    pub status: StatusClass,

    /// Whether clients may retry
    pub retryable: bool,
}

impl ErrorDefinition {
    /// Build a definition
    pub fn new(
        code: impl Into<String>,
        message_template: impl Into<String>,
        status: StatusClass,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.into(),
            message_template: message_template.into(),
            status,
            retryable,
        }
    }
}

impl HasCode for ErrorDefinition {
    fn code(&self) -> &str {
        &self.code
    }
}

/// Thread-safe map of error code to definition
///
/// Definitions are stored behind `Arc`s and replaced whole, so a lookup
/// racing with a registration sees either the old or the new definition.
#[derive(Debug)]
pub struct Registry {
    definitions: RwLock<HashMap<String, Arc<ErrorDefinition>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry seeded with the built-in codes
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register_all(builtin::definitions());
        registry
    }

    /// Registry without any definitions
    pub fn empty() -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a definition, replacing any previous one with the same code
    pub fn register(&self, definition: ErrorDefinition) {
        let definition = Arc::new(definition);
        self.definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(definition.code.clone(), definition);
    }

    /// Insert definitions in order; later entries win on duplicate codes
    pub fn register_all(&self, definitions: impl IntoIterator<Item = ErrorDefinition>) {
        let definitions: Vec<_> = definitions.into_iter().map(Arc::new).collect();
        let mut map = self
            .definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for definition in definitions {
            map.insert(definition.code.clone(), definition);
        }
    }

    /// Definition registered for `code`
    pub fn lookup(&self, code: &(impl HasCode + ?Sized)) -> Option<Arc<ErrorDefinition>> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code.code())
            .cloned()
    }

    /// Definition registered for `code`
    ///
    /// # Panics
    ///
    /// Panics if `code` is not registered. Only use this where the code is
    /// known to be registered, such as generated code looking up its own
    /// constants after `register` ran.
    pub fn must_lookup(&self, code: &(impl HasCode + ?Sized)) -> Arc<ErrorDefinition> {
        match self.lookup(code) {
            Some(definition) => definition,
            None => panic!("error code {:?} is not registered", code.code()),
        }
    }

    /// Whether `code` is registered
    pub fn contains(&self, code: &(impl HasCode + ?Sized)) -> bool {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(code.code())
    }

    /// All registered codes, sorted
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        codes.sort_unstable();
        codes
    }

    /// Number of registered codes
    pub fn len(&self) -> usize {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
