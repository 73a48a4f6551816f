//! Status construction
//!
//! [`ErrorKit`] ties the registry, the template cache and the metadata
//! header names together. Generated constructors and matchers take a
//! `&ErrorKit`.

use crate::code::{CodedError, HasCode};
use crate::error::Error;
use crate::registry::{ErrorDefinition, Registry};
use crate::status::StatusClass;
use crate::template::{self, TemplateCache, TemplateValues};
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tonic::Status;
use tonic::metadata::{AsciiMetadataKey, MetadataMap, MetadataValue};

/// Default header carrying the error code
pub const DEFAULT_ERROR_CODE_HEADER: &str = "x-error-code";

/// Default header carrying the retryable flag
pub const DEFAULT_RETRYABLE_HEADER: &str = "x-retryable";

/// Names of the metadata headers attached to constructed statuses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderKeys {
    /// Header carrying the error code
    pub error_code: AsciiMetadataKey,

    /// Header carrying `"true"` or `"false"`
    pub retryable: AsciiMetadataKey,
}

impl Default for HeaderKeys {
    fn default() -> Self {
        Self {
            error_code: AsciiMetadataKey::from_static(DEFAULT_ERROR_CODE_HEADER),
            retryable: AsciiMetadataKey::from_static(DEFAULT_RETRYABLE_HEADER),
        }
    }
}

/// Registry, template cache and header configuration for one process
#[derive(Debug, Default)]
pub struct ErrorKit {
    registry: Registry,
    templates: TemplateCache,
    headers: RwLock<HeaderKeys>,
}

impl ErrorKit {
    /// Kit over a registry seeded with the built-in codes
    pub fn new() -> Self {
        Self::default()
    }

    /// Kit over an existing registry
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            templates: TemplateCache::new(),
            headers: RwLock::new(HeaderKeys::default()),
        }
    }

    /// Registry the kit resolves codes against
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parsed templates of every message built so far
    pub fn templates(&self) -> &TemplateCache {
        &self.templates
    }

    /// Current header names
    pub fn header_keys(&self) -> HeaderKeys {
        self.headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rename the metadata headers; `None` keeps the current name
    pub fn set_header_keys(
        &self,
        error_code: Option<&str>,
        retryable: Option<&str>,
    ) -> Result<(), Error> {
        let error_code = error_code.map(parse_header_key).transpose()?;
        let retryable = retryable.map(parse_header_key).transpose()?;

        let mut headers = self.headers.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(key) = error_code {
            headers.error_code = key;
        }
        if let Some(key) = retryable {
            headers.retryable = key;
        }
        Ok(())
    }

    /// Status for `code`, with its registered template filled from `data`
    ///
    /// An unregistered code yields an `Internal` status naming the code.
    pub fn new_error(
        &self,
        code: &(impl HasCode + ?Sized),
        data: &impl TemplateValues,
    ) -> Status {
        match self.registry.lookup(code) {
            Some(definition) => {
                let message = self.templates.format(&definition.message_template, data);
                self.build(&definition, CodedError::new(&definition.code, message))
            }
            None => unknown_code(code.code(), None),
        }
    }

    /// Like [`ErrorKit::new_error`], but fails when `data` misses a placeholder
    pub fn try_new_error(
        &self,
        code: &(impl HasCode + ?Sized),
        data: &impl TemplateValues,
    ) -> Result<Status, Error> {
        if let Some(definition) = self.registry.lookup(code) {
            template::validate(&definition.message_template, data)?;
        }
        Ok(self.new_error(code, data))
    }

    /// Status for `code` using `message_template` instead of the registered one
    pub fn new_with_message(
        &self,
        code: &(impl HasCode + ?Sized),
        message_template: &str,
        data: &impl TemplateValues,
    ) -> Status {
        match self.registry.lookup(code) {
            Some(definition) => {
                let message = self.templates.format(message_template, data);
                self.build(&definition, CodedError::new(&definition.code, message))
            }
            None => unknown_code(code.code(), None),
        }
    }

    /// Status for `code` with a preformatted message
    ///
    /// ```
    /// # use proto_errors::{ErrorKit, builtin};
    /// let kit = ErrorKit::new();
    /// let status = kit.newf(&builtin::NOT_FOUND, format_args!("user {} gone", "alice"));
    /// assert_eq!(status.message(), "user alice gone");
    /// ```
    pub fn newf(&self, code: &(impl HasCode + ?Sized), args: fmt::Arguments<'_>) -> Status {
        match self.registry.lookup(code) {
            Some(definition) => {
                self.build(&definition, CodedError::new(&definition.code, args.to_string()))
            }
            None => unknown_code(code.code(), None),
        }
    }

    /// Status for `code` wrapping an underlying error
    ///
    /// The message is `<formatted template>: <err>` and `err` stays reachable
    /// through the status' source chain.
    pub fn wrap<E>(&self, code: &(impl HasCode + ?Sized), err: E, data: &impl TemplateValues) -> Status
    where
        E: StdError + Send + Sync + 'static,
    {
        match self.registry.lookup(code) {
            Some(definition) => {
                let formatted = self.templates.format(&definition.message_template, data);
                let message = format!("{formatted}: {err}");
                self.build(
                    &definition,
                    CodedError::new(&definition.code, message).with_source(err),
                )
            }
            None => {
                let cause: Arc<dyn StdError + Send + Sync + 'static> = Arc::new(err);
                unknown_code(code.code(), Some(cause))
            }
        }
    }

    /// Status of a given class, bypassing the registry
    pub fn from_code(status: StatusClass, message: impl Into<String>) -> Status {
        Status::new(status.into(), message)
    }

    /// Registered retry flag; `false` for unknown codes
    pub fn is_retryable(&self, code: &(impl HasCode + ?Sized)) -> bool {
        self.registry
            .lookup(code)
            .is_some_and(|definition| definition.retryable)
    }

    /// Registered status class; `Internal` for unknown codes
    pub fn status_class(&self, code: &(impl HasCode + ?Sized)) -> StatusClass {
        self.registry
            .lookup(code)
            .map_or(StatusClass::Internal, |definition| definition.status)
    }

    /// Error code carried in the status' metadata
    pub fn error_code(&self, status: &Status) -> Option<String> {
        let headers = self.header_keys();
        status
            .metadata()
            .get(headers.error_code.as_str())
            .and_then(|value| value.to_str().ok())
            .filter(|code| !code.is_empty())
            .map(str::to_string)
    }

    /// Registered definition for the code carried by `status`
    pub fn definition_for(&self, status: &Status) -> Option<Arc<ErrorDefinition>> {
        self.error_code(status)
            .and_then(|code| self.registry.lookup(code.as_str()))
    }

    /// Whether `status` carries `code`
    ///
    /// Checks the error-code header first, then a [`CodedError`] source for
    /// statuses that never crossed the wire.
    pub fn is(&self, status: &Status, code: &(impl HasCode + ?Sized)) -> bool {
        if let Some(carried) = self.error_code(status) {
            return carried == code.code();
        }
        coded_source(status).is_some_and(|coded| coded.code() == code.code())
    }

    /// Run `observer` on a failed result that carries a registered code
    ///
    /// The result is returned unchanged. Statuses without a code header, or
    /// with an unregistered code, are passed through without calling
    /// `observer`.
    pub fn observe<T, F>(&self, result: Result<T, Status>, observer: F) -> Result<T, Status>
    where
        F: FnOnce(&Status, &ErrorDefinition),
    {
        if let Err(status) = &result {
            if let Some(definition) = self.definition_for(status) {
                observer(status, &definition);
            }
        }
        result
    }

    fn build(&self, definition: &ErrorDefinition, coded: CodedError) -> Status {
        let headers = self.header_keys();
        let mut metadata = MetadataMap::new();
        match MetadataValue::try_from(definition.code.as_str()) {
            Ok(value) => {
                metadata.insert(headers.error_code, value);
            }
            Err(_) => {
                tracing::warn!(code = %definition.code, "error code is not a valid metadata value");
            }
        }
        let retryable = if definition.retryable { "true" } else { "false" };
        metadata.insert(headers.retryable, MetadataValue::from_static(retryable));

        let mut status = Status::with_metadata(
            definition.status.into(),
            coded.message().to_string(),
            metadata,
        );
        status.set_source(Arc::new(coded));
        status
    }
}

/// The [`CodedError`] a status was built from, if any
pub fn coded_source(status: &Status) -> Option<&CodedError> {
    status.source()?.downcast_ref::<CodedError>()
}

/// `Internal` fallback for a code missing from the registry
///
/// A wrapped `cause` is appended to the message and kept as the source.
fn unknown_code(code: &str, cause: Option<Arc<dyn StdError + Send + Sync + 'static>>) -> Status {
    tracing::warn!(code, "constructing error from unregistered code");
    let message = format!("unknown error code: {code}");
    match cause {
        Some(cause) => {
            let mut status = Status::internal(format!("{message}: {cause}"));
            status.set_source(cause);
            status
        }
        None => Status::internal(message),
    }
}

fn parse_header_key(key: &str) -> Result<AsciiMetadataKey, Error> {
    AsciiMetadataKey::from_bytes(key.as_bytes()).map_err(|_| Error::InvalidHeaderKey {
        key: key.to_string(),
    })
}
