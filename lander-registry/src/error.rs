//! Error types for registry operations.

use lander_model::CodecError;
use lander_ordering::OrderingError;
use lander_sync::SyncError;
use lander_types::{ErrorCode, FieldErrors, ItemId, SectionId, SectionType};
use lander_validation::fields;
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced by [`SectionRegistry`](crate::SectionRegistry) and
/// [`EmbeddedCollectionManager`](crate::EmbeddedCollectionManager).
///
/// None of these leave local state half-applied.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Local pre-flight validation failed; nothing was sent.
    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),

    /// The store rejected the write with field errors.
    #[error("rejected by store: {0}")]
    ServerValidationFailed(FieldErrors),

    /// A second faq/testimonials section, or deleting one.
    #[error("{0} is a singleton section")]
    SingletonViolation(SectionType),

    #[error("duplicate order: {0}")]
    DuplicateOrder(FieldErrors),

    #[error("duplicate title: {0}")]
    DuplicateTitle(FieldErrors),

    #[error("collection already in use: {0}")]
    DuplicateCollectionReference(FieldErrors),

    #[error("section not found: {0}")]
    NotFound(SectionId),

    #[error("{label} not found: {id}")]
    ItemNotFound { label: &'static str, id: ItemId },

    /// The section's item list changed since this manager read it.
    #[error("section {0} changed since it was read; refresh and retry")]
    Stale(SectionId),

    /// Another mutation holds the action lock.
    #[error("another action is in progress")]
    Busy,

    #[error("network error: {0}")]
    TransientNetwork(String),

    #[error("remote error: {0}")]
    Remote(SyncError),

    #[error(transparent)]
    Ordering(#[from] OrderingError),
}

impl RegistryError {
    /// Classifies a non-empty local error map.
    ///
    /// A duplicate collection reference wins over a duplicate order, which
    /// wins over a duplicate title. Anything else is `ValidationFailed`.
    pub fn from_validation(errors: FieldErrors) -> Self {
        if errors.has_code(fields::SOURCE_VALUE, ErrorCode::Duplicate) {
            return Self::DuplicateCollectionReference(errors);
        }
        let order_clash = errors.fields().any(|(field, errs)| {
            (field == fields::DISPLAY_ORDER
                || field == fields::ORDER
                || field.ends_with(".order"))
                && errs.iter().any(|e| e.code == ErrorCode::Duplicate)
        });
        if order_clash {
            return Self::DuplicateOrder(errors);
        }
        if errors.has_code(fields::TITLE, ErrorCode::Duplicate) {
            return Self::DuplicateTitle(errors);
        }
        Self::ValidationFailed(errors)
    }

    /// Maps a store error for an operation addressed to `id`.
    pub(crate) fn remote(err: SyncError, id: &SectionId) -> Self {
        match err {
            SyncError::NotFound(_) => Self::NotFound(id.clone()),
            other => other.into(),
        }
    }

    /// Maps a store error for a batch addressed to `ids`. A missing record
    /// is reported against the id the store names, or the first in the batch.
    pub(crate) fn remote_batch<'a>(
        err: SyncError,
        ids: impl IntoIterator<Item = &'a SectionId>,
    ) -> Self {
        match err {
            SyncError::NotFound(missing) => {
                let mut ids = ids.into_iter().peekable();
                let first = ids.peek().cloned().cloned();
                let id = ids
                    .find(|id| id.as_str() == missing)
                    .cloned()
                    .or(first)
                    .unwrap_or_else(|| SectionId::new(missing));
                Self::NotFound(id)
            }
            other => other.into(),
        }
    }

    /// The field error map, for variants that carry one.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::ValidationFailed(e)
            | Self::ServerValidationFailed(e)
            | Self::DuplicateOrder(e)
            | Self::DuplicateTitle(e)
            | Self::DuplicateCollectionReference(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the same call may succeed if retried unchanged.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Busy | Self::TransientNetwork(_) => true,
            Self::Remote(e) => e.is_transient(),
            _ => false,
        }
    }
}

/// Store errors for calls that address no section. Section-addressed calls
/// go through `remote`/`remote_batch` so a missing record is `NotFound`.
impl From<SyncError> for RegistryError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Busy => Self::Busy,
            SyncError::Network(msg) => Self::TransientNetwork(msg),
            SyncError::Validation { message, mut errors } => {
                if errors.message().is_none() {
                    errors.set_message(message);
                }
                Self::ServerValidationFailed(errors)
            }
            other => Self::Remote(other),
        }
    }
}

impl From<CodecError> for RegistryError {
    fn from(err: CodecError) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(fields::CONFIG, ErrorCode::Invalid, err.to_string());
        Self::ValidationFailed(errors)
    }
}
