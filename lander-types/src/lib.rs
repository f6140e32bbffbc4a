//! Core type definitions for lander.
//!
//! This crate defines the fundamental types shared by every other lander crate:
//! - Section and embedded-item identifiers
//! - Section type and publication status
//! - Wire records exchanged with the remote section store
//! - The field-keyed error map used by local and server validation
//!
//! Config payloads cross this layer undecoded (`serde_json::Value` inbound,
//! transport string outbound). Decoding them is the model crate's job.

mod errors;
mod ids;
mod section;

pub use errors::{ErrorCode, FieldError, FieldErrors};
pub use ids::{ItemId, SectionId};
pub use section::{
    Collection, OrderUpdate, SectionPayload, SectionRecord, SectionStatus, SectionType,
};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown section type: {0}")]
    UnknownSectionType(String),

    #[error("unknown section status: {0}")]
    UnknownStatus(String),
}
