//! Remote store boundary for lander.
//!
//! ## Components
//!
//! - **Store**: [`SectionStore`], the async collaborator every write goes through
//! - **Coordinator**: [`SyncCoordinator`], which owns the store and the
//!   non-waiting action lock that serializes mutations
//! - **Staging**: [`Staged`], a confirmed value plus one optimistic edit
//! - **Adapters**: [`rest::RestSectionStore`] over HTTP and
//!   [`mock::MemorySectionStore`] in memory
//!
//! Config payloads cross this boundary as transport strings inside
//! [`SectionPayload`](lander_types::SectionPayload). Nothing here decodes them.

mod coordinator;
mod error;
pub mod mock;
pub mod rest;
mod staging;
mod store;

pub use coordinator::{ActionGuard, SyncCoordinator};
pub use error::{SyncError, SyncResult};
pub use staging::Staged;
pub use store::SectionStore;
