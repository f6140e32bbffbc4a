//! The remote section store abstraction.

use crate::error::SyncResult;
use async_trait::async_trait;
use lander_types::{
    Collection, OrderUpdate, SectionId, SectionPayload, SectionRecord, SectionType,
};

/// Remote persistence for sections.
///
/// Every write returns the authoritative record so callers can replace their
/// local copy with what the store actually holds.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Lists sections, optionally filtered by type.
    async fn list_sections(
        &self,
        section_type: Option<SectionType>,
    ) -> SyncResult<Vec<SectionRecord>>;

    /// Creates a section; the store assigns the id.
    async fn create_section(&self, payload: SectionPayload) -> SyncResult<SectionRecord>;

    /// Replaces a section's stored fields.
    async fn update_section(
        &self,
        id: &SectionId,
        payload: SectionPayload,
    ) -> SyncResult<SectionRecord>;

    async fn delete_section(&self, id: &SectionId) -> SyncResult<()>;

    /// Marks a section published. For hero sections the store also demotes
    /// any other published hero to draft.
    async fn publish_section(&self, id: &SectionId) -> SyncResult<SectionRecord>;

    async fn unpublish_section(&self, id: &SectionId) -> SyncResult<SectionRecord>;

    /// Applies several display-order assignments as one batch.
    async fn reorder_sections(&self, updates: Vec<OrderUpdate>) -> SyncResult<()>;

    /// Lists product collections a product grid can reference.
    async fn list_collections(&self) -> SyncResult<Vec<Collection>>;
}
