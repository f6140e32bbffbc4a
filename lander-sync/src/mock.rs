//! An in-memory section store for testing.

use crate::error::{SyncError, SyncResult};
use crate::store::SectionStore;
use async_trait::async_trait;
use lander_types::{
    Collection, OrderUpdate, SectionId, SectionPayload, SectionRecord, SectionStatus, SectionType,
};
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// One call received by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List(Option<SectionType>),
    Create(SectionType),
    Update(SectionId),
    Delete(SectionId),
    Publish(SectionId),
    Unpublish(SectionId),
    Reorder(Vec<OrderUpdate>),
    ListCollections,
}

#[derive(Debug, Default)]
struct State {
    sections: Vec<SectionRecord>,
    collections: Vec<Collection>,
    next_id: u64,
    failures: VecDeque<SyncError>,
    partial_publish: bool,
    calls: Vec<StoreCall>,
}

impl State {
    fn record(&mut self, call: StoreCall) -> SyncResult<()> {
        self.calls.push(call);
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn find_mut(&mut self, id: &SectionId) -> SyncResult<&mut SectionRecord> {
        self.sections
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| SyncError::NotFound(id.to_string()))
    }
}

/// Holds sections in memory and behaves like the remote store, including
/// the hero publish side effect.
///
/// Failures can be queued with [`fail_next`](Self::fail_next); each queued
/// error is returned by the next call (of any kind) instead of applying it.
#[derive(Debug, Default)]
pub struct MemorySectionStore {
    state: Mutex<State>,
}

impl MemorySectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records. Ids continue after the
    /// highest numeric id present.
    pub fn with_sections(sections: Vec<SectionRecord>) -> Self {
        let next_id = sections
            .iter()
            .filter_map(|s| s.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            state: Mutex::new(State {
                sections,
                next_id,
                ..State::default()
            }),
        }
    }

    pub async fn set_collections(&self, collections: Vec<Collection>) {
        self.state.lock().await.collections = collections;
    }

    /// Queues an error for the next call.
    pub async fn fail_next(&self, err: SyncError) {
        self.state.lock().await.failures.push_back(err);
    }

    /// Makes the next hero publish demote its siblings and then fail
    /// before publishing the target.
    pub async fn fail_next_publish_partially(&self) {
        self.state.lock().await.partial_publish = true;
    }

    /// Snapshot of stored records.
    pub async fn records(&self) -> Vec<SectionRecord> {
        self.state.lock().await.sections.clone()
    }

    pub async fn record(&self, id: &SectionId) -> Option<SectionRecord> {
        self.state
            .lock()
            .await
            .sections
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of calls that would have mutated remote state.
    pub async fn write_count(&self) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| !matches!(c, StoreCall::List(_) | StoreCall::ListCollections))
            .count()
    }
}

fn apply_payload(record: &mut SectionRecord, payload: SectionPayload) {
    record.section_type = payload.section_type;
    record.title = payload.title;
    record.description = payload.description;
    record.display_order = payload.display_order;
    record.is_active = payload.is_active;
    record.status = payload.status;
    record.source_type = payload.source_type;
    record.source_value = payload.source_value;
    record.product_count = payload.product_count;
    // Structured on the way out, like the real store.
    record.config = serde_json::from_str(&payload.config)
        .unwrap_or(serde_json::Value::String(payload.config));
}

#[async_trait]
impl SectionStore for MemorySectionStore {
    async fn list_sections(
        &self,
        section_type: Option<SectionType>,
    ) -> SyncResult<Vec<SectionRecord>> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::List(section_type))?;
        Ok(state
            .sections
            .iter()
            .filter(|s| section_type.is_none_or(|t| s.section_type == t))
            .cloned()
            .collect())
    }

    async fn create_section(&self, payload: SectionPayload) -> SyncResult<SectionRecord> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Create(payload.section_type))?;
        state.next_id += 1;
        let mut record = SectionRecord {
            id: SectionId::new(state.next_id.to_string()),
            section_type: payload.section_type,
            title: String::new(),
            description: String::new(),
            display_order: 0,
            is_active: true,
            status: SectionStatus::Draft,
            source_type: None,
            source_value: None,
            product_count: None,
            config: serde_json::Value::Null,
            created_at: None,
            updated_at: None,
        };
        apply_payload(&mut record, payload);
        state.sections.push(record.clone());
        Ok(record)
    }

    async fn update_section(
        &self,
        id: &SectionId,
        payload: SectionPayload,
    ) -> SyncResult<SectionRecord> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Update(id.clone()))?;
        let record = state.find_mut(id)?;
        apply_payload(record, payload);
        Ok(record.clone())
    }

    async fn delete_section(&self, id: &SectionId) -> SyncResult<()> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Delete(id.clone()))?;
        let before = state.sections.len();
        state.sections.retain(|s| &s.id != id);
        if state.sections.len() == before {
            return Err(SyncError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn publish_section(&self, id: &SectionId) -> SyncResult<SectionRecord> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Publish(id.clone()))?;
        let section_type = state.find_mut(id)?.section_type;
        if section_type == SectionType::Hero {
            for sibling in state
                .sections
                .iter_mut()
                .filter(|s| s.section_type == SectionType::Hero && &s.id != id)
            {
                sibling.status = SectionStatus::Draft;
            }
            if std::mem::take(&mut state.partial_publish) {
                return Err(SyncError::Http {
                    status: 502,
                    message: "publish interrupted".into(),
                });
            }
        }
        let record = state.find_mut(id)?;
        record.status = SectionStatus::Published;
        Ok(record.clone())
    }

    async fn unpublish_section(&self, id: &SectionId) -> SyncResult<SectionRecord> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Unpublish(id.clone()))?;
        let record = state.find_mut(id)?;
        record.status = SectionStatus::Draft;
        Ok(record.clone())
    }

    async fn reorder_sections(&self, updates: Vec<OrderUpdate>) -> SyncResult<()> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Reorder(updates.clone()))?;
        if let Some(missing) = updates
            .iter()
            .find(|u| !state.sections.iter().any(|s| s.id == u.id))
        {
            return Err(SyncError::NotFound(missing.id.to_string()));
        }
        for update in updates {
            state.find_mut(&update.id)?.display_order = update.display_order;
        }
        Ok(())
    }

    async fn list_collections(&self) -> SyncResult<Vec<Collection>> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::ListCollections)?;
        Ok(state.collections.clone())
    }
}
