//! The authoritative in-memory view of the landing page.

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use lander_model::{NewSection, Section, SectionConfig, SectionPatch};
use lander_ordering::{OrderPool, OrderingError, Ordered};
use lander_sync::{ActionGuard, SectionStore, SyncCoordinator};
use lander_types::{
    Collection, ErrorCode, FieldErrors, OrderUpdate, SectionId, SectionStatus, SectionType,
};
use lander_validation::{
    fields, validate_config_items, validate_section, validate_section_fields,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Holds every section in scope and owns all mutations of them.
///
/// Each mutation takes the action lock, validates locally, writes to the
/// store and only then applies the store's answer to local state. A failed
/// call leaves local state as it was.
pub struct SectionRegistry {
    config: RegistryConfig,
    coordinator: SyncCoordinator,
    sections: RwLock<Vec<Section>>,
    collections: RwLock<Vec<Collection>>,
}

impl SectionRegistry {
    pub fn new(store: Arc<dyn SectionStore>, config: RegistryConfig) -> Self {
        Self::with_coordinator(SyncCoordinator::new(store), config)
    }

    /// Builds a registry sharing an existing coordinator (and its lock).
    pub fn with_coordinator(coordinator: SyncCoordinator, config: RegistryConfig) -> Self {
        Self {
            config,
            coordinator,
            sections: RwLock::new(Vec::new()),
            collections: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }

    /// Creates a registry and loads its initial state.
    pub async fn load(store: Arc<dyn SectionStore>, config: RegistryConfig) -> RegistryResult<Self> {
        let registry = Self::new(store, config);
        registry.refresh().await?;
        Ok(registry)
    }

    /// Replaces local state with the store's. Does not take the action lock.
    pub async fn refresh(&self) -> RegistryResult<()> {
        let records = self
            .coordinator
            .store()
            .list_sections(self.config.scope.filter())
            .await?;
        let sections: Vec<Section> = records.into_iter().map(Section::from_record).collect();
        info!(count = sections.len(), "loaded sections");
        *self.sections.write().await = sections;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// All sections, hero first, then by display order.
    pub async fn sections(&self) -> Vec<Section> {
        let mut sections = self.sections.read().await.clone();
        sections.sort_by_key(|s| (s.section_type.is_orderable(), s.display_order));
        sections
    }

    pub async fn get(&self, id: &SectionId) -> Option<Section> {
        self.sections
            .read()
            .await
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    pub async fn of_type(&self, section_type: SectionType) -> Vec<Section> {
        self.sections()
            .await
            .into_iter()
            .filter(|s| s.section_type == section_type)
            .collect()
    }

    pub async fn published_hero(&self) -> Option<Section> {
        self.sections
            .read()
            .await
            .iter()
            .find(|s| s.section_type == SectionType::Hero && s.is_published())
            .cloned()
    }

    /// Order a new orderable section would receive.
    pub async fn next_display_order(&self) -> u32 {
        let sections = self.sections.read().await;
        OrderPool::from_items(sections.iter().cloned()).next_order()
    }

    // ── Collections ─────────────────────────────────────────────

    /// Fetches and caches the product collections.
    pub async fn load_collections(&self) -> RegistryResult<Vec<Collection>> {
        let collections = self.coordinator.store().list_collections().await?;
        debug!(count = collections.len(), "loaded collections");
        *self.collections.write().await = collections.clone();
        Ok(collections)
    }

    /// Display name of the collection a product grid points at. Matches the
    /// source reference against collection id or handle.
    pub async fn collection_name(&self, id: &SectionId) -> Option<String> {
        let section = self.get(id).await?;
        let source = section.source_key()?;
        self.collections
            .read()
            .await
            .iter()
            .find(|c| c.id == source || c.handle.as_deref() == Some(source))
            .map(|c| c.title.clone())
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Takes the action lock, failing fast with [`RegistryError::Busy`].
    pub fn acquire(&self) -> RegistryResult<ActionGuard> {
        Ok(self.coordinator.acquire()?)
    }

    /// Validates and persists a new section.
    pub async fn create(&self, new: NewSection) -> RegistryResult<Section> {
        self.require_in_scope(new.section_type)?;
        let _guard = self.acquire()?;
        self.create_locked(new, true).await
    }

    fn require_in_scope(&self, section_type: SectionType) -> RegistryResult<()> {
        if self.config.scope.includes(section_type) {
            return Ok(());
        }
        let mut errors = FieldErrors::with_message(format!(
            "{section_type} sections are outside this registry's scope"
        ));
        errors.add("type", ErrorCode::Invalid, "Section type is not managed here");
        Err(RegistryError::ValidationFailed(errors))
    }

    /// Sections that cross-record checks run against. A scoped registry
    /// only holds its own type, so it asks the store for the rest.
    async fn peers(&self, local: &[Section]) -> RegistryResult<Vec<Section>> {
        if self.config.scope.filter().is_none() {
            return Ok(local.to_vec());
        }
        let records = self.coordinator.store().list_sections(None).await?;
        let mut peers: Vec<Section> = records.into_iter().map(Section::from_record).collect();
        // Local copies win over what the store reports for the same id.
        peers.retain(|p| !local.iter().any(|s| s.id == p.id));
        peers.extend(local.iter().cloned());
        Ok(peers)
    }

    /// Returns the faq/testimonials singleton, creating it with its system
    /// title and an empty item list when absent.
    pub async fn ensure_singleton(&self, section_type: SectionType) -> RegistryResult<Section> {
        if !section_type.is_singleton() {
            let mut errors = FieldErrors::with_message(format!("{section_type} is not a singleton type"));
            errors.add("type", ErrorCode::Invalid, "Expected faq or testimonials");
            return Err(RegistryError::ValidationFailed(errors));
        }
        self.require_in_scope(section_type)?;
        if let Some(existing) = self.of_type(section_type).await.into_iter().next() {
            return Ok(existing);
        }
        let _guard = self.acquire()?;
        // Re-check under the lock.
        if let Some(existing) = self.of_type(section_type).await.into_iter().next() {
            return Ok(existing);
        }
        self.create_locked(NewSection::defaults(section_type), false)
            .await
    }

    async fn create_locked(&self, new: NewSection, enforce_minimums: bool) -> RegistryResult<Section> {
        let local = self.sections.read().await.clone();
        let current = self.peers(&local).await?;
        let section_type = new.section_type;
        if section_type.is_singleton() && current.iter().any(|s| s.section_type == section_type) {
            warn!(%section_type, "rejected second singleton");
            return Err(RegistryError::SingletonViolation(section_type));
        }

        let display_order = if section_type.is_orderable() {
            match new.display_order {
                Some(order) => order,
                None => OrderPool::from_items(current.iter().cloned()).next_order(),
            }
        } else {
            self.config.hero_order
        };
        let mut new = new;
        if let Some(title) = self.config.system_title(section_type) {
            new.title = title.to_string();
        }
        let candidate = new.into_section(SectionId::new(""), display_order);

        let errors = if enforce_minimums {
            validate_section(&candidate, &current, &self.config.validation)
        } else {
            self.validate_without_minimums(&candidate, &current)
        };
        if !errors.is_empty() {
            debug!(%section_type, %errors, "create failed validation");
            return Err(RegistryError::from_validation(errors));
        }

        let payload = candidate.to_payload()?;
        let record = self.coordinator.store().create_section(payload).await?;
        let created = Section::from_record(record);
        info!(
            section_id = %created.id,
            %section_type,
            order = created.display_order,
            "created section"
        );
        self.sections.write().await.push(created.clone());
        Ok(created)
    }

    /// Applies a patch after validating the patched view against every
    /// other section.
    ///
    /// Minimum item counts are only checked when the patch replaces the
    /// config, so a singleton whose items were all removed stays editable.
    pub async fn update(&self, id: &SectionId, patch: SectionPatch) -> RegistryResult<Section> {
        let _guard = self.acquire()?;
        let local = self.sections.read().await.clone();
        let current = self.peers(&local).await?;
        let existing = current
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        if existing.section_type.has_system_title()
            && patch.title.as_ref().is_some_and(|t| t != &existing.title)
        {
            let mut errors = FieldErrors::new();
            errors.add(
                fields::TITLE,
                ErrorCode::Immutable,
                "The title of this section is fixed",
            );
            return Err(RegistryError::ValidationFailed(errors));
        }

        let replaces_config = patch.config.is_some();
        let mut patched = patch.applied_to(existing);
        if !patched.section_type.is_orderable() {
            patched.display_order = self.config.hero_order;
        }
        let errors = if replaces_config {
            validate_section(&patched, &current, &self.config.validation)
        } else {
            self.validate_without_minimums(&patched, &current)
        };
        if !errors.is_empty() {
            debug!(section_id = %id, %errors, "update failed validation");
            return Err(RegistryError::from_validation(errors));
        }
        self.persist(patched).await
    }

    /// Moves a section along the active/inactive axis.
    pub async fn set_active(&self, id: &SectionId, active: bool) -> RegistryResult<Section> {
        self.update(id, SectionPatch::new().active(active)).await
    }

    /// Replaces a section's config; used by item collections, which hold the
    /// lock themselves. Minimum item counts are not enforced here.
    pub(crate) async fn write_config(
        &self,
        _guard: &ActionGuard,
        id: &SectionId,
        config: SectionConfig,
    ) -> RegistryResult<Section> {
        let local = self.sections.read().await.clone();
        let existing = local
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        let patched = SectionPatch::new().config(config).applied_to(existing);
        let current = self.peers(&local).await?;

        let errors = self.validate_without_minimums(&patched, &current);
        if !errors.is_empty() {
            return Err(RegistryError::from_validation(errors));
        }
        self.persist(patched).await
    }

    fn validate_without_minimums(&self, section: &Section, others: &[Section]) -> FieldErrors {
        let mut errors = validate_section_fields(section, others, &self.config.validation);
        errors.merge(validate_config_items(
            section.section_type,
            &section.config,
            &self.config.validation,
        ));
        errors
    }

    /// Writes a fully validated section and applies the store's answer.
    async fn persist(&self, section: Section) -> RegistryResult<Section> {
        let payload = section.to_payload()?;
        let record = self
            .coordinator
            .store()
            .update_section(&section.id, payload)
            .await
            .map_err(|e| RegistryError::remote(e, &section.id))?;
        let saved = Section::from_record(record);
        debug!(section_id = %saved.id, "updated section");
        self.replace(saved.clone()).await;
        Ok(saved)
    }

    async fn replace(&self, section: Section) {
        let mut sections = self.sections.write().await;
        match sections.iter_mut().find(|s| s.id == section.id) {
            Some(slot) => *slot = section,
            None => sections.push(section),
        }
    }

    /// Deletes a section. Remaining orders are left as they are.
    pub async fn delete(&self, id: &SectionId) -> RegistryResult<()> {
        let _guard = self.acquire()?;
        let section_type = self
            .get(id)
            .await
            .map(|s| s.section_type)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        if !section_type.is_deletable() {
            return Err(RegistryError::SingletonViolation(section_type));
        }
        self.coordinator
            .store()
            .delete_section(id)
            .await
            .map_err(|e| RegistryError::remote(e, id))?;
        self.sections.write().await.retain(|s| &s.id != id);
        info!(section_id = %id, %section_type, "deleted section");
        Ok(())
    }

    /// Publishes a section. Publishing a hero demotes every other hero.
    ///
    /// If the store fails while publishing a hero, the demotion may have
    /// partly happened remotely, so local state is re-fetched before the
    /// error is returned.
    pub async fn publish(&self, id: &SectionId) -> RegistryResult<Section> {
        let _guard = self.acquire()?;
        let section_type = self
            .get(id)
            .await
            .map(|s| s.section_type)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let record = match self.coordinator.store().publish_section(id).await {
            Ok(record) => record,
            Err(err) => {
                if section_type == SectionType::Hero {
                    warn!(section_id = %id, error = %err, "hero publish failed, re-fetching");
                    if let Err(refresh_err) = self.refresh().await {
                        warn!(error = %refresh_err, "re-fetch after failed publish failed");
                    }
                }
                return Err(RegistryError::remote(err, id));
            }
        };

        let published = Section::from_record(record);
        {
            let mut sections = self.sections.write().await;
            if section_type == SectionType::Hero {
                for other in sections
                    .iter_mut()
                    .filter(|s| s.section_type == SectionType::Hero && &s.id != id)
                {
                    other.status = SectionStatus::Draft;
                }
            }
            if let Some(slot) = sections.iter_mut().find(|s| &s.id == id) {
                *slot = published.clone();
            }
        }
        info!(section_id = %id, %section_type, "published section");
        Ok(published)
    }

    pub async fn unpublish(&self, id: &SectionId) -> RegistryResult<Section> {
        let _guard = self.acquire()?;
        if self.get(id).await.is_none() {
            return Err(RegistryError::NotFound(id.clone()));
        }
        let record = self
            .coordinator
            .store()
            .unpublish_section(id)
            .await
            .map_err(|e| RegistryError::remote(e, id))?;
        let section = Section::from_record(record);
        self.replace(section.clone()).await;
        info!(section_id = %id, "unpublished section");
        Ok(section)
    }

    // ── Ordering ────────────────────────────────────────────────

    /// Swaps a section with its predecessor. `Ok(false)` when already first.
    pub async fn move_up(&self, id: &SectionId) -> RegistryResult<bool> {
        self.shift(id, true).await
    }

    /// Swaps a section with its successor. `Ok(false)` when already last.
    pub async fn move_down(&self, id: &SectionId) -> RegistryResult<bool> {
        self.shift(id, false).await
    }

    async fn shift(&self, id: &SectionId, up: bool) -> RegistryResult<bool> {
        let _guard = self.acquire()?;
        let current = self.sections.read().await.clone();
        if !current.iter().any(|s| &s.id == id) {
            return Err(RegistryError::NotFound(id.clone()));
        }
        let mut pool = OrderPool::from_items(current.iter().cloned());
        let slots: Vec<u32> = pool.orders().collect();
        let moved = if up { pool.move_up(id)? } else { pool.move_down(id)? };
        if !moved {
            return Ok(false);
        }
        let mut reordered = pool.into_items();
        if let Some(slots) = self.scoped_slots(slots) {
            for (section, order) in reordered.iter_mut().zip(slots) {
                section.set_order(order);
            }
        }
        let updates: Vec<OrderUpdate> = reordered
            .iter()
            .filter(|s| {
                current
                    .iter()
                    .any(|c| c.id == s.id && c.display_order != s.display_order)
            })
            .map(|s| OrderUpdate {
                id: s.id.clone(),
                display_order: s.display_order,
            })
            .collect();
        self.write_orders(updates).await?;
        Ok(true)
    }

    /// Persists an explicit ordering. `ids` must list every orderable
    /// section exactly once; they receive orders `1..=N`, or in a scoped
    /// registry the orders the listed sections already hold.
    pub async fn reorder(&self, ids: &[SectionId]) -> RegistryResult<()> {
        let _guard = self.acquire()?;
        let current = self.sections.read().await.clone();
        let pool = OrderPool::from_items(current.iter().cloned());
        for id in ids {
            if pool.position(id).is_none() {
                return Err(OrderingError::NotFound(id.to_string()).into());
            }
        }
        if let Some(missing) = pool.items().iter().find(|s| !ids.contains(&s.id)) {
            return Err(OrderingError::NotFound(missing.id.to_string()).into());
        }
        if ids.len() != pool.len() {
            return Err(OrderingError::IndexOutOfBounds {
                index: ids.len(),
                len: pool.len(),
            }
            .into());
        }
        let slots = self
            .scoped_slots(pool.orders().collect())
            .unwrap_or_else(|| (1..=ids.len() as u32).collect());
        let updates = ids
            .iter()
            .zip(slots)
            .map(|(id, display_order)| OrderUpdate {
                id: id.clone(),
                display_order,
            })
            .collect();
        self.write_orders(updates).await
    }

    /// Orders a scoped registry may hand out when reordering: only the ones
    /// its sections already hold. `None` when unscoped.
    fn scoped_slots(&self, mut held: Vec<u32>) -> Option<Vec<u32>> {
        self.config.scope.filter()?;
        held.sort_unstable();
        Some(held)
    }

    async fn write_orders(&self, updates: Vec<OrderUpdate>) -> RegistryResult<()> {
        if updates.is_empty() {
            return Ok(());
        }
        self.coordinator
            .store()
            .reorder_sections(updates.clone())
            .await
            .map_err(|e| RegistryError::remote_batch(e, updates.iter().map(|u| &u.id)))?;
        let mut sections = self.sections.write().await;
        for update in &updates {
            if let Some(section) = sections.iter_mut().find(|s| s.id == update.id) {
                section.set_order(update.display_order);
            }
        }
        debug!(count = updates.len(), "applied section orders");
        Ok(())
    }
}

impl std::fmt::Debug for SectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRegistry")
            .field("config", &self.config)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}
