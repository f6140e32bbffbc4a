//! Item lists embedded in a section's config.

use crate::error::{RegistryError, RegistryResult};
use crate::registry::SectionRegistry;
use lander_model::{EmbeddedItem, ItemCollection};
use lander_ordering::{self as ordering, Ordered};
use lander_sync::Staged;
use lander_types::{ErrorCode, FieldErrors, ItemId, SectionId};
use lander_validation::{ValidateItem, fields, validate_item};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Edits one section's embedded item list (FAQ items, testimonials or hero
/// slides).
///
/// The section is the unit of persistence: every change writes the whole
/// list back through the registry. Until that write is confirmed the new
/// list is only staged; a failed write reverts to the last confirmed list.
/// If the registry's copy of the list changed since it was read, writes
/// fail with [`RegistryError::Stale`] until [`refresh`](Self::refresh).
pub struct EmbeddedCollectionManager<'a, K: ItemCollection> {
    registry: &'a SectionRegistry,
    section_id: SectionId,
    items: Staged<Vec<K::Item>>,
    _kind: PhantomData<K>,
}

impl<'a, K> EmbeddedCollectionManager<'a, K>
where
    K: ItemCollection,
    K::Item: ValidateItem,
{
    /// Opens the list held by `section_id`.
    pub async fn open(registry: &'a SectionRegistry, section_id: SectionId) -> RegistryResult<Self> {
        let items = Self::read_items(registry, &section_id).await?;
        Ok(Self {
            registry,
            section_id,
            items: Staged::new(items),
            _kind: PhantomData,
        })
    }

    /// Opens the list of the faq/testimonials singleton, creating the
    /// section if needed.
    pub async fn for_singleton(registry: &'a SectionRegistry) -> RegistryResult<Self> {
        let section = registry.ensure_singleton(K::SECTION_TYPE).await?;
        Self::open(registry, section.id).await
    }

    async fn read_items(
        registry: &SectionRegistry,
        section_id: &SectionId,
    ) -> RegistryResult<Vec<K::Item>> {
        let section = registry
            .get(section_id)
            .await
            .ok_or_else(|| RegistryError::NotFound(section_id.clone()))?;
        match K::items(&section.config) {
            Some(items) => Ok(items.clone()),
            None => {
                let mut errors = FieldErrors::new();
                errors.add(
                    fields::CONFIG,
                    ErrorCode::Invalid,
                    format!("{} section holds no {} list", section.section_type, K::FIELD),
                );
                Err(RegistryError::ValidationFailed(errors))
            }
        }
    }

    pub fn section_id(&self) -> &SectionId {
        &self.section_id
    }

    /// Confirmed items sorted by order.
    pub fn list(&self) -> Vec<K::Item> {
        let mut items = self.items.confirmed().clone();
        ordering::sort_by_order(&mut items);
        items
    }

    pub fn get(&self, id: &ItemId) -> Option<&K::Item> {
        self.items.confirmed().iter().find(|i| i.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.confirmed().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.confirmed().is_empty()
    }

    /// Order the next added item receives.
    pub fn next_order(&self) -> u32 {
        ordering::next_order(self.items.confirmed().iter().map(Ordered::order))
    }

    /// Whether an unconfirmed edit is staged.
    pub fn is_dirty(&self) -> bool {
        self.items.is_dirty()
    }

    /// Adds an item. A blank id is replaced with a local one and an order of
    /// zero with [`next_order`](Self::next_order).
    pub async fn add(&mut self, mut item: K::Item) -> RegistryResult<K::Item> {
        if item.id().is_blank() {
            item.set_id(ItemId::generate());
        }
        if item.order() == 0 {
            item.set_order(self.next_order());
        }
        if self.get(item.id()).is_some() {
            let mut errors = FieldErrors::new();
            errors.add(
                "id",
                ErrorCode::Duplicate,
                format!("A {} with this id already exists", K::Item::LABEL),
            );
            return Err(RegistryError::ValidationFailed(errors));
        }
        let confirmed = self.items.confirmed();
        self.check(&item, confirmed)?;
        let mut next = confirmed.clone();
        next.push(item.clone());
        self.persist(next).await?;
        debug!(item_id = %item.id(), order = item.order(), "added {}", K::Item::LABEL);
        Ok(item)
    }

    /// Edits an item in place. The id cannot be changed.
    pub async fn edit(
        &mut self,
        id: &ItemId,
        change: impl FnOnce(&mut K::Item),
    ) -> RegistryResult<K::Item> {
        let confirmed = self.items.confirmed();
        let idx = self.require(id)?;
        let mut edited = confirmed[idx].clone();
        change(&mut edited);
        edited.set_id(id.clone());
        self.check(&edited, confirmed)?;
        let mut next = confirmed.clone();
        next[idx] = edited.clone();
        self.persist(next).await?;
        Ok(edited)
    }

    /// Removes an item. Other items keep their orders.
    pub async fn remove(&mut self, id: &ItemId) -> RegistryResult<()> {
        self.require(id)?;
        let next: Vec<K::Item> = self
            .items
            .confirmed()
            .iter()
            .filter(|i| i.id() != id)
            .cloned()
            .collect();
        self.persist(next).await?;
        debug!(item_id = %id, "removed {}", K::Item::LABEL);
        Ok(())
    }

    pub async fn set_active(&mut self, id: &ItemId, active: bool) -> RegistryResult<K::Item> {
        self.edit(id, |item| item.set_active(active)).await
    }

    /// Swaps an item with its predecessor and repacks. `Ok(false)` at the top.
    pub async fn move_up(&mut self, id: &ItemId) -> RegistryResult<bool> {
        self.shift(id, true).await
    }

    /// Swaps an item with its successor and repacks. `Ok(false)` at the bottom.
    pub async fn move_down(&mut self, id: &ItemId) -> RegistryResult<bool> {
        self.shift(id, false).await
    }

    async fn shift(&mut self, id: &ItemId, up: bool) -> RegistryResult<bool> {
        self.require(id)?;
        let mut next = self.list();
        let idx = ordering::position(&next, id)
            .ok_or_else(|| ordering::OrderingError::NotFound(id.to_string()))?;
        let moved = if up {
            ordering::move_up(&mut next, idx)?
        } else {
            ordering::move_down(&mut next, idx)?
        };
        if moved {
            self.persist(next).await?;
        }
        Ok(moved)
    }

    /// Re-fetches the section and drops any staged edit.
    pub async fn refresh(&mut self) -> RegistryResult<()> {
        self.registry.refresh().await?;
        let items = Self::read_items(self.registry, &self.section_id).await?;
        self.items.confirm(items);
        Ok(())
    }

    /// Abandons a staged edit without writing it.
    pub fn discard(&mut self) {
        self.items.discard();
    }

    fn require(&self, id: &ItemId) -> RegistryResult<usize> {
        self.items
            .confirmed()
            .iter()
            .position(|i| i.id() == id)
            .ok_or_else(|| RegistryError::ItemNotFound {
                label: K::Item::LABEL,
                id: id.clone(),
            })
    }

    fn check(&self, item: &K::Item, siblings: &[K::Item]) -> RegistryResult<()> {
        let errors = validate_item(item, siblings, &self.registry.config().validation);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::from_validation(errors))
        }
    }

    async fn persist(&mut self, next: Vec<K::Item>) -> RegistryResult<()> {
        self.items.stage(next.clone());
        match self.write(next).await {
            Ok(saved) => {
                self.items.confirm(saved);
                Ok(())
            }
            Err(err) => {
                warn!(section_id = %self.section_id, error = %err, "{} write failed, reverting", K::FIELD);
                self.items.revert();
                Err(err)
            }
        }
    }

    async fn write(&self, next: Vec<K::Item>) -> RegistryResult<Vec<K::Item>> {
        let guard = self.registry.acquire()?;
        let section = self
            .registry
            .get(&self.section_id)
            .await
            .ok_or_else(|| RegistryError::NotFound(self.section_id.clone()))?;
        if K::items(&section.config) != Some(self.items.confirmed()) {
            warn!(section_id = %self.section_id, "{} list changed elsewhere", K::FIELD);
            return Err(RegistryError::Stale(self.section_id.clone()));
        }
        let mut config = section.config;
        match K::items_mut(&mut config) {
            Some(list) => *list = next,
            None => return Err(RegistryError::NotFound(self.section_id.clone())),
        }
        let saved = self
            .registry
            .write_config(&guard, &self.section_id, config)
            .await?;
        Ok(K::items(&saved.config).cloned().unwrap_or_default())
    }
}
