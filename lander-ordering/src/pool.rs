use crate::engine;
use crate::{OrderingError, OrderingResult, Ordered};

/// The orderable subset of a list, sorted by order.
///
/// Pinned elements are filtered out when the pool is built, so nothing done
/// through a pool can move them or collide with their fixed order.
#[derive(Debug, Clone)]
pub struct OrderPool<T> {
    items: Vec<T>,
}

impl<T: Ordered> OrderPool<T> {
    /// Builds a pool from any items, dropping pinned ones.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut items: Vec<T> = items.into_iter().filter(|i| !i.is_pinned()).collect();
        engine::sort_by_order(&mut items);
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn orders(&self) -> impl Iterator<Item = u32> + '_ {
        self.items.iter().map(Ordered::order)
    }

    /// Next free order at the end of the pool.
    pub fn next_order(&self) -> u32 {
        engine::next_order(self.orders())
    }

    pub fn is_duplicate(&self, order: u32, exclude: Option<&T::Key>) -> bool {
        engine::is_duplicate(order, &self.items, exclude)
    }

    pub fn position(&self, key: &T::Key) -> Option<usize> {
        engine::position(&self.items, key)
    }

    /// Moves the keyed item up one slot. `Ok(false)` at the boundary.
    pub fn move_up(&mut self, key: &T::Key) -> OrderingResult<bool> {
        let idx = self.require(key)?;
        engine::move_up(&mut self.items, idx)
    }

    /// Moves the keyed item down one slot. `Ok(false)` at the boundary.
    pub fn move_down(&mut self, key: &T::Key) -> OrderingResult<bool> {
        let idx = self.require(key)?;
        engine::move_down(&mut self.items, idx)
    }

    /// Current `(key, order)` pairs in pool order.
    pub fn assignments(&self) -> Vec<(T::Key, u32)> {
        self.items
            .iter()
            .map(|item| (item.key().clone(), item.order()))
            .collect()
    }

    fn require(&self, key: &T::Key) -> OrderingResult<usize> {
        self.position(key)
            .ok_or_else(|| OrderingError::NotFound(format!("{key:?}")))
    }
}
